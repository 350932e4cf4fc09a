//! Property tests for encoding and decoding of Code 128.

use barcode128::{decode, decode_symbols, Bar, Code128, FNC1};
use proptest::prelude::*;

fn bars(code: &Code128) -> Vec<Bar> {
    code.bars().collect()
}

/// ASCII including control characters, sprinkled with FNC1.
fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            8 => (0u8..128).prop_map(char::from),
            4 => (b'0'..=b'9').prop_map(char::from),
            1 => Just(FNC1),
        ],
        0..60,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    /// Decoding the bars of an encoded text gives the text back
    #[test]
    fn prop_roundtrip(data in text()) {
        let code = Code128::encode(&data).unwrap();
        prop_assert_eq!(decode(&bars(&code)), Ok(data));
    }

    /// Printable ASCII without FNC1 round trips as well
    #[test]
    fn prop_roundtrip_printable(data in "[ -~]{0,80}") {
        let code = Code128::encode(&data).unwrap();
        prop_assert_eq!(decode(&bars(&code)), Ok(data));
    }

    /// UCC/EAN-128 codes decode with a leading FNC1
    #[test]
    fn prop_roundtrip_ucc(data in "[A-Z0-9]{0,40}") {
        let code = Code128::encode_ucc(&data).unwrap();
        let expected = format!("{FNC1}{data}");
        prop_assert_eq!(decode(&bars(&code)), Ok(expected));
    }

    /// The last symbol is the weighted sum of the others modulo 103
    #[test]
    fn prop_checksum(data in text()) {
        let code = Code128::encode(&data).unwrap();
        let (check, symbols) = code.symbols().split_last().unwrap();
        let sum = symbols
            .iter()
            .enumerate()
            .map(|(k, &v)| k.max(1) as u64 * v as u64)
            .sum::<u64>();
        prop_assert_eq!(sum % 103, *check as u64);
        prop_assert_eq!(decode_symbols(&bars(&code)), Ok(symbols.to_vec()));
    }

    /// Six widths per symbol including the checksum, seven for the stop pattern
    #[test]
    fn prop_width_count(data in text()) {
        let code = Code128::encode(&data).unwrap();
        let n = code.symbols().len() - 1;
        prop_assert_eq!(code.widths().count(), 6 * (n + 1) + 7);
        prop_assert!(code.symbols().iter().all(|&s| s <= 105));
        prop_assert!(matches!(code.symbols()[0], 103..=105));
    }

    /// Characters beyond ASCII are rejected, never replaced
    #[test]
    fn prop_illegal(prefix in "[a-z]{0,5}", c in "[\u{80}-\u{c9}\u{cb}-\u{d7ff}]") {
        let data = format!("{prefix}{c}");
        prop_assert!(Code128::encode(&data).is_err());
    }
}
