use crate::std::string::String;
use crate::std::vec;

use crate::Bar;

const QUIET_ZONE: usize = 10;

/// Create a string representation of the bars using Unicode block characters.
///
/// Each character covers two modules. The quiet zones are included.
///
/// ## Example
/// ```
/// # use barcode128::{Code128, bars_to_blocks};
/// assert_eq!(
///     bars_to_blocks(Code128::encode("").unwrap().bars()),
///     "     █▐ ▌ ▐▌▐▌█ █ ▐█▐▐▌     ",
/// );
/// ```
pub fn bars_to_blocks(bars: impl IntoIterator<Item = Bar>) -> String {
    let mut modules = vec![false; QUIET_ZONE];
    for bar in bars {
        for _ in 0..bar.width {
            modules.push(true);
        }
        for _ in 0..bar.space {
            modules.push(false);
        }
    }
    modules.resize(modules.len() + QUIET_ZONE, false);

    modules
        .chunks(2)
        .map(|pair| match pair {
            [true, true] => '█',
            [true, false] | [true] => '▌',
            [false, true] => '▐',
            _ => ' ',
        })
        .collect()
}

#[test]
fn test_quiet_zone() {
    let blocks = bars_to_blocks(crate::Code128::encode("abc").unwrap().bars());
    assert!(blocks.starts_with("     █"));
    assert!(blocks.ends_with("█     "));
    assert_eq!(blocks.chars().count(), (10 + 5 * 11 + 13 + 10) / 2);
}
