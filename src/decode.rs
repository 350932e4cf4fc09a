use crate::std::string::String;
use crate::std::vec::Vec;

#[cfg(feature = "std")]
use thiserror::Error;

use crate::encode::{PATTERNS, STOP_PATTERN};
use crate::{Bar, FNC1, FNC1_SYMBOL, START_A, START_B, START_C, SWITCH_A, SWITCH_B, SWITCH_C};

/// Errors that can occur during decoding.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum DecodingError {
    /// A sequence of bars resulted in an unknown pattern.
    #[cfg_attr(feature = "std", error("pattern {0:?} not recognized"))]
    Pattern([u8; 6]),
    /// A bar's width or spacing is not valid.
    #[cfg_attr(feature = "std", error("bars are not valid"))]
    InvalidBars,
    /// The stop code at the end is wrong.
    #[cfg_attr(feature = "std", error("wrong stop code"))]
    WrongStop,
    /// The input was too short.
    #[cfg_attr(feature = "std", error("code too short to be valid"))]
    Short,
    /// The code's length can not fit an allowed sequence of bars.
    #[cfg_attr(feature = "std", error("length not correct"))]
    Length,
    /// The checksum did not match.
    #[cfg_attr(feature = "std", error("checksum mismatch"))]
    Checksum,
    /// The code did not begin with a start symbol.
    #[cfg_attr(feature = "std", error("first symbol is not a start symbol"))]
    NoStart,
    /// A symbol occurred in a charset that does not support it.
    #[cfg_attr(feature = "std", error("unexpected symbol {0}"))]
    Unexpected(u8),
}

fn widths(bars: &[Bar]) -> Result<[u8; 6], DecodingError> {
    let mut widths = [0; 6];
    for (pair, bar) in widths.chunks_exact_mut(2).zip(bars) {
        if !(1..=4).contains(&bar.width) || !(1..=4).contains(&bar.space) {
            return Err(DecodingError::InvalidBars);
        }
        pair.copy_from_slice(&[bar.width, bar.space]);
    }
    Ok(widths)
}

fn lookup(bars: &[Bar]) -> Result<u8, DecodingError> {
    let widths = widths(bars)?;
    PATTERNS
        .iter()
        .position(|pattern| *pattern == widths)
        .map(|idx| idx as u8)
        .ok_or(DecodingError::Pattern(widths))
}

fn is_stop(bars: &[Bar]) -> bool {
    let widths = bars.iter().flat_map(|bar| [bar.width, bar.space]);
    widths.take(STOP_PATTERN.len()).eq(STOP_PATTERN)
}

/// Decode bars into symbol values.
///
/// The stop pattern and the checksum are verified and not part of the
/// result.
pub fn decode_symbols(bars: &[Bar]) -> Result<Vec<u8>, DecodingError> {
    if bars.len() < 3 + 3 + 4 {
        return Err(DecodingError::Short);
    }
    let (init, stop) = bars.split_at(bars.len() - 4);
    if !is_stop(stop) {
        return Err(DecodingError::WrongStop);
    }

    if init.len() % 3 != 0 {
        return Err(DecodingError::Length);
    }
    let (data, checksum) = init.split_at(init.len() - 3);

    let checksum = lookup(checksum)?;
    let result = data
        .chunks_exact(3)
        .map(lookup)
        .collect::<Result<Vec<u8>, _>>()?;
    if checksum != crate::checksum(result.iter().cloned()) {
        return Err(DecodingError::Checksum);
    }
    Ok(result)
}

/// Decode bars into text.
///
/// FNC1 symbols are returned as [FNC1]. A UCC/EAN-128 code therefore
/// decodes to text starting with [FNC1].
pub fn decode(bars: &[Bar]) -> Result<String, DecodingError> {
    #[derive(Clone, Copy, Debug)]
    enum Charset {
        A,
        B,
        C,
    }

    let symbols = decode_symbols(bars)?;
    let (start, symbols) = symbols.split_first().ok_or(DecodingError::Short)?;
    let mut charset = match *start {
        START_A => Charset::A,
        START_B => Charset::B,
        START_C => Charset::C,
        _ => return Err(DecodingError::NoStart),
    };

    let mut text = String::with_capacity(symbols.len() * 2);
    for &symbol in symbols {
        match (charset, symbol) {
            (_, FNC1_SYMBOL) => text.push(FNC1),
            (Charset::A | Charset::B, SWITCH_C) => charset = Charset::C,
            (Charset::A | Charset::C, SWITCH_B) => charset = Charset::B,
            (Charset::B | Charset::C, SWITCH_A) => charset = Charset::A,
            (Charset::A, 0..=63) | (Charset::B, 0..=95) => text.push(char::from(symbol + b' ')),
            (Charset::A, 64..=95) => text.push(char::from(symbol - 64)),
            (Charset::C, 0..=99) => {
                text.push(char::from(b'0' + symbol / 10));
                text.push(char::from(b'0' + symbol % 10));
            }
            _ => return Err(DecodingError::Unexpected(symbol)),
        }
    }
    Ok(text)
}

#[cfg(test)]
fn bars_of(text: &str) -> Vec<Bar> {
    crate::Code128::encode(text).unwrap().bars().collect()
}

#[test]
fn test_patterns() {
    for (i, pattern) in PATTERNS.iter().enumerate() {
        let bars = [
            Bar { width: pattern[0], space: pattern[1] },
            Bar { width: pattern[2], space: pattern[3] },
            Bar { width: pattern[4], space: pattern[5] },
        ];
        assert_eq!(lookup(&bars), Ok(i as u8));
    }
}

#[test]
fn test_hello_world() {
    let msg = "HELLO\n123456w0r1\rd";
    assert_eq!(decode(&bars_of(msg)), Ok(msg.into()));
}

#[test]
fn test_empty() {
    assert_eq!(decode(&bars_of("")), Ok(String::new()));
}

#[test]
fn test_fnc1() {
    let msg = "ab12\u{ca}34\u{ca}x";
    assert_eq!(decode(&bars_of(msg)), Ok(msg.into()));

    let code = crate::Code128::encode_ucc("(10)ABC(20)12").unwrap();
    let bars: Vec<Bar> = code.bars().collect();
    assert_eq!(decode(&bars), Ok("\u{ca}10ABC\u{ca}2012".into()));
}

#[test]
fn test_symbols() {
    let code = crate::Code128::encode("AB1234").unwrap();
    let bars: Vec<Bar> = code.bars().collect();
    let (_, data) = code.symbols().split_last().unwrap();
    assert_eq!(decode_symbols(&bars), Ok(data.into()));
}

#[test]
fn test_corrupted() {
    let mut bars = bars_of("Code 128");
    assert_eq!(decode(&bars[..5]), Err(DecodingError::Short));

    let len = bars.len();
    bars[len - 1].width = 1;
    assert_eq!(decode(&bars), Err(DecodingError::WrongStop));

    let mut bars = bars_of("Code 128");
    // swap two data symbols
    bars.swap(3, 6);
    bars.swap(4, 7);
    bars.swap(5, 8);
    assert_eq!(decode(&bars), Err(DecodingError::Checksum));

    let mut bars = bars_of("Code 128");
    bars[0].width = 5;
    assert_eq!(decode(&bars), Err(DecodingError::InvalidBars));
}
