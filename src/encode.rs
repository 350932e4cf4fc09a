use crate::std::string::String;
#[cfg(test)]
use crate::std::vec;
use crate::std::vec::Vec;

#[cfg(feature = "std")]
use thiserror::Error;

use super::{FNC1_SYMBOL, START_A, START_B, START_C, SWITCH_A, SWITCH_B, SWITCH_C};

/// Bar and space widths of every symbol, starting with a bar.
pub(crate) const PATTERNS: [[u8; 6]; 106] = [
    [2, 1, 2, 2, 2, 2],
    [2, 2, 2, 1, 2, 2],
    [2, 2, 2, 2, 2, 1],
    [1, 2, 1, 2, 2, 3],
    [1, 2, 1, 3, 2, 2],
    [1, 3, 1, 2, 2, 2],
    [1, 2, 2, 2, 1, 3],
    [1, 2, 2, 3, 1, 2],
    [1, 3, 2, 2, 1, 2],
    [2, 2, 1, 2, 1, 3],
    [2, 2, 1, 3, 1, 2],
    [2, 3, 1, 2, 1, 2],
    [1, 1, 2, 2, 3, 2],
    [1, 2, 2, 1, 3, 2],
    [1, 2, 2, 2, 3, 1],
    [1, 1, 3, 2, 2, 2],
    [1, 2, 3, 1, 2, 2],
    [1, 2, 3, 2, 2, 1],
    [2, 2, 3, 2, 1, 1],
    [2, 2, 1, 1, 3, 2],
    [2, 2, 1, 2, 3, 1],
    [2, 1, 3, 2, 1, 2],
    [2, 2, 3, 1, 1, 2],
    [3, 1, 2, 1, 3, 1],
    [3, 1, 1, 2, 2, 2],
    [3, 2, 1, 1, 2, 2],
    [3, 2, 1, 2, 2, 1],
    [3, 1, 2, 2, 1, 2],
    [3, 2, 2, 1, 1, 2],
    [3, 2, 2, 2, 1, 1],
    [2, 1, 2, 1, 2, 3],
    [2, 1, 2, 3, 2, 1],
    [2, 3, 2, 1, 2, 1],
    [1, 1, 1, 3, 2, 3],
    [1, 3, 1, 1, 2, 3],
    [1, 3, 1, 3, 2, 1],
    [1, 1, 2, 3, 1, 3],
    [1, 3, 2, 1, 1, 3],
    [1, 3, 2, 3, 1, 1],
    [2, 1, 1, 3, 1, 3],
    [2, 3, 1, 1, 1, 3],
    [2, 3, 1, 3, 1, 1],
    [1, 1, 2, 1, 3, 3],
    [1, 1, 2, 3, 3, 1],
    [1, 3, 2, 1, 3, 1],
    [1, 1, 3, 1, 2, 3],
    [1, 1, 3, 3, 2, 1],
    [1, 3, 3, 1, 2, 1],
    [3, 1, 3, 1, 2, 1],
    [2, 1, 1, 3, 3, 1],
    [2, 3, 1, 1, 3, 1],
    [2, 1, 3, 1, 1, 3],
    [2, 1, 3, 3, 1, 1],
    [2, 1, 3, 1, 3, 1],
    [3, 1, 1, 1, 2, 3],
    [3, 1, 1, 3, 2, 1],
    [3, 3, 1, 1, 2, 1],
    [3, 1, 2, 1, 1, 3],
    [3, 1, 2, 3, 1, 1],
    [3, 3, 2, 1, 1, 1],
    [3, 1, 4, 1, 1, 1],
    [2, 2, 1, 4, 1, 1],
    [4, 3, 1, 1, 1, 1],
    [1, 1, 1, 2, 2, 4],
    [1, 1, 1, 4, 2, 2],
    [1, 2, 1, 1, 2, 4],
    [1, 2, 1, 4, 2, 1],
    [1, 4, 1, 1, 2, 2],
    [1, 4, 1, 2, 2, 1],
    [1, 1, 2, 2, 1, 4],
    [1, 1, 2, 4, 1, 2],
    [1, 2, 2, 1, 1, 4],
    [1, 2, 2, 4, 1, 1],
    [1, 4, 2, 1, 1, 2],
    [1, 4, 2, 2, 1, 1],
    [2, 4, 1, 2, 1, 1],
    [2, 2, 1, 1, 1, 4],
    [4, 1, 3, 1, 1, 1],
    [2, 4, 1, 1, 1, 2],
    [1, 3, 4, 1, 1, 1],
    [1, 1, 1, 2, 4, 2],
    [1, 2, 1, 1, 4, 2],
    [1, 2, 1, 2, 4, 1],
    [1, 1, 4, 2, 1, 2],
    [1, 2, 4, 1, 1, 2],
    [1, 2, 4, 2, 1, 1],
    [4, 1, 1, 2, 1, 2],
    [4, 2, 1, 1, 1, 2],
    [4, 2, 1, 2, 1, 1],
    [2, 1, 2, 1, 4, 1],
    [2, 1, 4, 1, 2, 1],
    [4, 1, 2, 1, 2, 1],
    [1, 1, 1, 1, 4, 3],
    [1, 1, 1, 3, 4, 1],
    [1, 3, 1, 1, 4, 1],
    [1, 1, 4, 1, 1, 3],
    [1, 1, 4, 3, 1, 1],
    [4, 1, 1, 1, 1, 3],
    [4, 1, 1, 3, 1, 1],
    [1, 1, 3, 1, 4, 1],
    [1, 1, 4, 1, 3, 1],
    [3, 1, 1, 1, 4, 1],
    [4, 1, 1, 1, 3, 1],
    [2, 1, 1, 4, 1, 2],
    [2, 1, 1, 2, 1, 4],
    [2, 1, 1, 2, 3, 2],
];

/// The stop pattern, ending with an extra bar.
pub(crate) const STOP_PATTERN: [u8; 7] = [2, 3, 3, 1, 1, 1, 2];

/// Placeholder for FNC1 in text given to the encoder.
///
/// In UCC/EAN-128 data it separates a variable length field from the next
/// Application Identifier. It is never encoded as a data character.
pub const FNC1: char = '\u{ca}';

/// Errors that can occur during encoding.
#[derive(Debug, PartialEq, Clone)]
#[cfg_attr(feature = "std", derive(Error))]
pub enum EncodingError {
    /// The character can not be represented in Code 128.
    #[cfg_attr(feature = "std", error("illegal character {0:?} for Code 128"))]
    IllegalCharacter(char),
    /// A parenthesized Application Identifier group is not closed or not numeric.
    #[cfg_attr(feature = "std", error("badly formed UCC string: {0}"))]
    MalformedAi(String),
    /// An Application Identifier has less than two digits.
    #[cfg_attr(feature = "std", error("AI too short: ({0})"))]
    AiTooShort(String),
    /// The Application Identifier is not known.
    #[cfg_attr(feature = "std", error("AI not found: ({0})"))]
    AiNotFound(String),
    /// A fixed length field has the wrong number of characters.
    #[cfg_attr(feature = "std", error("invalid AI length: ({0})"))]
    AiLength(String),
    /// A raw symbol value outside the symbol table.
    #[cfg_attr(feature = "std", error("symbol value {0} out of range"))]
    InvalidSymbol(u32),
    /// Raw input without any symbol.
    #[cfg_attr(feature = "std", error("no symbols to encode"))]
    NoSymbols,
}

/// One element of the text to encode.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// An ASCII character, `0x00` to `0x7F`.
    Char(u8),
    /// The FNC1 function character.
    Fnc1,
}

impl Token {
    #[inline]
    fn digit(self) -> Option<u8> {
        match self {
            Token::Char(c @ b'0'..=b'9') => Some(c - b'0'),
            _ => None,
        }
    }
}

/// Split text into tokens, mapping the [FNC1] placeholder to [Token::Fnc1].
///
/// Fails on the first character above `0x7F` that is not [FNC1].
pub fn tokenize(text: &str) -> Result<Vec<Token>, EncodingError> {
    text.chars()
        .map(|c| match c {
            FNC1 => Ok(Token::Fnc1),
            '\0'..='\x7F' => Ok(Token::Char(c as u8)),
            _ => Err(EncodingError::IllegalCharacter(c)),
        })
        .collect()
}

#[derive(Debug, PartialEq, Clone, Copy)]
enum Charset {
    A,
    B,
    C,
}

impl Charset {
    #[inline]
    fn switch(self) -> u8 {
        match self {
            Charset::A => SWITCH_A,
            Charset::B => SWITCH_B,
            Charset::C => SWITCH_C,
        }
    }

    #[inline]
    fn start(self) -> u8 {
        match self {
            Charset::A => START_A,
            Charset::B => START_B,
            Charset::C => START_C,
        }
    }
}

/// Symbol buffer tracking the active charset.
struct Encodation {
    charset: Charset,
    symbols: Vec<u8>,
}

impl Encodation {
    fn new(charset: Charset, ucc: bool, capacity: usize) -> Self {
        let mut symbols = Vec::with_capacity(capacity + 2);
        symbols.push(charset.start());
        if ucc {
            symbols.push(FNC1_SYMBOL);
        }
        Self { charset, symbols }
    }

    #[inline]
    fn switch(&mut self, charset: Charset) {
        log::trace!("switching from charset {:?} to {:?}", self.charset, charset);
        self.symbols.push(charset.switch());
        self.charset = charset;
    }

    #[inline]
    fn push(&mut self, symbol: u8) {
        debug_assert!(symbol < PATTERNS.len() as u8);
        self.symbols.push(symbol);
    }

    /// Push a character as it is represented in charset A or B.
    #[inline]
    fn push_char(&mut self, c: u8) {
        if c < b' ' {
            self.push(c + 64);
        } else {
            self.push(c - b' ');
        }
    }
}

/// Whether `count` digits follow, ignoring FNC1 in front of each digit pair.
///
/// The two digits of a pair must be adjacent.
fn has_digits(mut tokens: &[Token], mut count: usize) -> bool {
    while count > 0 {
        match tokens {
            [Token::Fnc1, rest @ ..] => tokens = rest,
            [c1, c2, rest @ ..] if c1.digit().is_some() && c2.digit().is_some() => {
                count = count.saturating_sub(2);
                tokens = rest;
            }
            _ => return false,
        }
    }
    true
}

/// Pack `count` digits into charset C symbols, passing FNC1 through.
///
/// [has_digits] must have confirmed the digits. Returns the remaining input.
fn pack_digits<'a>(mut tokens: &'a [Token], mut count: usize, enc: &mut Encodation) -> &'a [Token] {
    while count > 0 {
        match tokens {
            [Token::Fnc1, rest @ ..] => {
                enc.push(FNC1_SYMBOL);
                tokens = rest;
            }
            [c1, c2, rest @ ..] => {
                let (Some(d1), Some(d2)) = (c1.digit(), c2.digit()) else {
                    unreachable!("digit pair not checked before packing");
                };
                enc.push(d1 * 10 + d2);
                count = count.saturating_sub(2);
                tokens = rest;
            }
            _ => unreachable!("digit pair not checked before packing"),
        }
    }
    tokens
}

/// Encode tokens as symbol values, starting with a start symbol.
///
/// A greedy strategy selects the charsets: charset C is entered at the start
/// for two digits, later on only for four. If `ucc` is set an FNC1 symbol
/// follows the start symbol.
pub fn encode_tokens(tokens: &[Token], ucc: bool) -> Result<Vec<u8>, EncodingError> {
    if let Some(c) = tokens.iter().find_map(|t| match t {
        Token::Char(c) if *c > 0x7F => Some(*c),
        _ => None,
    }) {
        return Err(EncodingError::IllegalCharacter(char::from(c)));
    }

    let mut rest = tokens;
    let mut enc = match rest {
        [] => return Ok(Encodation::new(Charset::B, ucc, 0).symbols),
        _ if has_digits(rest, 2) => {
            let mut enc = Encodation::new(Charset::C, ucc, tokens.len());
            rest = pack_digits(rest, 2, &mut enc);
            enc
        }
        [Token::Char(c), tail @ ..] if *c < b' ' => {
            let mut enc = Encodation::new(Charset::A, ucc, tokens.len());
            enc.push_char(*c);
            rest = tail;
            enc
        }
        [first, tail @ ..] => {
            let mut enc = Encodation::new(Charset::B, ucc, tokens.len());
            match first {
                Token::Fnc1 => enc.push(FNC1_SYMBOL),
                Token::Char(c) => enc.push_char(*c),
            }
            rest = tail;
            enc
        }
    };

    while let [next, tail @ ..] = rest {
        if enc.charset != Charset::C && has_digits(rest, 4) {
            enc.switch(Charset::C);
            rest = pack_digits(rest, 4, &mut enc);
            continue;
        }
        if enc.charset == Charset::C && has_digits(rest, 2) {
            rest = pack_digits(rest, 2, &mut enc);
            continue;
        }

        rest = tail;
        let Token::Char(c) = *next else {
            enc.push(FNC1_SYMBOL);
            continue;
        };
        match enc.charset {
            Charset::A if c > b'_' => enc.switch(Charset::B),
            Charset::B | Charset::C if c < b' ' => enc.switch(Charset::A),
            Charset::C => enc.switch(Charset::B),
            _ => (),
        }
        enc.push_char(c);
    }

    Ok(enc.symbols)
}

#[cfg(test)]
fn encode_str(text: &str, ucc: bool) -> Vec<u8> {
    encode_tokens(&tokenize(text).unwrap(), ucc).unwrap()
}

#[test]
fn test_pattern_widths() {
    for pattern in PATTERNS {
        let size: u32 = pattern.iter().map(|&w| w as u32).sum();
        assert_eq!(size, 11);
        assert!(pattern.iter().all(|w| (1..=4).contains(w)));
    }
    assert_eq!(STOP_PATTERN.iter().map(|&w| w as u32).sum::<u32>(), 13);
}

#[test]
fn test_empty() {
    assert_eq!(encode_str("", false), vec![START_B]);
    assert_eq!(encode_str("", true), vec![START_B, FNC1_SYMBOL]);
}

#[test]
fn test_switch_to_c_after_letters() {
    assert_eq!(
        encode_str("AB1234", false),
        vec![START_B, b'A' - b' ', b'B' - b' ', SWITCH_C, 12, 34],
    );
}

#[test]
fn test_two_digits_at_start() {
    assert_eq!(encode_str("12", false), vec![START_C, 12]);
    assert_eq!(encode_str("12a", false), vec![START_C, 12, SWITCH_B, b'a' - b' ']);
    // odd digit count: the last digit leaves charset C
    assert_eq!(
        encode_str("123", false),
        vec![START_C, 12, SWITCH_B, b'3' - b' ']
    );
}

#[test]
fn test_four_digits_needed_later() {
    assert_eq!(
        encode_str("a12", false),
        vec![START_B, b'a' - b' ', b'1' - b' ', b'2' - b' ']
    );
    assert_eq!(
        encode_str("a123", false),
        vec![START_B, b'a' - b' ', b'1' - b' ', b'2' - b' ', b'3' - b' ']
    );
    assert_eq!(
        encode_str("a12345", false),
        vec![START_B, b'a' - b' ', SWITCH_C, 12, 34, SWITCH_B, b'5' - b' ']
    );
}

#[test]
fn test_control_characters() {
    assert_eq!(
        encode_str("\nab", false),
        vec![START_A, b'\n' + 64, SWITCH_B, b'a' - b' ', b'b' - b' ']
    );
    assert_eq!(
        encode_str("A\tB", false),
        vec![START_B, b'A' - b' ', SWITCH_A, b'\t' + 64, b'B' - b' ']
    );
    assert_eq!(encode_str("\x7F", false), vec![START_B, 95]);
    assert_eq!(
        encode_str("\r\x7F", false),
        vec![START_A, b'\r' + 64, SWITCH_B, 95]
    );
}

#[test]
fn test_c_to_a() {
    assert_eq!(
        encode_str("1234\n", false),
        vec![START_C, 12, 34, SWITCH_A, b'\n' + 64]
    );
}

#[test]
fn test_a_to_c() {
    assert_eq!(
        encode_str("\n1234", false),
        vec![START_A, b'\n' + 64, SWITCH_C, 12, 34]
    );
    assert_eq!(
        encode_str("\n\u{ca}1234", false),
        vec![START_A, b'\n' + 64, SWITCH_C, FNC1_SYMBOL, 12, 34]
    );
}

#[test]
fn test_stay_in_a_for_few_digits() {
    assert_eq!(
        encode_str("\n12", false),
        vec![START_A, b'\n' + 64, b'1' - b' ', b'2' - b' ']
    );
    assert_eq!(
        encode_str("\n123", false),
        vec![START_A, b'\n' + 64, b'1' - b' ', b'2' - b' ', b'3' - b' ']
    );
}

#[test]
fn test_fnc1_keeps_charset() {
    assert_eq!(
        encode_str("\n\u{ca}A", false),
        vec![START_A, b'\n' + 64, FNC1_SYMBOL, b'A' - b' ']
    );
    assert_eq!(encode_str("12\u{ca}", false), vec![START_C, 12, FNC1_SYMBOL]);
    assert_eq!(
        encode_str("12\u{ca}\n", false),
        vec![START_C, 12, FNC1_SYMBOL, SWITCH_A, b'\n' + 64]
    );
}

#[test]
fn test_fnc1_between_digits() {
    let text = "12\u{ca}34";
    assert_eq!(encode_str(text, false), vec![START_C, 12, FNC1_SYMBOL, 34]);
    let text = "ab12\u{ca}34";
    assert_eq!(
        encode_str(text, false),
        vec![START_B, b'a' - b' ', b'b' - b' ', SWITCH_C, 12, FNC1_SYMBOL, 34]
    );
    // FNC1 inside a pair prevents packing
    assert_eq!(
        encode_str("1\u{ca}2", false),
        vec![START_B, b'1' - b' ', FNC1_SYMBOL, b'2' - b' ']
    );
}

#[test]
fn test_leading_fnc1() {
    assert_eq!(encode_str("\u{ca}12", false), vec![START_C, FNC1_SYMBOL, 12]);
    assert_eq!(
        encode_str("\u{ca}a", false),
        vec![START_B, FNC1_SYMBOL, b'a' - b' ']
    );
}

#[test]
fn test_ucc_flag() {
    assert_eq!(
        encode_str("0100000090311314\u{ca}10ABC123", true),
        vec![
            START_C,
            FNC1_SYMBOL,
            1,
            0,
            0,
            0,
            90,
            31,
            13,
            14,
            FNC1_SYMBOL,
            10,
            SWITCH_B,
            b'A' - b' ',
            b'B' - b' ',
            b'C' - b' ',
            b'1' - b' ',
            b'2' - b' ',
            b'3' - b' ',
        ]
    );
}

#[test]
fn test_illegal_character() {
    assert_eq!(tokenize("ü"), Err(EncodingError::IllegalCharacter('ü')));
    assert_eq!(
        encode_tokens(&[Token::Char(b'a'), Token::Char(0xE9)], false),
        Err(EncodingError::IllegalCharacter('\u{e9}'))
    );
}
