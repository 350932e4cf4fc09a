//! Application Identifiers of UCC/EAN-128.
//!
//! Composite data is written with parenthesized identifiers, for example
//! `(01)00000090311314(10)ABC123(15)060916`. Parsing removes the parentheses,
//! validates fixed length fields and separates variable length fields with
//! FNC1.

use crate::std::string::ToString;
use crate::std::vec::Vec;
#[cfg(test)]
use crate::std::{string::String, vec};

use crate::encode::{tokenize, EncodingError, Token};

/// Length rule of an Application Identifier.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AiLength {
    /// Total number of characters of identifier and value.
    Fixed(u8),
    /// The value is terminated by FNC1 unless it is the last field.
    Variable,
}

/// Look up the length rule of an Application Identifier.
pub const fn ai_length(ai: u32) -> Option<AiLength> {
    use AiLength::{Fixed, Variable};
    Some(match ai {
        0 => Fixed(20),
        1 | 2 => Fixed(16),
        10 => Variable,
        11 => Fixed(9),
        12 | 13 | 15 | 17 => Fixed(8),
        20 => Fixed(4),
        21..=23 => Variable,
        240 | 241 => Variable,
        250..=252 => Variable,
        30 => Variable,
        3100..=3699 => Fixed(10),
        37 => Variable,
        3900..=3939 => Variable,
        400 | 401 => Variable,
        402 => Fixed(20),
        403 => Variable,
        410..=415 => Fixed(16),
        420 | 421 => Variable,
        422 => Fixed(6),
        423 => Variable,
        424..=426 => Fixed(6),
        7001 => Fixed(17),
        7002 => Variable,
        7030..=7039 => Variable,
        8001 => Fixed(18),
        8002..=8004 => Variable,
        8005 => Fixed(10),
        8006 => Fixed(22),
        8007 | 8008 => Variable,
        8018 => Fixed(22),
        8020 => Variable,
        8100 => Fixed(10),
        8101 => Fixed(14),
        8102 => Fixed(6),
        90..=99 => Variable,
        _ => return None,
    })
}

/// Convert parenthesized UCC/EAN-128 data into tokens ready for encoding.
///
/// The identifiers are written without parentheses, at least two digits
/// wide. A variable length field is followed by FNC1 if another field comes
/// after it. Text not starting with `(` is tokenized unchanged.
///
/// ```
/// # use barcode128::{ai::parse_ucc, tokenize};
/// let tokens = parse_ucc("(10)ABC123(01)00000090311314").unwrap();
/// assert_eq!(tokens, tokenize("10ABC123\u{ca}0100000090311314").unwrap());
/// ```
pub fn parse_ucc(code: &str) -> Result<Vec<Token>, EncodingError> {
    if !code.starts_with('(') {
        return tokenize(code);
    }
    let mut tokens = Vec::with_capacity(code.len());
    let mut start = Some(0);
    while let Some(open) = start {
        let close = code[open..]
            .find(')')
            .map(|i| open + i)
            .ok_or_else(|| EncodingError::MalformedAi(code.to_string()))?;
        let digits = &code[open + 1..close];
        if digits.chars().count() < 2 {
            return Err(EncodingError::AiTooShort(digits.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::MalformedAi(code.to_string()));
        }
        let (ai, rule) = digits
            .parse::<u32>()
            .ok()
            .and_then(|ai| Some((ai, ai_length(ai)?)))
            .ok_or_else(|| EncodingError::AiNotFound(digits.to_string()))?;

        let canonical = crate::std::format!("{ai:02}");
        start = code[close..].find('(').map(|i| close + i);
        let value = &code[close + 1..start.unwrap_or(code.len())];
        log::debug!("AI ({canonical}) {rule:?}: {value:?}");

        match rule {
            AiLength::Fixed(len) => {
                if canonical.len() + value.chars().count() != len as usize {
                    return Err(EncodingError::AiLength(canonical));
                }
            }
            AiLength::Variable => (),
        }
        tokens.extend(canonical.bytes().map(Token::Char));
        tokens.extend(tokenize(value)?);
        if rule == AiLength::Variable && start.is_some() {
            tokens.push(Token::Fnc1);
        }
    }
    Ok(tokens)
}

/// Render tokens as text, FNC1 as [FNC1](crate::FNC1).
#[cfg(test)]
fn render(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Char(c) => char::from(*c),
            Token::Fnc1 => crate::FNC1,
        })
        .collect()
}

#[test]
fn test_table() {
    assert_eq!(ai_length(0), Some(AiLength::Fixed(20)));
    assert_eq!(ai_length(11), Some(AiLength::Fixed(9)));
    assert_eq!(ai_length(3100), Some(AiLength::Fixed(10)));
    assert_eq!(ai_length(3699), Some(AiLength::Fixed(10)));
    assert_eq!(ai_length(3700), None);
    assert_eq!(ai_length(3939), Some(AiLength::Variable));
    assert_eq!(ai_length(416), None);
    assert_eq!(ai_length(8018), Some(AiLength::Fixed(22)));
    assert_eq!(ai_length(90), Some(AiLength::Variable));
    assert_eq!(ai_length(99), Some(AiLength::Variable));
    assert_eq!(ai_length(14), None);
    assert_eq!(ai_length(99999), None);
}

#[test]
fn test_fixed_then_variable_last() {
    let tokens = parse_ucc("(01)00000090311314(10)ABC123").unwrap();
    assert_eq!(render(&tokens), "0100000090311314".to_string() + "10ABC123");
}

#[test]
fn test_variable_gets_separator() {
    let tokens = parse_ucc("(10)ABC123(01)00000090311314").unwrap();
    assert_eq!(render(&tokens), "10ABC123\u{ca}0100000090311314");

    let tokens = parse_ucc("(01)00000090311314(10)ABC123(15)060916").unwrap();
    assert_eq!(render(&tokens), "010000009031131410ABC123\u{ca}15060916");
}

#[test]
fn test_canonical_identifier() {
    // leading zeros are normalized before the length check
    let tokens = parse_ucc("(0001)00000090311314").unwrap();
    assert_eq!(render(&tokens), "0100000090311314");
    let tokens = parse_ucc("(3102)000123").unwrap();
    assert_eq!(render(&tokens), "3102000123");
}

#[test]
fn test_errors() {
    assert_eq!(
        parse_ucc("(01)0000009031131(10)ABC123"),
        Err(EncodingError::AiLength("01".into()))
    );
    assert_eq!(
        parse_ucc("(99999)X"),
        Err(EncodingError::AiNotFound("99999".into()))
    );
    assert_eq!(
        parse_ucc("(14)12345678"),
        Err(EncodingError::AiNotFound("14".into()))
    );
    assert_eq!(
        parse_ucc("(10ABC"),
        Err(EncodingError::MalformedAi("(10ABC".into()))
    );
    assert_eq!(parse_ucc("(1)A"), Err(EncodingError::AiTooShort("1".into())));
    assert_eq!(parse_ucc("()A"), Err(EncodingError::AiTooShort("".into())));
    assert_eq!(
        parse_ucc("(ab)A"),
        Err(EncodingError::MalformedAi("(ab)A".into()))
    );
    assert_eq!(
        parse_ucc("(10)Aü"),
        Err(EncodingError::IllegalCharacter('ü'))
    );
}

#[test]
fn test_plain_text_passes() {
    assert_eq!(render(&parse_ucc("0112").unwrap()), "0112");
}

#[test]
fn test_only_variable_fields() {
    let tokens: Vec<Token> = parse_ucc("(21)A(22)B(23)C").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Char(b'2'),
            Token::Char(b'1'),
            Token::Char(b'A'),
            Token::Fnc1,
            Token::Char(b'2'),
            Token::Char(b'2'),
            Token::Char(b'B'),
            Token::Fnc1,
            Token::Char(b'2'),
            Token::Char(b'3'),
            Token::Char(b'C'),
        ]
    );
}
