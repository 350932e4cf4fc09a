//! This crate implements encoding of Code 128 and UCC/EAN-128 (GS1-128)
//! linear barcodes.
//!
//! Text is converted to symbols using the three charsets of Code 128: A for
//! control characters and upper case letters, B for printable ASCII and C for
//! pairs of digits. Charsets are selected greedily: a code starts in charset
//! C for two leading digits, later on four consecutive digits are needed to
//! switch to C.
//!
//! ## Example
//!
//! ```rust
//! use barcode128::{Code128, bars_to_blocks};
//!
//! let code = Code128::encode("Hello!").unwrap();
//! println!("{}", bars_to_blocks(code.bars()));
//! ```
//! To create other outputs check out the [Code128] documentation.
//!
//! ## UCC/EAN-128
//!
//! Composite data with Application Identifiers is written with parentheses
//! around each identifier:
//!
//! ```rust
//! use barcode128::Code128;
//!
//! let code = Code128::encode_ucc("(01)00000090311314(10)ABC123").unwrap();
//! assert_eq!(code.symbols()[1], barcode128::FNC1_SYMBOL);
//! ```
//!
//! Fixed length fields are validated, variable length fields are terminated
//! with FNC1 when another field follows. See [ai] for the known identifiers.
//!
//! ## Charsets
//!
//! Only ASCII, `0x00` to `0x7F`, can be encoded. The character [FNC1] is a
//! placeholder for the FNC1 function character.
#![no_std]

#[cfg(not(feature = "std"))]
extern crate alloc as std;
#[cfg(feature = "std")]
extern crate std;

use std::string::String;
#[cfg(test)]
use std::vec;
use std::vec::Vec;

pub mod ai;
mod decode;
mod encode;
mod raster;
#[cfg(feature = "unicode")]
mod unicode;

pub use decode::{decode, decode_symbols, DecodingError};
pub use encode::{encode_tokens, tokenize, EncodingError, Token, FNC1};
pub use raster::Raster;

#[cfg(feature = "unicode")]
pub use unicode::bars_to_blocks;

/// Switch to charset C.
pub const SWITCH_C: u8 = 99;
/// Switch to charset B.
pub const SWITCH_B: u8 = 100;
/// Switch to charset A.
pub const SWITCH_A: u8 = 101;
/// The FNC1 symbol.
pub const FNC1_SYMBOL: u8 = 102;
/// Start in charset A.
pub const START_A: u8 = 103;
/// Start in charset B.
pub const START_B: u8 = 104;
/// Start in charset C.
pub const START_C: u8 = 105;

/// Separates symbol values from the caption in [raw](Code128::from_raw) input.
pub const RAW_CAPTION: char = '\u{ffff}';

fn checksum(symbols: impl Iterator<Item = u8>) -> u8 {
    (symbols
        .enumerate()
        .map(|(i, idx)| (i.max(1) as u64) * idx as u64)
        .sum::<u64>()
        % 103) as u8
}

/// Representation of a "black line" in the code.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Bar {
    /// The width of the line.
    ///
    /// Ranges from one to four.
    pub width: u8,
    /// White space after the line.
    ///
    /// Zero for the final bar of the stop pattern.
    pub space: u8,
}

/// A coordinate of a bar in a barcode.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct BarCoordinate {
    /// The x coordinate, started from the left.
    ///
    /// The first bar will always be at 10, which is the
    /// offset for the left quiet zone.
    pub x: u32,
    /// The width of the bar.
    pub width: u8,
}

/// The kind of input a [Code128Builder] expects.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum CodeType {
    /// Plain Code 128 from ASCII text.
    #[default]
    Code128,
    /// UCC/EAN-128, text may contain parenthesized Application Identifiers.
    Ucc,
    /// Literal symbol values, optionally followed by [RAW_CAPTION] and caption text.
    Raw,
}

/// A Code 128.
///
/// The symbols, including the checksum, are available with
/// [`symbols()`](Self::symbols). For drawing use the module widths
/// [`widths()`](Self::widths), the bar iterators [`bars()`](Self::bars) or
/// [`bar_coordinates()`](Self::bar_coordinates) and the [size](Self::len),
/// or let [`raster()`](Self::raster) paint a pixel buffer.
///
/// A bar with width one is called a "module". You can say a bar consists of one
/// or more modules. The width of a module is often called "X", denoting one
/// unit in the "x-dimension" of the barcode.
///
/// ## Pseudo code for visualization
///
/// The standard demands a quiet zone of size 10X on the left and right side
/// of the code. To compute the size of a bar, multiply its width with the
/// available space for the code divided by the [code's length](Self::len).
///
/// ```rust
/// # use barcode128::Code128;
/// let code = Code128::encode("Code128 <3").unwrap();
/// let available_space = 100.0; // unit is, say, "pt"
/// let line_width = available_space / code.len() as f64;
/// for bar in code.bar_coordinates() {
///      let x = bar.x as f64 * line_width;
///      let width = bar.width as f64 * line_width;
///      // print line at `x` pt, `width` pt wide
/// }
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct Code128 {
    symbols: Vec<u8>,
    text: String,
}

impl Code128 {
    /// Encode ASCII text as Code 128.
    ///
    /// Fails with [EncodingError::IllegalCharacter] for characters above
    /// `0x7F` other than [FNC1].
    pub fn encode(text: &str) -> Result<Self, EncodingError> {
        Code128Builder::default().encode(text)
    }

    /// Encode text as UCC/EAN-128.
    ///
    /// If the text starts with `(` it is parsed as Application Identifiers
    /// and their values, see [ai::parse_ucc].
    pub fn encode_ucc(text: &str) -> Result<Self, EncodingError> {
        Code128Builder::default()
            .with_code_type(CodeType::Ucc)
            .encode(text)
    }

    /// Build a code from literal symbol values.
    ///
    /// Each character before [RAW_CAPTION] is one symbol value, the text after
    /// it is the caption. The symbols should start with a start symbol, this
    /// is not checked.
    ///
    /// ```rust
    /// # use barcode128::{Code128, START_B};
    /// let raw = "\u{68}\u{21}\u{22}\u{ffff}AB";
    /// let code = Code128::from_raw(raw).unwrap();
    /// assert_eq!(&code.symbols()[..3], &[START_B, 33, 34]);
    /// assert_eq!(code.human_readable(), "AB");
    /// ```
    pub fn from_raw(raw: &str) -> Result<Self, EncodingError> {
        let (code, caption) = raw.split_once(RAW_CAPTION).unwrap_or((raw, ""));
        let symbols = code
            .chars()
            .map(|c| match u32::from(c) {
                value @ 0..=105 => Ok(value as u8),
                value => Err(EncodingError::InvalidSymbol(value)),
            })
            .collect::<Result<Vec<u8>, _>>()?;
        Self::with_checksum(symbols, caption.into())
    }

    /// Build a code from symbol values, without caption.
    pub fn from_symbols(symbols: &[u8]) -> Result<Self, EncodingError> {
        if let Some(&value) = symbols.iter().find(|&&s| s > START_C) {
            return Err(EncodingError::InvalidSymbol(value.into()));
        }
        Self::with_checksum(symbols.into(), String::new())
    }

    fn with_checksum(mut symbols: Vec<u8>, text: String) -> Result<Self, EncodingError> {
        if symbols.is_empty() {
            return Err(EncodingError::NoSymbols);
        }
        symbols.push(checksum(symbols.iter().cloned()));
        Ok(Self { symbols, text })
    }

    /// The symbol values, ending with the checksum.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// The checksum symbol.
    pub fn checksum(&self) -> u8 {
        self.symbols[self.symbols.len() - 1]
    }

    /// The caption to print with the code.
    ///
    /// This is the encoded text without FNC1, the original input for
    /// UCC/EAN-128, or the text after [RAW_CAPTION] in raw mode.
    pub fn human_readable(&self) -> &str {
        &self.text
    }

    /// Get the widths of bars and spaces, alternating and starting with a bar.
    ///
    /// Every symbol adds six widths, the stop pattern seven.
    pub fn widths(&self) -> impl Iterator<Item = u8> + '_ {
        self.symbols
            .iter()
            .flat_map(|idx| encode::PATTERNS[*idx as usize])
            .chain(encode::STOP_PATTERN)
    }

    /// Get the sequence of bars this Code 128 consists of.
    pub fn bars(&self) -> impl Iterator<Item = Bar> + '_ {
        let mut widths = self.widths();
        core::iter::from_fn(move || {
            let width = widths.next()?;
            let space = widths.next().unwrap_or(0);
            Some(Bar { width, space })
        })
    }

    /// Get the coordinates of the bars this Code 128 consists of.
    pub fn bar_coordinates(&self) -> impl Iterator<Item = BarCoordinate> + '_ {
        self.bars().scan(10, |pos, bar| {
            let x = *pos;
            *pos += bar.width as u32 + bar.space as u32;
            Some(BarCoordinate {
                x,
                width: bar.width,
            })
        })
    }

    /// Paint the code into a pixel buffer of the given height.
    ///
    /// No quiet zone is added.
    pub fn raster<C: Copy>(&self, foreground: C, background: C, height: usize) -> Raster<C> {
        Raster::new(self.widths(), foreground, background, height)
    }

    /// Get the total width of the code in units of the [Bar](crate::Bar)
    /// with the quiet zone included.
    pub fn len(&self) -> usize {
        self.symbols.len() * 11 + 13 + 20
    }

    /// Whether this Code 128 encodes no characters.
    pub fn is_empty(&self) -> bool {
        let data = &self.symbols[1..self.symbols.len() - 1];
        data.iter().all(|&s| s == FNC1_SYMBOL)
    }
}

/// Builder for encoding a Code 128 with more control.
#[derive(Debug, Clone, Copy, Default)]
pub struct Code128Builder {
    code_type: CodeType,
}

impl Code128Builder {
    /// Which kind of input should be encoded.
    pub fn with_code_type(self, code_type: CodeType) -> Self {
        Self { code_type }
    }

    /// Encode the text according to the [CodeType].
    pub fn encode(self, text: &str) -> Result<Code128, EncodingError> {
        match self.code_type {
            CodeType::Code128 => {
                let tokens = tokenize(text)?;
                let caption = text.chars().filter(|&c| c != FNC1).collect();
                Code128::with_checksum(encode_tokens(&tokens, false)?, caption)
            }
            CodeType::Ucc => {
                let tokens = ai::parse_ucc(text)?;
                Code128::with_checksum(encode_tokens(&tokens, true)?, text.into())
            }
            CodeType::Raw => Code128::from_raw(text),
        }
    }
}

#[test]
fn test_code_size() {
    let code = Code128::encode("foo").unwrap();
    let size = code
        .bars()
        .map(|m| m.width as u32 + m.space as u32)
        .sum::<u32>()
        + 20;
    assert_eq!(code.len(), size as usize);
}

#[test]
fn test_width_count() {
    for text in ["", "a", "AB1234", "\n\t12345x", "(01)"] {
        let code = Code128::encode(text).unwrap();
        let data_symbols = code.symbols().len() - 1;
        assert_eq!(code.widths().count(), 6 * (data_symbols + 1) + 7);
    }
    assert_eq!(Code128::encode("").unwrap().widths().count(), 19);
}

#[test]
fn test_checksum() {
    for text in ["", "Hello World", "1234567890", "a\u{ca}12"] {
        let code = Code128::encode(text).unwrap();
        let (check, data) = code.symbols().split_last().unwrap();
        let sum: u32 = data
            .iter()
            .enumerate()
            .map(|(k, &v)| k.max(1) as u32 * v as u32)
            .sum();
        assert_eq!(sum % 103, *check as u32);
    }
    assert_eq!(Code128::encode("").unwrap().checksum(), START_B % 103);
}

#[test]
fn test_empty() {
    let code = Code128::encode("").unwrap();
    assert_eq!(code.symbols(), &[START_B, 1]);
    let code = Code128::encode_ucc("").unwrap();
    assert_eq!(code.symbols()[..2], [START_B, FNC1_SYMBOL]);
}

#[test]
fn test_is_empty() {
    assert!(Code128::encode("").unwrap().is_empty());
    assert!(Code128::encode_ucc("").unwrap().is_empty());
    assert!(!Code128::encode(".").unwrap().is_empty());
}

#[test]
fn test_ucc_symbols() {
    let code = Code128::encode_ucc("(01)00000090311314(10)ABC123").unwrap();
    let (_, data) = code.symbols().split_last().unwrap();
    assert_eq!(
        data,
        &[
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
            10,
            SWITCH_B,
            33,
            34,
            35,
            17,
            18,
            19
        ]
    );
    assert_eq!(code.human_readable(), "(01)00000090311314(10)ABC123");
}

#[test]
fn test_ucc_errors() {
    assert!(matches!(
        Code128::encode_ucc("(01)123(10)ABC123"),
        Err(EncodingError::AiLength(_))
    ));
    assert!(matches!(
        Code128::encode_ucc("(99999)X"),
        Err(EncodingError::AiNotFound(_))
    ));
}

#[test]
fn test_illegal_character() {
    assert_eq!(
        Code128::encode("Füße"),
        Err(EncodingError::IllegalCharacter('ü'))
    );
    assert_eq!(
        Code128::encode("\u{20ac}"),
        Err(EncodingError::IllegalCharacter('\u{20ac}'))
    );
}

#[test]
fn test_raw() {
    let code = Code128::from_raw("\u{68}\u{21}").unwrap();
    assert_eq!(code.symbols(), Code128::encode("A").unwrap().symbols());
    assert_eq!(code.human_readable(), "");

    let code = Code128Builder::default()
        .with_code_type(CodeType::Raw)
        .encode("\u{69}\u{0c}\u{ffff}12")
        .unwrap();
    assert_eq!(code.symbols(), Code128::encode("12").unwrap().symbols());
    assert_eq!(code.human_readable(), "12");

    assert_eq!(
        Code128::from_raw("\u{68}\u{6a}"),
        Err(EncodingError::InvalidSymbol(106))
    );
    assert_eq!(
        Code128::from_raw("\u{ffff}caption"),
        Err(EncodingError::NoSymbols)
    );
    assert_eq!(
        Code128::from_symbols(&[START_A, 200]),
        Err(EncodingError::InvalidSymbol(200))
    );
}

#[test]
fn test_caption_without_fnc1() {
    let code = Code128::encode("12\u{ca}34").unwrap();
    assert_eq!(code.human_readable(), "1234");
}

#[test]
fn test_raster_size() {
    let code = Code128::encode("AB1234").unwrap();
    let raster = code.raster(1u8, 0u8, 4);
    let data_symbols = code.symbols().len() - 1;
    assert_eq!(raster.width(), (data_symbols + 2) * 11 + 2);
    assert_eq!(raster.height(), 4);
}

#[test]
fn test_bar_coordinates() {
    let code = Code128::encode("").unwrap();
    let bars: Vec<_> = code.bar_coordinates().collect();
    assert_eq!(bars[0], BarCoordinate { x: 10, width: 2 });
    assert_eq!(bars[1], BarCoordinate { x: 13, width: 1 });
    assert_eq!(bars[2], BarCoordinate { x: 16, width: 1 });
    assert_eq!(bars[3], BarCoordinate { x: 21, width: 2 });
    assert_eq!(bars[4], BarCoordinate { x: 25, width: 2 });
    assert_eq!(bars[5], BarCoordinate { x: 28, width: 2 });
    assert_eq!(bars[6], BarCoordinate { x: 32, width: 2 });
    assert_eq!(bars[7], BarCoordinate { x: 37, width: 3 });
    assert_eq!(bars[8], BarCoordinate { x: 41, width: 1 });
    assert_eq!(bars[9], BarCoordinate { x: 43, width: 2 });
    assert_eq!(bars.len(), 10);
}

#[test]
fn test_stop_bars() {
    let code = Code128::encode("x").unwrap();
    let bars: Vec<Bar> = code.bars().collect();
    assert_eq!(
        bars[bars.len() - 4..],
        vec![
            Bar { width: 2, space: 3 },
            Bar { width: 3, space: 1 },
            Bar { width: 1, space: 1 },
            Bar { width: 2, space: 0 },
        ]
    );
}
