//! In-game string transcoding.

use super::error::FormatError;
use crate::reader::{LittleEndianReader, slice_at_mut};

pub const TERMINATOR: u16 = 0xFFFF;

/// Characters the handheld stores at private-use code points, as
/// `(display, stored)` pairs.
const SUBSTITUTIONS: [(char, char); 3] = [
    ('\u{2640}', '\u{E08F}'),
    ('\u{2642}', '\u{E08E}'),
    ('\u{0027}', '\u{2019}'),
];

/// Maps between display characters and stored 16-bit code units.
pub trait GlyphTable {
    fn encode_char(&self, ch: char) -> Option<u16>;
    fn decode_unit(&self, unit: u16) -> Option<char>;
}

/// Treats every BMP code point as its own code unit.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf16Glyphs;

impl GlyphTable for Utf16Glyphs {
    fn encode_char(&self, ch: char) -> Option<u16> {
        u16::try_from(u32::from(ch))
            .ok()
            .filter(|&unit| unit != TERMINATOR)
    }

    fn decode_unit(&self, unit: u16) -> Option<char> {
        char::from_u32(u32::from(unit))
    }
}

fn to_stored(ch: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(display, _)| *display == ch)
        .map_or(ch, |&(_, stored)| stored)
}

fn to_display(ch: char) -> char {
    SUBSTITUTIONS
        .iter()
        .find(|(_, stored)| *stored == ch)
        .map_or(ch, |&(display, _)| display)
}

/// Read up to `max_units` code units, stopping at the terminator. Zero units
/// and units the table cannot map are skipped.
pub fn decode_string(
    bytes: &[u8],
    offset: usize,
    max_units: usize,
    glyphs: &dyn GlyphTable,
) -> Result<String, FormatError> {
    let mut reader = LittleEndianReader::at(bytes, offset);
    let units = reader.read_u16_vec(max_units)?;
    Ok(units
        .into_iter()
        .take_while(|&unit| unit != TERMINATOR)
        .filter(|&unit| unit != 0)
        .filter_map(|unit| glyphs.decode_unit(unit))
        .map(to_display)
        .collect())
}

/// Write `value` into a field of `field_len` bytes. Input longer than
/// `max_chars` is truncated; unmappable characters are dropped. The
/// terminator follows the last character and every remaining unit is zero.
pub fn encode_string(
    bytes: &mut [u8],
    offset: usize,
    field_len: usize,
    max_chars: usize,
    value: &str,
    glyphs: &dyn GlyphTable,
) -> Result<(), FormatError> {
    let field = slice_at_mut(bytes, offset, field_len, "string field")?;
    let units: Vec<u16> = value
        .chars()
        .take(max_chars)
        .map(to_stored)
        .filter_map(|ch| glyphs.encode_char(ch))
        .chain(std::iter::once(TERMINATOR))
        .collect();

    field.fill(0);
    for (chunk, unit) in field.chunks_exact_mut(2).zip(units) {
        chunk.copy_from_slice(&unit.to_le_bytes());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Utf16Glyphs, decode_string, encode_string};

    #[test]
    fn encode_truncates_and_terminates() {
        let mut bytes = [0xAAu8; 0x10];
        encode_string(&mut bytes, 0, 0x10, 7, "BARRY", &Utf16Glyphs).expect("encode");
        assert_eq!(&bytes[..2], &[b'B', 0]);
        assert_eq!(&bytes[10..12], &[0xFF, 0xFF]);
        assert!(bytes[12..].iter().all(|&b| b == 0));

        encode_string(&mut bytes, 0, 0x10, 7, "LONGNAMEXX", &Utf16Glyphs).expect("encode");
        assert_eq!(&bytes[14..16], &[0xFF, 0xFF]);
        let name = decode_string(&bytes, 0, 8, &Utf16Glyphs).expect("decode");
        assert_eq!(name, "LONGNAM");
    }

    #[test]
    fn special_characters_use_stored_code_points() {
        let mut bytes = [0u8; 0x10];
        encode_string(&mut bytes, 0, 0x10, 7, "A\u{2640}'", &Utf16Glyphs).expect("encode");
        assert_eq!(u16::from_le_bytes([bytes[2], bytes[3]]), 0xE08F);
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 0x2019);
        let name = decode_string(&bytes, 0, 8, &Utf16Glyphs).expect("decode");
        assert_eq!(name, "A\u{2640}'");
    }

    #[test]
    fn zeroed_field_decodes_empty() {
        let bytes = [0u8; 0x10];
        assert_eq!(decode_string(&bytes, 0, 8, &Utf16Glyphs).expect("decode"), "");
    }
}
