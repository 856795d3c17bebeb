use crate::sav4::FormatError;

/// Cursor over an in-memory save image. All multi-byte values are
/// little-endian, matching the handheld's native layout.
pub struct LittleEndianReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> LittleEndianReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        let buf = self.take::<1>()?;
        Ok(buf[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, FormatError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    pub fn read_u16_vec(&mut self, n: usize) -> Result<Vec<u16>, FormatError> {
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            result.push(self.read_u16()?);
        }
        Ok(result)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let slice = slice_at(self.bytes, self.pos, N, "scalar")?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        self.pos += N;
        Ok(buf)
    }
}

pub fn slice_at<'a>(
    bytes: &'a [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a [u8], FormatError> {
    check_span(bytes.len(), offset, len, what)?;
    Ok(&bytes[offset..offset + len])
}

pub fn slice_at_mut<'a>(
    bytes: &'a mut [u8],
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<&'a mut [u8], FormatError> {
    check_span(bytes.len(), offset, len, what)?;
    Ok(&mut bytes[offset..offset + len])
}

pub fn check_span(
    buf_len: usize,
    offset: usize,
    len: usize,
    what: &'static str,
) -> Result<(), FormatError> {
    match offset.checked_add(len) {
        Some(end) if end <= buf_len => Ok(()),
        _ => Err(FormatError::OutOfBounds { what, offset, len }),
    }
}

pub fn read_u16_at(bytes: &[u8], offset: usize) -> Result<u16, FormatError> {
    LittleEndianReader::at(bytes, offset).read_u16()
}

pub fn read_u32_at(bytes: &[u8], offset: usize) -> Result<u32, FormatError> {
    LittleEndianReader::at(bytes, offset).read_u32()
}

pub fn patch_u8(
    bytes: &mut [u8],
    offset: usize,
    raw: u8,
    field: &'static str,
) -> Result<(), FormatError> {
    slice_at_mut(bytes, offset, 1, field)?[0] = raw;
    Ok(())
}

pub fn patch_u16(
    bytes: &mut [u8],
    offset: usize,
    raw: u16,
    field: &'static str,
) -> Result<(), FormatError> {
    slice_at_mut(bytes, offset, 2, field)?.copy_from_slice(&raw.to_le_bytes());
    Ok(())
}

pub fn patch_u32(
    bytes: &mut [u8],
    offset: usize,
    raw: u32,
    field: &'static str,
) -> Result<(), FormatError> {
    slice_at_mut(bytes, offset, 4, field)?.copy_from_slice(&raw.to_le_bytes());
    Ok(())
}

pub fn patch_i32(
    bytes: &mut [u8],
    offset: usize,
    raw: i32,
    field: &'static str,
) -> Result<(), FormatError> {
    slice_at_mut(bytes, offset, 4, field)?.copy_from_slice(&raw.to_le_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{LittleEndianReader, check_span, patch_u16};
    use crate::sav4::FormatError;

    #[test]
    fn reads_little_endian_values_in_sequence() {
        let bytes = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0xFF];
        let mut r = LittleEndianReader::new(&bytes);
        assert_eq!(r.read_u16().expect("u16"), 0x1234);
        assert_eq!(r.read_u32().expect("u32"), 0x1234_5678);
        assert_eq!(r.read_u8().expect("u8"), 0xFF);
        assert!(r.read_u8().is_err());
        assert_eq!(r.position(), 7);
    }

    #[test]
    fn span_check_rejects_overflowing_offsets() {
        assert!(check_span(16, 14, 2, "tail").is_ok());
        assert!(matches!(
            check_span(16, 15, 2, "tail"),
            Err(FormatError::OutOfBounds { offset: 15, len: 2, .. })
        ));
        assert!(check_span(16, usize::MAX, 2, "wrap").is_err());
    }

    #[test]
    fn patch_leaves_buffer_untouched_when_out_of_range() {
        let mut bytes = [0u8; 4];
        assert!(patch_u16(&mut bytes, 3, 0xBEEF, "tid").is_err());
        assert_eq!(bytes, [0u8; 4]);
    }
}
