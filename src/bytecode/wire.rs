//! Byte-level plumbing for the image format. Everything is little-endian.

use super::ImageError;

/// Cursor over an untrusted byte slice. Every read is bounds-checked and
/// reports [`ImageError::Truncated`] instead of panicking.
pub(super) struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub(super) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub(super) fn is_empty(&self) -> bool {
        self.offset == self.bytes.len()
    }

    pub(super) fn rest(&self) -> &'a [u8] {
        &self.bytes[self.offset..]
    }

    pub(super) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], ImageError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(ImageError::Truncated)?;
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub(super) fn read_u8(&mut self) -> Result<u8, ImageError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub(super) fn read_u16(&mut self) -> Result<u16, ImageError> {
        let mut buf = [0u8; 2];
        buf.copy_from_slice(self.read_bytes(2)?);
        Ok(u16::from_le_bytes(buf))
    }

    pub(super) fn read_u32(&mut self) -> Result<u32, ImageError> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.read_bytes(4)?);
        Ok(u32::from_le_bytes(buf))
    }

    pub(super) fn read_u64(&mut self) -> Result<u64, ImageError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(8)?);
        Ok(u64::from_le_bytes(buf))
    }

    pub(super) fn read_f64(&mut self) -> Result<f64, ImageError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.read_bytes(8)?);
        Ok(f64::from_le_bytes(buf))
    }

    /// Reads a u64 length prefix and narrows it to `usize`.
    pub(super) fn read_len(&mut self) -> Result<usize, ImageError> {
        let len = self.read_u64()?;
        usize::try_from(len)
            .map_err(|_| ImageError::Malformed(format!("length {len} does not fit this platform")))
    }

    /// Reads a u64-length-prefixed UTF-8 string.
    pub(super) fn read_string(&mut self) -> Result<String, ImageError> {
        let len = self.read_len()?;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ImageError::Malformed("string is not valid UTF-8".to_string()))
    }
}

pub(super) fn put_u8(out: &mut Vec<u8>, value: u8) {
    out.push(value);
}

pub(super) fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(super) fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(super) fn put_u64(out: &mut Vec<u8>, value: u64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(super) fn put_f64(out: &mut Vec<u8>, value: f64) {
    out.extend_from_slice(&value.to_le_bytes());
}

pub(super) fn put_string(out: &mut Vec<u8>, value: &str) {
    put_u64(out, value.len() as u64);
    out.extend_from_slice(value.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian() {
        let mut bytes = Vec::new();
        put_u16(&mut bytes, 0x0102);
        put_u32(&mut bytes, 7);
        put_f64(&mut bytes, 2.5);

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_u16().unwrap(), 0x0102);
        assert_eq!(reader.read_u32().unwrap(), 7);
        assert_eq!(reader.read_f64().unwrap(), 2.5);
        assert!(reader.is_empty());
    }

    #[test]
    fn truncated_reads_fail() {
        let mut reader = Reader::new(&[1, 2, 3]);
        assert_eq!(reader.read_u32(), Err(ImageError::Truncated));
    }

    #[test]
    fn strings_round_trip() {
        let mut bytes = Vec::new();
        put_string(&mut bytes, "héllo");

        let mut reader = Reader::new(&bytes);
        assert_eq!(reader.read_string().unwrap(), "héllo");
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let mut bytes = Vec::new();
        put_u64(&mut bytes, 2);
        bytes.extend_from_slice(&[0xFF, 0xFE]);

        let mut reader = Reader::new(&bytes);
        assert!(matches!(
            reader.read_string(),
            Err(ImageError::Malformed(_))
        ));
    }
}
