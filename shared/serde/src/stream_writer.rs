use crate::{error::SerdeErr, MAX_FIELD_LENGTH};

/// A growable little-endian byte writer.
/// Messages are built into a Vec<u8> and handed to the transport as a whole.
pub struct StreamWriter {
    buffer: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn bytes_written(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes raw bytes with no length prefix
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a u16 length prefix followed by the bytes
    pub fn write_bytes_and_size(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        let length = u16::try_from(bytes.len()).map_err(|_| SerdeErr::LengthOverflow {
            length: bytes.len(),
            limit: MAX_FIELD_LENGTH,
        })?;
        self.write_u16(length);
        self.write_raw(bytes);
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), SerdeErr> {
        self.write_bytes_and_size(value.as_bytes())
    }
}

impl Default for StreamWriter {
    fn default() -> Self {
        Self::new()
    }
}
