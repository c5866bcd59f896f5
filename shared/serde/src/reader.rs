use crate::error::SerdeErr;

/// Reads little-endian fields out of a received payload.
///
/// SECURITY: payloads come off the network; every read is bounds-checked and
/// reports a [`SerdeErr`] instead of panicking.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'b [u8], SerdeErr> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SerdeErr::UnexpectedEnd { needed, remaining });
        }
        let slice = &self.buffer[self.position..self.position + needed];
        self.position += needed;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let mut output = [0u8; N];
        output.copy_from_slice(self.take(N)?);
        Ok(output)
    }

    pub fn read_u8(&mut self) -> Result<u8, SerdeErr> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, SerdeErr> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SerdeErr::InvalidBool { value }),
        }
    }

    pub fn read_u16(&mut self) -> Result<u16, SerdeErr> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, SerdeErr> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_bytes_and_size(&mut self) -> Result<Vec<u8>, SerdeErr> {
        let length = usize::from(self.read_u16()?);
        Ok(self.take(length)?.to_vec())
    }

    pub fn read_string(&mut self) -> Result<String, SerdeErr> {
        let bytes = self.read_bytes_and_size()?;
        let length = bytes.len();
        String::from_utf8(bytes).map_err(|_| SerdeErr::InvalidUtf8 { length })
    }
}
