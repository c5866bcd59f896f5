use crate::{error::SerdeErr, reader::ByteReader, stream_writer::StreamWriter};

/// A type that can be written to and read back from the wire
pub trait Serde: Sized {
    /// Writes the value into the stream
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr>;

    /// Parses a value out of the reader
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;
}

impl Serde for u8 {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_u8(*self);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_u8()
    }
}

impl Serde for bool {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_bool(*self);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_bool()
    }
}

impl Serde for i32 {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_i32(*self);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_i32()
    }
}

impl Serde for u32 {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_u32(*self);
        Ok(())
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_u32()
    }
}

impl Serde for String {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_string(self)
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_string()
    }
}

impl Serde for Vec<u8> {
    fn ser(&self, writer: &mut StreamWriter) -> Result<(), SerdeErr> {
        writer.write_bytes_and_size(self)
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_bytes_and_size()
    }
}
