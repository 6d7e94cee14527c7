//! Big-endian data stream reader and writer.
//!
//! The layout matches Qt 5 `QDataStream`, so shapes written by the older
//! Qt based tool can be read back and the other way round.

use std::io::{self, Read, Write};

use crate::domain::{DiagPoints, FourPoints, PenColor, PointF, ShapeKind, Toolshape};

use super::error::{CodecError, CodecResult};

/// Length prefix marking a null string.
pub const NULL_STRING: u32 = u32::MAX;

/// Color spec ids as stored in the stream.
const COLOR_SPEC_INVALID: i8 = 0;
const COLOR_SPEC_RGB: i8 = 1;

/// Upper bound on list preallocation so corrupt counts cannot exhaust memory.
const MAX_PREALLOC: usize = 1024;

/// Values that can be extracted from a stream.
pub trait StreamRead: Sized {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self>;
}

/// Values that can be inserted into a stream.
pub trait StreamWrite {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()>;
}

/// Reads primitive and shape values from a big-endian stream.
pub struct StreamReader<R: Read> {
    reader: R,
}

impl<R: Read> StreamReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Read any value implementing [`StreamRead`].
    pub fn read<T: StreamRead>(&mut self) -> CodecResult<T> {
        T::read_from(self)
    }

    pub fn read_u8(&mut self) -> CodecResult<u8> {
        let mut buf = [0u8; 1];
        self.reader.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_i8(&mut self) -> CodecResult<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> CodecResult<u16> {
        let mut buf = [0u8; 2];
        self.reader.read_exact(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_u32(&mut self) -> CodecResult<u32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_i32(&mut self) -> CodecResult<i32> {
        let mut buf = [0u8; 4];
        self.reader.read_exact(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    pub fn read_f64(&mut self) -> CodecResult<f64> {
        let mut buf = [0u8; 8];
        self.reader.read_exact(&mut buf)?;
        Ok(f64::from_be_bytes(buf))
    }

    pub fn read_bool(&mut self) -> CodecResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Read exactly `len` bytes without trusting `len` for the allocation.
    fn read_bytes(&mut self, len: usize) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(MAX_PREALLOC));
        self.reader
            .by_ref()
            .take(len as u64)
            .read_to_end(&mut buf)?;
        if buf.len() < len {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(buf)
    }

    /// Read a string, `None` when the stream holds a null string.
    pub fn read_nullable_string(&mut self) -> CodecResult<Option<String>> {
        let len = self.read_u32()?;
        if len == NULL_STRING {
            return Ok(None);
        }
        if len % 2 != 0 {
            return Err(CodecError::OddStringLength(len));
        }
        let bytes = self.read_bytes(len as usize)?;
        let units: Vec<u16> = bytes
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16(&units)
            .map(Some)
            .map_err(|_| CodecError::InvalidUtf16)
    }

    /// Read a string, a null string reads as empty.
    pub fn read_string(&mut self) -> CodecResult<String> {
        Ok(self.read_nullable_string()?.unwrap_or_default())
    }

    /// Read a length-prefixed byte array (`0xFFFFFFFF` reads as empty).
    pub fn read_byte_array(&mut self) -> CodecResult<Vec<u8>> {
        let len = self.read_u32()?;
        if len == NULL_STRING {
            return Ok(Vec::new());
        }
        self.read_bytes(len as usize)
    }
}

/// Writes primitive and shape values to a big-endian stream.
pub struct StreamWriter<W: Write> {
    writer: W,
}

impl<W: Write> StreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write any value implementing [`StreamWrite`].
    pub fn write<T: StreamWrite + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        value.write_to(self)
    }

    pub fn write_u8(&mut self, value: u8) -> CodecResult<()> {
        Ok(self.writer.write_all(&[value])?)
    }

    pub fn write_i8(&mut self, value: i8) -> CodecResult<()> {
        self.write_u8(value as u8)
    }

    pub fn write_u16(&mut self, value: u16) -> CodecResult<()> {
        Ok(self.writer.write_all(&value.to_be_bytes())?)
    }

    pub fn write_u32(&mut self, value: u32) -> CodecResult<()> {
        Ok(self.writer.write_all(&value.to_be_bytes())?)
    }

    pub fn write_i32(&mut self, value: i32) -> CodecResult<()> {
        Ok(self.writer.write_all(&value.to_be_bytes())?)
    }

    pub fn write_f64(&mut self, value: f64) -> CodecResult<()> {
        Ok(self.writer.write_all(&value.to_be_bytes())?)
    }

    pub fn write_bool(&mut self, value: bool) -> CodecResult<()> {
        self.write_u8(u8::from(value))
    }

    /// Write a string as UTF-16BE, `None` becomes a null string.
    pub fn write_nullable_string(&mut self, value: Option<&str>) -> CodecResult<()> {
        let Some(s) = value else {
            return self.write_u32(NULL_STRING);
        };
        let units: Vec<u16> = s.encode_utf16().collect();
        self.write_len(units.len() * 2)?;
        for unit in units {
            self.write_u16(unit)?;
        }
        Ok(())
    }

    pub fn write_string(&mut self, value: &str) -> CodecResult<()> {
        self.write_nullable_string(Some(value))
    }

    pub fn write_byte_array(&mut self, value: &[u8]) -> CodecResult<()> {
        self.write_len(value.len())?;
        Ok(self.writer.write_all(value)?)
    }

    /// Write a `u32` length prefix, rejecting lengths that collide with the null marker.
    fn write_len(&mut self, len: usize) -> CodecResult<()> {
        let len = u32::try_from(len)
            .ok()
            .filter(|len| *len != NULL_STRING)
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds u32"))?;
        self.write_u32(len)
    }

    pub fn flush(&mut self) -> CodecResult<()> {
        Ok(self.writer.flush()?)
    }
}

impl StreamRead for i32 {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        reader.read_i32()
    }
}

impl StreamWrite for i32 {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_i32(*self)
    }
}

impl StreamRead for f64 {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        reader.read_f64()
    }
}

impl StreamWrite for f64 {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_f64(*self)
    }
}

impl StreamRead for bool {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        reader.read_bool()
    }
}

impl StreamWrite for bool {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_bool(*self)
    }
}

impl StreamRead for String {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        reader.read_string()
    }
}

impl StreamWrite for String {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_string(self)
    }
}

impl StreamWrite for str {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_string(self)
    }
}

impl<T: StreamRead> StreamRead for Vec<T> {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        let count = reader.read_u32()? as usize;
        let mut items = Vec::with_capacity(count.min(MAX_PREALLOC));
        for _ in 0..count {
            items.push(T::read_from(reader)?);
        }
        Ok(items)
    }
}

impl<T: StreamWrite> StreamWrite for [T] {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        let count = u32::try_from(self.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "list exceeds u32"))?;
        writer.write_u32(count)?;
        for item in self {
            item.write_to(writer)?;
        }
        Ok(())
    }
}

impl<T: StreamWrite> StreamWrite for Vec<T> {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        self.as_slice().write_to(writer)
    }
}

impl StreamRead for PointF {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        let x = reader.read_f64()?;
        let y = reader.read_f64()?;
        Ok(PointF { x, y })
    }
}

impl StreamWrite for PointF {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_f64(self.x)?;
        writer.write_f64(self.y)
    }
}

/// Scale a 16-bit channel down to 8 bits.
fn channel_to_u8(value: u16) -> u8 {
    ((u32::from(value) + 128) / 257) as u8
}

impl StreamRead for PenColor {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        let spec = reader.read_i8()?;
        let alpha = reader.read_u16()?;
        let red = reader.read_u16()?;
        let green = reader.read_u16()?;
        let blue = reader.read_u16()?;
        let _pad = reader.read_u16()?;
        match spec {
            COLOR_SPEC_INVALID => Ok(PenColor::default()),
            COLOR_SPEC_RGB => Ok(PenColor::rgba(
                channel_to_u8(red),
                channel_to_u8(green),
                channel_to_u8(blue),
                channel_to_u8(alpha),
            )),
            other => Err(CodecError::UnsupportedColorSpec(other)),
        }
    }
}

impl StreamWrite for PenColor {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_i8(COLOR_SPEC_RGB)?;
        for channel in [self.a, self.r, self.g, self.b] {
            writer.write_u16(u16::from(channel) * 257)?;
        }
        writer.write_u16(0)
    }
}

impl StreamRead for Option<ShapeKind> {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        match reader.read_nullable_string()? {
            Some(label) if !label.is_empty() => Ok(Some(label.parse()?)),
            _ => Ok(None),
        }
    }
}

impl StreamWrite for Option<ShapeKind> {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write_nullable_string(self.map(ShapeKind::as_str))
    }
}

impl StreamRead for DiagPoints {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        Ok(DiagPoints {
            master_point: reader.read()?,
            deputy_point: reader.read()?,
        })
    }
}

impl StreamWrite for DiagPoints {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write(&self.master_point)?;
        writer.write(&self.deputy_point)
    }
}

impl StreamRead for FourPoints {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        Ok(FourPoints {
            point1: reader.read()?,
            point2: reader.read()?,
            point3: reader.read()?,
            point4: reader.read()?,
            shape_type: reader.read()?,
            points: reader.read()?,
        })
    }
}

impl StreamWrite for FourPoints {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        for point in self.corners() {
            writer.write(&point)?;
        }
        writer.write(&self.shape_type)?;
        writer.write(&self.points)
    }
}

impl StreamRead for Toolshape {
    fn read_from<R: Read>(reader: &mut StreamReader<R>) -> CodecResult<Self> {
        Ok(Toolshape {
            kind: reader.read()?,
            main_points: reader.read()?,
            line_width: reader.read()?,
            pen_color: reader.read()?,
            is_blur: reader.read()?,
            is_mosaic: reader.read()?,
            font_size: reader.read()?,
            points: reader.read()?,
        })
    }
}

impl StreamWrite for Toolshape {
    fn write_to<W: Write>(&self, writer: &mut StreamWriter<W>) -> CodecResult<()> {
        writer.write(&self.kind)?;
        writer.write(&self.main_points)?;
        writer.write(&self.line_width)?;
        writer.write(&self.pen_color)?;
        writer.write(&self.is_blur)?;
        writer.write(&self.is_mosaic)?;
        writer.write(&self.font_size)?;
        writer.write(&self.points)
    }
}

/// Encode a single value into a fresh buffer.
pub fn to_bytes<T: StreamWrite + ?Sized>(value: &T) -> CodecResult<Vec<u8>> {
    let mut writer = StreamWriter::new(Vec::new());
    writer.write(value)?;
    Ok(writer.into_inner())
}

/// Decode a single value from a byte slice.
pub fn from_bytes<T: StreamRead>(bytes: &[u8]) -> CodecResult<T> {
    StreamReader::new(bytes).read()
}
