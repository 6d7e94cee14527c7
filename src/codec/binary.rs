//! Binary shape file: magic, format version, then a list of tool shapes.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::domain::Toolshape;

use super::error::{CodecError, CodecResult};
use super::stream::{StreamReader, StreamWriter};

/// Magic number at the start of every shape file.
pub const SHAPE_MAGIC: [u8; 4] = *b"SHPM";

/// Current shape file format version.
pub const FORMAT_VERSION: u32 = 1;

/// Write a complete shape file to any writer.
pub fn write_shapes<W: Write>(writer: W, shapes: &[Toolshape]) -> CodecResult<()> {
    let mut stream = StreamWriter::new(writer);
    for byte in SHAPE_MAGIC {
        stream.write_u8(byte)?;
    }
    stream.write_u32(FORMAT_VERSION)?;
    stream.write(shapes)?;
    stream.flush()
}

/// Read a complete shape file from any reader.
pub fn read_shapes<R: Read>(reader: R) -> CodecResult<Vec<Toolshape>> {
    let mut stream = StreamReader::new(reader);
    let mut magic = [0u8; 4];
    for byte in &mut magic {
        *byte = stream.read_u8()?;
    }
    if magic != SHAPE_MAGIC {
        return Err(CodecError::InvalidMagic);
    }
    let version = stream.read_u32()?;
    if !(1..=FORMAT_VERSION).contains(&version) {
        return Err(CodecError::UnsupportedVersion(version));
    }
    let shapes: Vec<Toolshape> = stream.read()?;
    log::debug!("Read {} shapes (format v{})", shapes.len(), version);
    Ok(shapes)
}

/// Check whether a byte prefix looks like a binary shape file.
pub fn has_magic(prefix: &[u8]) -> bool {
    prefix.starts_with(&SHAPE_MAGIC)
}

pub fn save(path: &Path, shapes: &[Toolshape]) -> CodecResult<()> {
    let file = File::create(path)?;
    write_shapes(BufWriter::new(file), shapes)
}

pub fn load(path: &Path) -> CodecResult<Vec<Toolshape>> {
    let file = File::open(path)?;
    read_shapes(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::domain::{DiagPoints, FourPoints, PenColor, PointF, ShapeKind};

    fn sample_shapes() -> Vec<Toolshape> {
        let diag = DiagPoints::new(PointF::new(10.0, 10.0), PointF::new(110.0, 60.0));
        let mut rect = Toolshape::new(ShapeKind::Rectangle);
        rect.main_points = FourPoints::from_diagonal(diag, ShapeKind::Rectangle);
        rect.line_width = 2;
        rect.pen_color = PenColor::rgb(220, 30, 30);

        let mut blur = Toolshape::new(ShapeKind::Oval);
        blur.main_points = FourPoints::from_diagonal(diag.translate(5.0, 5.0), ShapeKind::Oval);
        blur.is_blur = true;

        let mut text = Toolshape::new(ShapeKind::Text);
        text.font_size = 14;
        text.points.push(PointF::new(40.0, 40.0));

        vec![rect, blur, text]
    }

    #[test]
    fn test_write_then_read_file() {
        let shapes = sample_shapes();
        let mut buf = Vec::new();
        write_shapes(&mut buf, &shapes).unwrap();
        assert!(has_magic(&buf));
        assert_eq!(read_shapes(Cursor::new(buf)).unwrap(), shapes);
    }

    #[test]
    fn test_invalid_magic() {
        let data = b"NOPE\x00\x00\x00\x01\x00\x00\x00\x00";
        assert!(matches!(
            read_shapes(Cursor::new(data)),
            Err(CodecError::InvalidMagic)
        ));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut data = SHAPE_MAGIC.to_vec();
        data.extend_from_slice(&2u32.to_be_bytes());
        data.extend_from_slice(&0u32.to_be_bytes());
        assert!(matches!(
            read_shapes(Cursor::new(data)),
            Err(CodecError::UnsupportedVersion(2))
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.shapes");
        let shapes = sample_shapes();
        save(&path, &shapes).unwrap();
        assert_eq!(load(&path).unwrap(), shapes);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(&dir.path().join("missing.shapes")),
            Err(CodecError::Io(_))
        ));
    }
}
