use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use thiserror::Error;

const HEADER_SIZE: usize = 54;

#[derive(Debug, Error)]
pub enum BmpError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a BMP file")]
    NotBmp,

    #[error("unsupported BMP variant: {0}")]
    Unsupported(String),

    #[error("file is truncated")]
    Truncated,
}

/// Decoded image, rows top-down, pixels RGBA8.
pub struct BmpImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub fn load(path: &Path) -> Result<BmpImage, BmpError> {
    parse(&std::fs::read(path)?)
}

/// Decodes an uncompressed 24-bit BMP. Rows are stored bottom-up and
/// padded to a 4-byte boundary; both are undone here.
pub fn parse(bytes: &[u8]) -> Result<BmpImage, BmpError> {
    if bytes.len() < HEADER_SIZE {
        return Err(BmpError::Truncated);
    }
    if &bytes[0..2] != b"BM" {
        return Err(BmpError::NotBmp);
    }

    let mut cursor = Cursor::new(bytes);
    cursor.set_position(0x0A);
    let mut data_offset = cursor.read_u32::<LittleEndian>()? as usize;
    cursor.set_position(0x12);
    let width = cursor.read_u32::<LittleEndian>()?;
    cursor.set_position(0x16);
    let height = cursor.read_u32::<LittleEndian>()?;
    cursor.set_position(0x1C);
    let bits_per_pixel = cursor.read_u16::<LittleEndian>()?;
    cursor.set_position(0x1E);
    let compression = cursor.read_u32::<LittleEndian>()?;

    if bits_per_pixel != 24 {
        return Err(BmpError::Unsupported(format!(
            "{bits_per_pixel} bits per pixel"
        )));
    }
    if compression != 0 {
        return Err(BmpError::Unsupported(format!(
            "compression method {compression}"
        )));
    }
    if data_offset == 0 {
        data_offset = HEADER_SIZE;
    }

    let row_stride = (width as usize * 3 + 3) & !3;
    let data_size = row_stride
        .checked_mul(height as usize)
        .ok_or(BmpError::Truncated)?;
    let data = data_offset
        .checked_add(data_size)
        .and_then(|end| bytes.get(data_offset..end))
        .ok_or(BmpError::Truncated)?;

    let mut rgba = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height as usize {
        // BMP rows run bottom to top.
        let row = &data[(height as usize - 1 - y) * row_stride..][..width as usize * 3];
        for pixel in row.chunks_exact(3) {
            rgba.extend_from_slice(&[pixel[2], pixel[1], pixel[0], 0xFF]);
        }
    }

    Ok(BmpImage {
        width,
        height,
        rgba,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builds a minimal 24-bit BMP from top-down RGB rows.
    fn make_bmp(width: u32, height: u32, rows_top_down: &[&[[u8; 3]]]) -> Vec<u8> {
        let row_stride = (width as usize * 3 + 3) & !3;
        let data_size = row_stride * height as usize;

        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0] = b'B';
        bytes[1] = b'M';
        bytes[0x0A..0x0E].copy_from_slice(&(HEADER_SIZE as u32).to_le_bytes());
        bytes[0x0E..0x12].copy_from_slice(&40u32.to_le_bytes());
        bytes[0x12..0x16].copy_from_slice(&width.to_le_bytes());
        bytes[0x16..0x1A].copy_from_slice(&height.to_le_bytes());
        bytes[0x1C..0x1E].copy_from_slice(&24u16.to_le_bytes());
        bytes[0x22..0x26].copy_from_slice(&(data_size as u32).to_le_bytes());

        for row in rows_top_down.iter().rev() {
            let start = bytes.len();
            for [r, g, b] in row.iter() {
                bytes.extend_from_slice(&[*b, *g, *r]);
            }
            bytes.resize(start + row_stride, 0);
        }
        bytes
    }

    #[test]
    fn decodes_and_flips_rows() {
        let red = [255, 0, 0];
        let green = [0, 255, 0];
        let blue = [0, 0, 255];
        let white = [255, 255, 255];
        let bytes = make_bmp(2, 2, &[&[red, green], &[blue, white]]);

        let image = parse(&bytes).unwrap();
        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(
            image.rgba,
            vec![
                255, 0, 0, 255, 0, 255, 0, 255, // top row
                0, 0, 255, 255, 255, 255, 255, 255, // bottom row
            ]
        );
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = make_bmp(1, 1, &[&[[1, 2, 3]]]);
        bytes[0] = b'X';
        assert!(matches!(parse(&bytes), Err(BmpError::NotBmp)));
    }

    #[test]
    fn rejects_unsupported_depth() {
        let mut bytes = make_bmp(1, 1, &[&[[1, 2, 3]]]);
        bytes[0x1C..0x1E].copy_from_slice(&32u16.to_le_bytes());
        assert!(matches!(parse(&bytes), Err(BmpError::Unsupported(_))));
    }

    #[test]
    fn rejects_truncated_pixel_data() {
        let row: &[[u8; 3]] = &[[0; 3], [0; 3]];
        let mut bytes = make_bmp(2, 2, &[row, row]);
        bytes.truncate(bytes.len() - 1);
        assert!(matches!(parse(&bytes), Err(BmpError::Truncated)));
    }
}
