//! Uncompressed 24-bit BMP encoding.
//!
//! Layout: 14-byte file header, 40-byte BITMAPINFOHEADER, then pixel rows
//! bottom-up in BGR order, each row zero-padded to a multiple of 4 bytes.

use std::fs;
use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::error::Result;

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
pub const PIXEL_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

/// Bytes per stored row including padding
pub fn row_stride(width: u32) -> u32 {
    (width * 3).div_ceil(4) * 4
}

pub fn encode_bmp(img: &RgbImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let stride = row_stride(width) as usize;
    let image_size = stride as u32 * height;
    let file_size = PIXEL_OFFSET + image_size;

    let mut out = Vec::with_capacity(file_size as usize);

    // File header
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // reserved
    out.extend_from_slice(&PIXEL_OFFSET.to_le_bytes());

    // BITMAPINFOHEADER, positive height = bottom-up rows
    out.extend_from_slice(&INFO_HEADER_SIZE.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&image_size.to_le_bytes());
    out.extend_from_slice(&0i32.to_le_bytes()); // x pixels per metre
    out.extend_from_slice(&0i32.to_le_bytes()); // y pixels per metre
    out.extend_from_slice(&0u32.to_le_bytes()); // palette colours
    out.extend_from_slice(&0u32.to_le_bytes()); // important colours

    let padding = stride - width as usize * 3;
    for y in (0..height).rev() {
        for x in 0..width {
            let [r, g, b] = img.get_pixel(x, y).0;
            out.extend_from_slice(&[b, g, r]);
        }
        out.extend(std::iter::repeat_n(0u8, padding));
    }

    out
}

pub fn write_bmp(path: impl AsRef<Path>, img: &RgbImage) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_bmp(img);
    fs::write(path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "wrote bmp");
    Ok(())
}
