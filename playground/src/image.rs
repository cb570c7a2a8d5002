use std::fs::File;
use std::io::Read;
use std::path::Path;

use png::{ColorType, Transformations};

use thiserror::Error;

pub const MAGENTA: [u8; 4] = [255, 0, 255, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Tightly packed 8 bit RGBA image, first row at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaImage {
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let file = File::open(path)?;

        Self::decode_png(file)
    }

    pub fn decode_png(reader: impl Read) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let data = expand_to_rgba(&buf, info.color_type)?;

        Ok(Self {
            width: info.width,
            height: info.height,
            data,
        })
    }

    /// White and magenta squares of `cell` pixels, starting with white in the
    /// top left corner.
    pub fn checkerboard(width: u32, height: u32, cell: u32) -> Self {
        let cell = cell.max(1);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);

        for y in 0..height {
            for x in 0..width {
                let color = if (x / cell + y / cell) % 2 == 0 {
                    WHITE
                } else {
                    MAGENTA
                };
                data.extend_from_slice(&color);
            }
        }

        Self {
            width,
            height,
            data,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = (x as usize + y as usize * self.width as usize) * 4;

        self.data
            .get(index..index + 4)
            .and_then(|p| p.try_into().ok())
    }
}

fn expand_to_rgba(data: &[u8], color_type: ColorType) -> Result<Vec<u8>, ImageError> {
    let rgba = match color_type {
        ColorType::Rgba => data.to_vec(),
        ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => data.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        ColorType::Indexed => return Err(ImageError::UnsupportedColor(color_type)),
    };

    Ok(rgba)
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Could not open image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not decode PNG: {0}")]
    Decoding(#[from] png::DecodingError),
    #[error("Unsupported color type {0:?}")]
    UnsupportedColor(ColorType),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates_cells() {
        let image = RgbaImage::checkerboard(4, 4, 2);

        assert_eq!(image.data.len(), 4 * 4 * 4);
        assert_eq!(image.pixel(0, 0), Some(WHITE));
        assert_eq!(image.pixel(1, 1), Some(WHITE));
        assert_eq!(image.pixel(2, 0), Some(MAGENTA));
        assert_eq!(image.pixel(0, 2), Some(MAGENTA));
        assert_eq!(image.pixel(3, 3), Some(WHITE));
        assert_eq!(image.pixel(4, 0), None);
    }

    #[test]
    fn zero_cell_size_is_clamped() {
        let image = RgbaImage::checkerboard(2, 1, 0);

        assert_eq!(image.pixel(0, 0), Some(WHITE));
        assert_eq!(image.pixel(1, 0), Some(MAGENTA));
    }

    #[test]
    fn expands_rgb_and_gray() {
        assert_eq!(
            expand_to_rgba(&[1, 2, 3, 4, 5, 6], ColorType::Rgb).unwrap(),
            vec![1, 2, 3, 255, 4, 5, 6, 255]
        );
        assert_eq!(
            expand_to_rgba(&[7, 128], ColorType::GrayscaleAlpha).unwrap(),
            vec![7, 7, 7, 128]
        );
        assert_eq!(
            expand_to_rgba(&[9], ColorType::Grayscale).unwrap(),
            vec![9, 9, 9, 255]
        );
        assert!(expand_to_rgba(&[0], ColorType::Indexed).is_err());
    }

    #[test]
    fn decodes_rgb_png() {
        let mut encoded = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut encoded, 2, 1);
            encoder.set_color(ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[255, 0, 255, 10, 20, 30]).unwrap();
        }

        let image = RgbaImage::decode_png(encoded.as_slice()).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 1);
        assert_eq!(image.pixel(0, 0), Some(MAGENTA));
        assert_eq!(image.pixel(1, 0), Some([10, 20, 30, 255]));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            RgbaImage::decode_png(&b"not a png"[..]),
            Err(ImageError::Decoding(_))
        ));
    }
}
