use std::ffi::c_void;
use thiserror::Error;

pub struct Texture2D {
    pub(crate) id: u32,
}

impl Texture2D {
    pub fn generate() -> Self {
        let mut id = 0;

        unsafe {
            gl::GenTextures(1, (&mut id) as *mut u32);
        }

        Self { id }
    }

    /// Allocates storage for mip level 0 without uploading anything.
    ///
    /// Leaves the texture bound on `unit`, with nearest filtering and edges clamped.
    pub fn initialise(
        &self,
        unit: u8,
        width: u32,
        height: u32,
        format: PixelFormat,
        pixel_type: PixelType,
    ) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id);

            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, gl::NEAREST as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::NEAREST as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::CLAMP_TO_EDGE as i32);
            gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::CLAMP_TO_EDGE as i32);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.gl_enum() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_enum(),
                pixel_type.gl_enum(),
                std::ptr::null(),
            );
        }

        log::debug!(
            "texture {} initialised on unit {unit} as {width}x{height} {format:?}/{pixel_type:?}",
            self.id
        );
    }

    pub fn upload<T: Copy>(
        &self,
        width: u32,
        height: u32,
        data: &[T],
        format: PixelFormat,
        pixel_type: PixelType,
    ) -> Result<(), TextureError> {
        let expected = expected_len(width, height, format, pixel_type);
        let actual = std::mem::size_of_val(data);

        if expected != actual {
            return Err(TextureError::InvalidSrcLength { expected, actual });
        }

        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id);
            gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);

            gl::TexImage2D(
                gl::TEXTURE_2D,
                0,
                format.gl_enum() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_enum(),
                pixel_type.gl_enum(),
                data.as_ptr() as *const c_void,
            );
        }

        Ok(())
    }

    pub fn bind(&self, unit: u8) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit as u32);
            gl::BindTexture(gl::TEXTURE_2D, self.id)
        }
    }

    pub fn unbind() {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, 0);
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, (&self.id) as *const u32);
        }
    }
}

/// Byte size of a tightly packed `width` x `height` image.
pub fn expected_len(width: u32, height: u32, format: PixelFormat, pixel_type: PixelType) -> usize {
    width as usize * height as usize * format.channels() as usize * pixel_type.size()
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("Invalid source data length, expected {expected} bytes, got {actual}")]
    InvalidSrcLength { expected: usize, actual: usize },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn channels(&self) -> u8 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    pub fn gl_enum(&self) -> u32 {
        match self {
            PixelFormat::Rgb => gl::RGB,
            PixelFormat::Rgba => gl::RGBA,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PixelType {
    UnsignedByte,
    Float,
}

impl PixelType {
    pub fn size(&self) -> usize {
        match self {
            PixelType::UnsignedByte => std::mem::size_of::<u8>(),
            PixelType::Float => std::mem::size_of::<f32>(),
        }
    }

    pub fn gl_enum(&self) -> u32 {
        match self {
            PixelType::UnsignedByte => gl::UNSIGNED_BYTE,
            PixelType::Float => gl::FLOAT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_len_counts_bytes() {
        assert_eq!(expected_len(4, 2, PixelFormat::Rgba, PixelType::UnsignedByte), 32);
        assert_eq!(expected_len(4, 2, PixelFormat::Rgb, PixelType::UnsignedByte), 24);
        assert_eq!(expected_len(4, 2, PixelFormat::Rgba, PixelType::Float), 128);
        assert_eq!(expected_len(0, 10, PixelFormat::Rgba, PixelType::Float), 0);
    }

    #[test]
    fn upload_rejects_short_data() {
        let texture = Texture2D { id: 0 };

        let res = texture.upload(
            2,
            2,
            &[0_u8; 15],
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        );

        assert!(matches!(
            res,
            Err(TextureError::InvalidSrcLength {
                expected: 16,
                actual: 15
            })
        ));

        // never created, nothing to delete
        std::mem::forget(texture);
    }

    #[test]
    fn upload_counts_float_bytes() {
        let texture = Texture2D { id: 0 };

        let res = texture.upload(1, 1, &[0.0_f32; 3], PixelFormat::Rgba, PixelType::Float);

        assert!(matches!(
            res,
            Err(TextureError::InvalidSrcLength {
                expected: 16,
                actual: 12
            })
        ));

        std::mem::forget(texture);
    }

    #[test]
    fn formats_map_to_gl() {
        assert_eq!(PixelFormat::Rgba.gl_enum(), gl::RGBA);
        assert_eq!(PixelFormat::Rgb.gl_enum(), gl::RGB);
        assert_eq!(PixelType::UnsignedByte.gl_enum(), gl::UNSIGNED_BYTE);
        assert_eq!(PixelType::Float.gl_enum(), gl::FLOAT);
    }
}
