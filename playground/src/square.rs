use cgmath::Matrix4;

use thiserror::Error;

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{PixelFormat, PixelType, Texture2D, TextureError};

use crate::image::RgbaImage;

pub const SQUARE_TEXTURE_UNIT: u8 = 0;

#[rustfmt::skip]
const SQUARE_VERTICES: [f32; 12] = [
    -0.5, 0.5, 0.0,  // top left
    -0.5, -0.5, 0.0, // bottom left
    0.5, -0.5, 0.0,  // bottom right
    0.5, 0.5, 0.0,   // top right
];

// image rows are stored top first, so t grows downwards
#[rustfmt::skip]
const SQUARE_TEXTURE_COORDS: [f32; 8] = [
    0.0, 0.0,
    0.0, 1.0,
    1.0, 1.0,
    1.0, 0.0,
];

const SQUARE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Textured square with an optional RGB split effect.
pub struct SquareBitmap {
    quad: Geometry,
    program: Program,
    texture: Texture2D,
    mvp_location: i32,
    sampler_location: i32,
    time_location: i32,
    glitch_location: i32,
    glitch: f32,
}

impl SquareBitmap {
    pub fn new(image: &RgbaImage, glitch: f32) -> Result<Self, SquareError> {
        let program = ProgramBuilder::new(
            include_str!("gl_shaders/square.vert"),
            include_str!("gl_shaders/square.frag"),
        )
        .build()?;

        let position_location = program.attrib_location("vPosition")?;
        let texture_coord_location = program.attrib_location("aTexCoordinate")?;

        let mvp_location = program.uniform_location("uMVPMatrix")?;
        let sampler_location = program.uniform_location("uTexture")?;
        let time_location = program.uniform_location("uTime")?;
        let glitch_location = program.uniform_location("uGlitch")?;

        let quad = GeometryBuilder::new()
            .with_attribute(position_location, VertexAttribute::Vec3, &SQUARE_VERTICES)
            .with_attribute(
                texture_coord_location,
                VertexAttribute::Vec2,
                &SQUARE_TEXTURE_COORDS,
            )
            .with_indices(&SQUARE_INDICES)
            .build()?;

        let texture = Texture2D::generate();
        texture.initialise(
            SQUARE_TEXTURE_UNIT,
            image.width,
            image.height,
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        );
        texture.upload(
            image.width,
            image.height,
            image.data.as_slice(),
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        )?;
        Texture2D::unbind();

        Ok(Self {
            quad,
            program,
            texture,
            mvp_location,
            sampler_location,
            time_location,
            glitch_location,
            glitch,
        })
    }

    pub fn draw(&self, renderer: &mut GlRenderer, mvp: &Matrix4<f32>, seconds: f32) {
        renderer.use_program(&self.program);

        self.program.set_mat4(self.mvp_location, mvp.as_ref());
        self.program.set_f32(self.time_location, seconds);
        self.program.set_f32(self.glitch_location, self.glitch);

        self.texture.bind(SQUARE_TEXTURE_UNIT);
        self.program
            .set_i32(self.sampler_location, SQUARE_TEXTURE_UNIT as i32);

        renderer.draw_indexed(&self.quad);
    }
}

#[derive(Debug, Error)]
pub enum SquareError {
    #[error("Square program: {0}")]
    Program(#[from] PBError),
    #[error("Square geometry: {0}")]
    Geometry(#[from] GBError),
    #[error("Square texture: {0}")]
    Texture(#[from] TextureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_arrays_agree() {
        let builder = GeometryBuilder::new()
            .with_attribute(0, VertexAttribute::Vec3, &SQUARE_VERTICES)
            .with_attribute(1, VertexAttribute::Vec2, &SQUARE_TEXTURE_COORDS)
            .with_indices(&SQUARE_INDICES);

        assert_eq!(builder.validate(), Ok(4));
    }

    #[test]
    fn top_of_square_samples_first_image_row() {
        for (pos, uv) in SQUARE_VERTICES.chunks(3).zip(SQUARE_TEXTURE_COORDS.chunks(2)) {
            assert_eq!(uv[0], pos[0] + 0.5);
            assert_eq!(uv[1], 0.5 - pos[1]);
        }
    }
}
