//! Off-screen render target together with the quad that puts it on screen.

use cgmath::Matrix4;

use thiserror::Error;

use gl_wrapper::framebuffer::{FrameBuffer, COLOR_ATTACHMENT_UNIT};
use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{PBError, Program, ProgramBuilder};
use gl_wrapper::renderer::GlRenderer;

use crate::projection::{aspect, offscreen_projection};

/// Unit quad centered on the origin. The target it shows is the full surface
/// size and the display model stretches the quad to its aspect.
#[rustfmt::skip]
pub const DISPLAY_VERTICES: [f32; 12] = [
    -0.5, -0.5, 0.0,
    0.5, -0.5, 0.0,
    0.5, 0.5, 0.0,
    -0.5, 0.5, 0.0,
];

pub const DISPLAY_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[rustfmt::skip]
pub const DISPLAY_TEXTURE_COORDS: [f32; 8] = [
    0.0, 0.0,
    1.0, 0.0,
    1.0, 1.0,
    0.0, 1.0,
];

const VERTEX_SHADER: &str = include_str!("gl_shaders/display.vert");
const FRAGMENT_SHADER: &str = include_str!("gl_shaders/display.frag");

pub struct FrameBufferDisplay {
    framebuffer: FrameBuffer,
    quad: Geometry,
    program: Program,
    mvp_location: i32,
    sampler_location: i32,
    projection: Matrix4<f32>,
}

impl FrameBufferDisplay {
    /// Allocates the off-screen target at the full `width` x `height`, not halved.
    pub fn new(width: u32, height: u32) -> Result<Self, DisplayError> {
        if width == 0 || height == 0 {
            return Err(DisplayError::EmptySize { width, height });
        }

        let program = ProgramBuilder::new(VERTEX_SHADER, FRAGMENT_SHADER).build()?;

        let position_location = program.attrib_location("aVertexPosition")?;
        let texture_coord_location = program.attrib_location("aTextureCoordinate")?;
        let sampler_location = program.uniform_location("uTextureSampler")?;
        let mvp_location = program.uniform_location("uMVPMatrix")?;

        let quad = GeometryBuilder::new()
            .with_attribute(position_location, VertexAttribute::Vec3, &DISPLAY_VERTICES)
            .with_attribute(
                texture_coord_location,
                VertexAttribute::Vec2,
                &DISPLAY_TEXTURE_COORDS,
            )
            .with_indices(&DISPLAY_INDICES)
            .build()?;

        let projection = offscreen_projection(width, height);
        let framebuffer = FrameBuffer::new(width, height);

        log::info!("created off-screen display at {width}x{height}");

        Ok(Self {
            framebuffer,
            quad,
            program,
            mvp_location,
            sampler_location,
            projection,
        })
    }

    /// Redirects rendering into the off-screen target and clears it.
    pub fn begin(&self, renderer: &GlRenderer) {
        self.framebuffer.bind();
        renderer.resize(self.width(), self.height());
        renderer.clear();
    }

    /// Switches back to the window's framebuffer.
    pub fn end(&self) {
        FrameBuffer::bind_default();
    }

    /// Draws the off-screen color texture on the quad transformed by `mvp`.
    pub fn draw(&self, renderer: &mut GlRenderer, mvp: &Matrix4<f32>) {
        renderer.use_program(&self.program);
        self.program.set_mat4(self.mvp_location, mvp.as_ref());

        self.framebuffer
            .color_texture()
            .bind(COLOR_ATTACHMENT_UNIT);
        self.program
            .set_i32(self.sampler_location, COLOR_ATTACHMENT_UNIT as i32);

        renderer.draw_indexed(&self.quad);
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn width(&self) -> u32 {
        self.framebuffer.width()
    }

    pub fn height(&self) -> u32 {
        self.framebuffer.height()
    }

    pub fn aspect(&self) -> f32 {
        aspect(self.width(), self.height())
    }
}

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("Cannot create a {width}x{height} framebuffer")]
    EmptySize { width: u32, height: u32 },
    #[error("Display program: {0}")]
    Program(#[from] PBError),
    #[error("Display quad: {0}")]
    Geometry(#[from] GBError),
}
