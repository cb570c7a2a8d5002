use crate::geometry::{DrawCall, Geometry};
use crate::program::Program;

pub struct GlRenderer {
    current_program: u32,
}

impl GlRenderer {
    pub fn new() -> Self {
        Self { current_program: 0 }
    }

    pub fn use_program(&mut self, program: &Program) {
        let p_id = program.get_id();
        if self.current_program != p_id {
            unsafe { gl::UseProgram(p_id) }
            self.current_program = p_id;
        }
    }

    /// Draws with the program already selected through [`GlRenderer::use_program`].
    pub fn draw(&mut self, geometry: &Geometry) {
        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawArrays(gl::TRIANGLES, 0, geometry.vertices() as i32);
            gl::BindVertexArray(0);
        }
    }

    /// Like [`GlRenderer::draw`], but goes through the index buffer when the
    /// geometry has one.
    pub fn draw_indexed(&mut self, geometry: &Geometry) {
        let count = match geometry.draw_call() {
            DrawCall::Elements(count) => count,
            DrawCall::Arrays(_) => return self.draw(geometry),
        };

        unsafe {
            gl::BindVertexArray(geometry.vao());
            gl::DrawElements(
                gl::TRIANGLES,
                count as i32,
                gl::UNSIGNED_INT,
                std::ptr::null(),
            );
            gl::BindVertexArray(0);
        }
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe {
            gl::Viewport(0, 0, width as i32, height as i32);
        }
    }

    pub fn clear_color(&self, r: f32, g: f32, b: f32) {
        unsafe {
            gl::ClearColor(r, g, b, 1.0);
        }
    }

    pub fn clear(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
    }

    pub fn enable_depth_test(&self) {
        unsafe {
            gl::ClearDepth(1.0);
            gl::DepthFunc(gl::LEQUAL);
            gl::Enable(gl::DEPTH_TEST);
        }
    }
}

impl Default for GlRenderer {
    fn default() -> Self {
        Self::new()
    }
}
