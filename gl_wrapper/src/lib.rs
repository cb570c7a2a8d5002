pub mod framebuffer;
pub mod geometry;
pub mod program;
pub mod renderer;
pub mod texture;
