pub mod display;
pub mod image;
pub mod logging;
pub mod projection;
pub mod scene;
pub mod square;
