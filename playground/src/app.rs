use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::CString;
use std::num::NonZeroU32;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalPosition, PhysicalSize, Size};
use winit::event::{ElementState, Event, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::renderer::GlRenderer;

use fbo_playground::display::{DisplayError, FrameBufferDisplay};
use fbo_playground::image::{ImageError, RgbaImage};
use fbo_playground::scene::{FrameMatrices, SceneState};
use fbo_playground::square::{SquareBitmap, SquareError};

use crate::args::ArgsPlayground;

const CHECKERBOARD_SIZE: u32 = 256;
const CHECKERBOARD_CELL: u32 = 32;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    renderer: GlRenderer,
    square: SquareBitmap,
    display: FrameBufferDisplay,
}

impl App {
    pub fn new(args: &ArgsPlayground) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(args.width, args.height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title("Framebuffer playground");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |mut configs| {
                configs.next().expect("display offers no GL configs")
            })
            .map_err(|e| AppError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Window("no window was created".into()))?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| {
            CString::new(s)
                .map(|s| gl_display.get_proc_address(s.as_c_str()).cast())
                .unwrap_or(std::ptr::null())
        });

        let image = match &args.image {
            Some(path) => {
                let image = RgbaImage::load_png(path)?;
                log::info!(
                    "Read image {:?} ({}x{})",
                    path,
                    image.width,
                    image.height
                );
                image
            }
            None => RgbaImage::checkerboard(CHECKERBOARD_SIZE, CHECKERBOARD_SIZE, CHECKERBOARD_CELL),
        };

        let renderer = GlRenderer::new();
        renderer.clear_color(0.0, 0.0, 0.0);
        renderer.enable_depth_test();

        let square = SquareBitmap::new(&image, args.glitch)?;

        let (width, height) = gl_window.size();
        renderer.resize(width, height);
        let display = FrameBufferDisplay::new(width, height)?;

        Ok(Self {
            event_loop,
            gl_context,
            gl_window,
            renderer,
            square,
            display,
        })
    }

    pub fn run(self) -> ! {
        let Self {
            event_loop,
            gl_context,
            gl_window,
            mut renderer,
            square,
            mut display,
        } = self;

        let start = Instant::now();

        let mut scene = SceneState::default();
        let mut last_pos = PhysicalPosition::new(0.0, 0.0);
        let mut lmb_pressed = false;

        event_loop.run(move |event, _window_target, control_flow| {
            *control_flow = ControlFlow::Poll;
            match event {
                Event::RedrawEventsCleared => {
                    gl_window.window.request_redraw();
                }
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::Resized(size) => {
                        if let (Some(width), Some(height)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            gl_window.surface.resize(&gl_context, width, height);
                            renderer.resize(size.width, size.height);

                            match FrameBufferDisplay::new(size.width, size.height) {
                                Ok(d) => display = d,
                                Err(e) => log::error!("Could not recreate display: {e}"),
                            }
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if lmb_pressed {
                            let (width, height) = gl_window.size();
                            scene.drag(
                                (position.x as f32, position.y as f32),
                                (
                                    (position.x - last_pos.x) as f32,
                                    (position.y - last_pos.y) as f32,
                                ),
                                width,
                                height,
                            );
                        }

                        last_pos = position;
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let MouseButton::Left = button {
                            lmb_pressed = state == ElementState::Pressed
                        }
                    }
                    WindowEvent::KeyboardInput { input, .. } => {
                        if let Some(VirtualKeyCode::Escape) = input.virtual_keycode {
                            control_flow.set_exit();
                        }
                    }
                    WindowEvent::CloseRequested => {
                        control_flow.set_exit();
                    }
                    _ => (),
                },
                Event::RedrawRequested(_) => {
                    let size = gl_window.size();
                    let seconds = start.elapsed().as_secs_f32();
                    let matrices = FrameMatrices::compute(
                        &scene,
                        size,
                        display.projection(),
                        (display.width(), display.height()),
                    );

                    renderer.resize(size.0, size.1);
                    renderer.clear();
                    square.draw(&mut renderer, &matrices.screen, seconds);

                    display.begin(&renderer);
                    square.draw(&mut renderer, &matrices.offscreen, seconds);
                    display.end();

                    renderer.resize(size.0, size.1);
                    display.draw(&mut renderer, &matrices.display);

                    if let Err(e) = gl_window.surface.swap_buffers(&gl_context) {
                        log::error!("Could not swap buffers: {e}");
                    }
                }
                _ => (),
            }
        })
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::EmptyWindow)?,
            NonZeroU32::new(height).ok_or(AppError::EmptyWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Could not create window: {0}")]
    Window(String),
    #[error("Window has zero size")]
    EmptyWindow,
    #[error("GL context: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("Could not read image: {0}")]
    Image(#[from] ImageError),
    #[error(transparent)]
    Square(#[from] SquareError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}
