use crate::texture::{PixelFormat, PixelType, Texture2D};

/// Texture unit the color attachment is initialised on.
pub const COLOR_ATTACHMENT_UNIT: u8 = 1;

pub struct FrameBuffer {
    id: u32,
    color: Texture2D,
    // only held so the attachment lives as long as the framebuffer
    _depth: RenderBuffer,
    width: u32,
    height: u32,
}

impl FrameBuffer {
    /// Off-screen target with an RGBA8 color texture and a 24 bit depth buffer.
    ///
    /// An incomplete framebuffer is only reported through the log.
    pub fn new(width: u32, height: u32) -> Self {
        let mut id = 0;

        unsafe {
            gl::GenFramebuffers(1, (&mut id) as *mut u32);
        }

        let color = Texture2D::generate();
        color.initialise(
            COLOR_ATTACHMENT_UNIT,
            width,
            height,
            PixelFormat::Rgba,
            PixelType::UnsignedByte,
        );

        unsafe {
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, id);

            gl::FramebufferTexture2D(
                gl::FRAMEBUFFER,
                gl::COLOR_ATTACHMENT0,
                gl::TEXTURE_2D,
                color.id,
                0,
            );
        }

        let depth = RenderBuffer::depth(width, height);

        unsafe {
            gl::FramebufferRenderbuffer(
                gl::FRAMEBUFFER,
                gl::DEPTH_ATTACHMENT,
                gl::RENDERBUFFER,
                depth.id,
            );
        }

        let framebuffer = Self {
            id,
            color,
            _depth: depth,
            width,
            height,
        };

        let status = framebuffer.status();
        if status.is_complete() {
            log::debug!("framebuffer {id} complete at {width}x{height}");
        } else {
            log::error!("Error in creating framebuffer {id}: {status:?}");
        }

        Texture2D::unbind();
        Self::bind_default();

        framebuffer
    }

    /// Queries completeness, keeping whatever framebuffer was bound before.
    pub fn status(&self) -> FramebufferStatus {
        let raw = unsafe {
            let mut previous: i32 = 0;
            gl::GetIntegerv(gl::FRAMEBUFFER_BINDING, (&mut previous) as *mut i32);

            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id);
            let raw = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            gl::BindFramebuffer(gl::FRAMEBUFFER, previous as u32);

            raw
        };

        FramebufferStatus::from_raw(raw)
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.id);
        }
    }

    pub fn bind_default() {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }

    pub fn color_texture(&self) -> &Texture2D {
        &self.color
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for FrameBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteFramebuffers(1, (&self.id) as *const u32);
        }
    }
}

pub struct RenderBuffer {
    id: u32,
}

impl RenderBuffer {
    pub fn depth(width: u32, height: u32) -> Self {
        let mut id = 0;

        unsafe {
            gl::GenRenderbuffers(1, (&mut id) as *mut u32);
            gl::BindRenderbuffer(gl::RENDERBUFFER, id);
            gl::RenderbufferStorage(
                gl::RENDERBUFFER,
                gl::DEPTH_COMPONENT24,
                width as i32,
                height as i32,
            );
        }

        Self { id }
    }
}

impl Drop for RenderBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteRenderbuffers(1, (&self.id) as *const u32);
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FramebufferStatus {
    Complete,
    Undefined,
    IncompleteAttachment,
    MissingAttachment,
    IncompleteDrawBuffer,
    IncompleteReadBuffer,
    Unsupported,
    IncompleteMultisample,
    IncompleteLayerTargets,
    Other(u32),
}

impl FramebufferStatus {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            gl::FRAMEBUFFER_COMPLETE => Self::Complete,
            gl::FRAMEBUFFER_UNDEFINED => Self::Undefined,
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => Self::IncompleteAttachment,
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => Self::MissingAttachment,
            gl::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => Self::IncompleteDrawBuffer,
            gl::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => Self::IncompleteReadBuffer,
            gl::FRAMEBUFFER_UNSUPPORTED => Self::Unsupported,
            gl::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => Self::IncompleteMultisample,
            gl::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => Self::IncompleteLayerTargets,
            other => Self::Other(other),
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == Self::Complete
    }
}
