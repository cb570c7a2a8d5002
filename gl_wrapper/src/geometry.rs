use std::ffi::c_void;
use thiserror::Error;

struct AttributeStream<'a> {
    location: u32,
    kind: VertexAttribute,
    data: &'a [f32],
}

/// Collects separate per-attribute arrays and an optional index list.
///
/// The streams end up back to back in one vertex buffer, so each attribute is
/// tightly packed and starts where the previous one ends.
pub struct GeometryBuilder<'a> {
    streams: Vec<AttributeStream<'a>>,
    indices: Option<&'a [u32]>,
}

impl<'a> GeometryBuilder<'a> {
    pub fn new() -> Self {
        Self {
            streams: Vec::new(),
            indices: None,
        }
    }

    pub fn with_attribute(mut self, location: u32, kind: VertexAttribute, data: &'a [f32]) -> Self {
        self.streams.push(AttributeStream {
            location,
            kind,
            data,
        });
        self
    }

    pub fn with_indices(mut self, indices: &'a [u32]) -> Self {
        self.indices = Some(indices);
        self
    }

    /// Checks the streams against each other and returns the vertex count.
    pub fn validate(&self) -> Result<usize, GBError> {
        let mut vertices = None;

        for stream in &self.streams {
            if stream.data.len() % stream.kind.size() != 0 {
                return Err(GBError::InvalidDataLength {
                    location: stream.location,
                });
            }

            let count = stream.data.len() / stream.kind.size();

            match vertices {
                None => vertices = Some(count),
                Some(expected) if expected != count => {
                    return Err(GBError::MismatchedVertexCount {
                        location: stream.location,
                        expected,
                        found: count,
                    })
                }
                _ => {}
            }
        }

        let vertices = vertices.ok_or(GBError::NoAttributes)?;

        if let Some(indices) = self.indices {
            if indices.len() % 3 != 0 {
                return Err(GBError::IncompleteTriangle(indices.len()));
            }

            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
                return Err(GBError::IndexOutOfRange { index, vertices });
            }
        }

        Ok(vertices)
    }

    pub fn build(self) -> Result<Geometry, GBError> {
        let vertices = self.validate()?;
        let total_len: usize = self.streams.iter().map(|s| s.data.len()).sum();

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = None;

        unsafe {
            gl::GenVertexArrays(1, (&mut vao) as *mut u32);
            gl::GenBuffers(1, (&mut vbo) as *mut u32);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);

            gl::BufferData(
                gl::ARRAY_BUFFER,
                (total_len * std::mem::size_of::<f32>()) as isize,
                std::ptr::null(),
                gl::STATIC_DRAW,
            );

            let mut offset = 0;

            for stream in &self.streams {
                let bytes = stream.data.len() * std::mem::size_of::<f32>();

                gl::BufferSubData(
                    gl::ARRAY_BUFFER,
                    offset as isize,
                    bytes as isize,
                    stream.data.as_ptr() as *const c_void,
                );

                gl::VertexAttribPointer(
                    stream.location,
                    stream.kind.size() as i32,
                    gl::FLOAT,
                    gl::FALSE,
                    0,
                    offset as *const c_void,
                );
                gl::EnableVertexAttribArray(stream.location);

                offset += bytes;
            }

            if let Some(indices) = self.indices {
                let mut id = 0;
                gl::GenBuffers(1, (&mut id) as *mut u32);
                gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, id);
                gl::BufferData(
                    gl::ELEMENT_ARRAY_BUFFER,
                    std::mem::size_of_val(indices) as isize,
                    indices.as_ptr() as *const c_void,
                    gl::STATIC_DRAW,
                );
                ebo = Some(id);
            }

            // the element buffer binding is VAO state, unbind the VAO first
            gl::BindVertexArray(0);
            gl::BindBuffer(gl::ARRAY_BUFFER, 0);
            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, 0);
        }

        Ok(Geometry {
            vao,
            vbo,
            ebo,
            vertices,
            elements: self.indices.map_or(0, |i| i.len()),
        })
    }
}

impl Default for GeometryBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GBError {
    #[error("Geometry needs at least one attribute")]
    NoAttributes,
    #[error("Invalid data length for attribute at location {location}")]
    InvalidDataLength { location: u32 },
    #[error("Attribute at location {location} has {found} vertices, expected {expected}")]
    MismatchedVertexCount {
        location: u32,
        expected: usize,
        found: usize,
    },
    #[error("Index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("Index {index} out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
}

#[derive(Debug, Copy, Clone)]
pub enum VertexAttribute {
    Float,
    Vec2,
    Vec3,
}

impl VertexAttribute {
    pub fn size(&self) -> usize {
        match self {
            VertexAttribute::Float => 1,
            VertexAttribute::Vec2 => 2,
            VertexAttribute::Vec3 => 3,
        }
    }
}

pub struct Geometry {
    vao: u32,
    vbo: u32,
    ebo: Option<u32>,
    vertices: usize,
    elements: usize,
}

impl Geometry {
    pub fn vao(&self) -> u32 {
        self.vao
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn draw_call(&self) -> DrawCall {
        match self.ebo {
            Some(_) => DrawCall::Elements(self.elements),
            None => DrawCall::Arrays(self.vertices),
        }
    }
}

/// How a geometry is submitted, with the number of vertices or indices to draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DrawCall {
    Arrays(usize),
    Elements(usize),
}

impl Drop for Geometry {
    fn drop(&mut self) {
        unsafe {
            if let Some(ebo) = &self.ebo {
                gl::DeleteBuffers(1, ebo as *const u32);
            }
            gl::DeleteBuffers(1, (&self.vbo) as *const u32);
            gl::DeleteVertexArrays(1, (&self.vao) as *const u32);
        }
    }
}
