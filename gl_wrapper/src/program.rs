use gl::types::{GLenum, GLuint};
use std::ffi::{c_char, CString};
use thiserror::Error;

const INFO_LOG_LEN: usize = 1024;

pub struct ProgramBuilder<'a> {
    vert: &'a str,
    frag: &'a str,
}

impl<'a> ProgramBuilder<'a> {
    pub fn new(vert_src: &'a str, frag_src: &'a str) -> Self {
        Self {
            vert: vert_src,
            frag: frag_src,
        }
    }

    pub fn build(self) -> Result<Program, PBError> {
        let vert = compile_shader(gl::VERTEX_SHADER, self.vert)?;
        let frag = match compile_shader(gl::FRAGMENT_SHADER, self.frag) {
            Ok(frag) => frag,
            Err(e) => {
                unsafe { gl::DeleteShader(vert) }
                return Err(e);
            }
        };

        let mut success: i32 = 0;

        unsafe {
            let program = gl::CreateProgram();
            gl::AttachShader(program, vert);
            gl::AttachShader(program, frag);
            gl::LinkProgram(program);

            gl::DeleteShader(vert);
            gl::DeleteShader(frag);

            gl::GetProgramiv(program, gl::LINK_STATUS, (&mut success) as *mut i32);
            if success != 1 {
                let mut buf = [0_u8; INFO_LOG_LEN];

                gl::GetProgramInfoLog(
                    program,
                    INFO_LOG_LEN as i32,
                    std::ptr::null_mut(),
                    buf.as_mut_ptr() as *mut c_char,
                );
                gl::DeleteProgram(program);

                return Err(PBError::Linking(info_log_to_string(&buf)));
            }

            log::debug!("linked program {program}");

            Ok(Program { id: program })
        }
    }
}

fn compile_shader(kind: GLenum, src: &str) -> Result<GLuint, PBError> {
    let src = CString::new(src).map_err(|_| PBError::InvalidSource)?;
    let mut success: i32 = 0;

    unsafe {
        let shader = gl::CreateShader(kind);

        gl::ShaderSource(
            shader,
            1,
            (&src.as_ptr()) as *const *const c_char,
            std::ptr::null(),
        );

        gl::CompileShader(shader);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, (&mut success) as *mut i32);
        if success != 1 {
            let mut buf = [0_u8; INFO_LOG_LEN];

            gl::GetShaderInfoLog(
                shader,
                INFO_LOG_LEN as i32,
                std::ptr::null_mut(),
                buf.as_mut_ptr() as *mut c_char,
            );
            gl::DeleteShader(shader);

            return Err(PBError::Compilation(info_log_to_string(&buf)));
        }

        Ok(shader)
    }
}

/// Info logs come back NUL terminated inside a fixed buffer.
fn info_log_to_string(buf: &[u8]) -> String {
    let data = buf.split(|a| *a == 0).next().unwrap_or(buf);

    String::from_utf8_lossy(data).trim_end().to_string()
}

#[derive(Debug, Error)]
pub enum PBError {
    #[error("Shader source contains a NUL byte")]
    InvalidSource,
    #[error("{0}")]
    Compilation(String),
    #[error("{0}")]
    Linking(String),
    #[error("Program has no active attribute `{0}`")]
    UnknownAttribute(String),
    #[error("Program has no active uniform `{0}`")]
    UnknownUniform(String),
}

pub struct Program {
    id: GLuint,
}

impl Program {
    pub fn get_id(&self) -> GLuint {
        self.id
    }

    pub fn attrib_location(&self, name: &str) -> Result<u32, PBError> {
        let c_name = CString::new(name).map_err(|_| PBError::InvalidSource)?;
        let location = unsafe { gl::GetAttribLocation(self.id, c_name.as_ptr()) };

        u32::try_from(location).map_err(|_| PBError::UnknownAttribute(name.to_string()))
    }

    pub fn uniform_location(&self, name: &str) -> Result<i32, PBError> {
        let c_name = CString::new(name).map_err(|_| PBError::InvalidSource)?;
        let location = unsafe { gl::GetUniformLocation(self.id, c_name.as_ptr()) };

        if location < 0 {
            return Err(PBError::UnknownUniform(name.to_string()));
        }

        Ok(location)
    }

    // Setters below act on whichever program is currently in use.

    pub fn set_mat4(&self, location: i32, matrix: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, matrix.as_ptr()) }
    }

    pub fn set_i32(&self, location: i32, value: i32) {
        unsafe { gl::Uniform1i(location, value) }
    }

    pub fn set_f32(&self, location: i32, value: f32) {
        unsafe { gl::Uniform1f(location, value) }
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_log_stops_at_nul() {
        let mut buf = [0_u8; 32];
        buf[..12].copy_from_slice(b"0:1: error\n\0");
        buf[13] = b'x';

        assert_eq!(info_log_to_string(&buf), "0:1: error");
    }

    #[test]
    fn info_log_without_nul_uses_whole_buffer() {
        assert_eq!(info_log_to_string(b"link failed"), "link failed");
    }

    #[test]
    fn nul_in_source_is_rejected_before_compiling() {
        let vert = ProgramBuilder::new("void main() {}\0", "void main() {}").build();
        assert!(matches!(vert, Err(PBError::InvalidSource)));

        let frag = compile_shader(gl::FRAGMENT_SHADER, "void\0main() {}");
        assert!(matches!(frag, Err(PBError::InvalidSource)));
    }

    #[test]
    fn empty_info_log() {
        assert_eq!(info_log_to_string(&[0_u8; 8]), "");
    }
}
