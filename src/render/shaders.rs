use gl::types::*;
use std::ffi::{CString, NulError};
use std::fmt;
use std::path::Path;
use std::ptr;

use thiserror::Error;

use super::debug::GlCallError;
use super::source::ShaderSource;
use crate::gl_check;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to compile {stage} shader: {log}")]
    CompilationFailed { stage: ShaderStage, log: String },

    #[error("Failed to link shader program: {0}")]
    LinkingFailed(String),

    #[error("Shader program failed validation: {0}")]
    ValidationFailed(String),

    #[error("Failed to read shader asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shader source contains a NUL byte: {0}")]
    Nul(#[from] NulError),

    #[error(transparent)]
    Gl(#[from] GlCallError),
}

/// One compilable unit of GPU program code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "Vertex"),
            ShaderStage::Fragment => write!(f, "Fragment"),
        }
    }
}

/// A linked, validated program object. The handle is released on drop.
#[derive(Debug)]
pub struct ShaderProgram {
    id: GLuint,
}

impl ShaderProgram {
    /// Builds a program from a combined `.shader` asset on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let source = ShaderSource::from_file(path)?;
        Self::from_source(&source)
    }

    /// Compiles both stages, links them into one program, and validates it.
    /// A failed stage compile short-circuits before anything is attached.
    pub fn from_source(source: &ShaderSource) -> Result<Self, ShaderError> {
        let vertex_shader = compile_stage(ShaderStage::Vertex, &source.vertex)?;
        let fragment_shader = match compile_stage(ShaderStage::Fragment, &source.fragment) {
            Ok(id) => id,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(err);
            }
        };

        let program = gl_check!(unsafe { gl::CreateProgram() })?;
        gl_check!(unsafe { gl::AttachShader(program, vertex_shader) })?;
        gl_check!(unsafe { gl::AttachShader(program, fragment_shader) })?;
        gl_check!(unsafe { gl::LinkProgram(program) })?;

        // The compiled code is resident in the program once linked; the
        // stage objects are no longer needed.
        gl_check!(unsafe { gl::DeleteShader(vertex_shader) })?;
        gl_check!(unsafe { gl::DeleteShader(fragment_shader) })?;

        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        if success == 0 {
            let log = program_info_log(program);
            unsafe { gl::DeleteProgram(program) };
            return Err(ShaderError::LinkingFailed(log));
        }

        gl_check!(unsafe { gl::ValidateProgram(program) })?;

        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success);
        }
        if success == 0 {
            let log = program_info_log(program);
            unsafe { gl::DeleteProgram(program) };
            return Err(ShaderError::ValidationFailed(log));
        }

        Ok(ShaderProgram { id: program })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<GLuint, ShaderError> {
    let source_cstring = CString::new(source.as_bytes())?;

    let shader = gl_check!(unsafe { gl::CreateShader(stage.gl_kind()) })?;
    gl_check!(unsafe { gl::ShaderSource(shader, 1, &source_cstring.as_ptr(), ptr::null()) })?;
    gl_check!(unsafe { gl::CompileShader(shader) })?;

    let mut success = 1;
    unsafe {
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let log = shader_info_log(shader);
        log::error!("Failed to compile {} shader: {}", stage, log);
        unsafe { gl::DeleteShader(shader) };
        return Err(ShaderError::CompilationFailed { stage, log });
    }

    Ok(shader)
}

fn shader_info_log(shader: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
    }

    let log = create_whitespace_cstring_with_len(len as usize);
    unsafe {
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), log.as_ptr() as *mut GLchar);
    }
    log.to_string_lossy().into_owned()
}

fn program_info_log(program: GLuint) -> String {
    let mut len = 0;
    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
    }

    let log = create_whitespace_cstring_with_len(len as usize);
    unsafe {
        gl::GetProgramInfoLog(program, len, ptr::null_mut(), log.as_ptr() as *mut GLchar);
    }
    log.to_string_lossy().into_owned()
}

fn create_whitespace_cstring_with_len(len: usize) -> CString {
    // Allocate buffer of correct size
    let mut buffer: Vec<u8> = Vec::with_capacity(len + 1);
    // Fill it with spaces
    buffer.extend([b' '].iter().cycle().take(len));
    // Convert buffer to CString
    unsafe { CString::from_vec_unchecked(buffer) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_mapping() {
        assert_eq!(ShaderStage::Vertex.gl_kind(), gl::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_kind(), gl::FRAGMENT_SHADER);
    }

    #[test]
    fn test_stage_display_names() {
        assert_eq!(ShaderStage::Vertex.to_string(), "Vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "Fragment");
    }

    #[test]
    fn test_compile_error_names_the_stage() {
        let err = ShaderError::CompilationFailed {
            stage: ShaderStage::Fragment,
            log: "0:1: syntax error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to compile Fragment shader: 0:1: syntax error"
        );
    }

    #[test]
    fn test_missing_asset_converts_to_shader_error() {
        let err = ShaderProgram::from_file("no/such/asset.shader").unwrap_err();
        assert!(matches!(err, ShaderError::Io(_)));
    }

    #[test]
    fn test_whitespace_cstring_has_requested_len() {
        let log = create_whitespace_cstring_with_len(16);
        assert_eq!(log.as_bytes().len(), 16);
    }
}
