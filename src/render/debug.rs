use gl::types::GLenum;
use thiserror::Error;

/// Error code pulled off the driver's queue after a wrapped GL call.
///
/// The `Display` form is the diagnostic line that [`check_call`] also
/// writes to the log.
#[derive(Debug, Clone, Error)]
#[error("[ERROR] ({code}) : {call} {file} : {line}")]
pub struct GlCallError {
    pub code: GLenum,
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

/// Drains the GL error queue so stale codes are not misattributed to the
/// next wrapped call.
pub fn clear_errors() {
    while unsafe { gl::GetError() } != gl::NO_ERROR {}
}

/// Reads the error queue once after a wrapped call. Only the first queued
/// code is reported; anything behind it is discarded by the next
/// [`clear_errors`].
pub fn check_call(
    call: &'static str,
    file: &'static str,
    line: u32,
) -> Result<(), GlCallError> {
    let code = unsafe { gl::GetError() };
    if code == gl::NO_ERROR {
        return Ok(());
    }

    let err = GlCallError {
        code,
        call,
        file,
        line,
    };
    log::error!("{}", err);
    Err(err)
}

/// Wraps one GL call with error-queue bookkeeping: clear before, invoke,
/// check after. Yields `Result<T, GlCallError>` where `T` is the call's
/// return value, so the caller decides whether a driver error is fatal.
///
/// ```ignore
/// let id = gl_check!(unsafe { gl::CreateShader(gl::VERTEX_SHADER) })?;
/// ```
#[macro_export]
macro_rules! gl_check {
    ($call:expr) => {{
        $crate::render::debug::clear_errors();
        let ret = $call;
        $crate::render::debug::check_call(stringify!($call), file!(), line!()).map(|_| ret)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_line_format() {
        let err = GlCallError {
            code: 1282,
            call: "gl::AttachShader(program, vs)",
            file: "src/render/shaders.rs",
            line: 57,
        };
        assert_eq!(
            err.to_string(),
            "[ERROR] (1282) : gl::AttachShader(program, vs) src/render/shaders.rs : 57"
        );
    }
}
