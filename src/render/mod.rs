pub mod debug;
pub mod shaders;
pub mod source;

pub use debug::GlCallError;
pub use shaders::{ShaderError, ShaderProgram, ShaderStage};
pub use source::ShaderSource;
