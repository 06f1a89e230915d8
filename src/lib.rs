pub mod config;
pub mod render;

// Re-export commonly used types
pub use config::rendering::RenderConfig;
pub use render::debug::GlCallError;
pub use render::shaders::{ShaderError, ShaderProgram, ShaderStage};
pub use render::source::ShaderSource;
