pub mod rendering;

pub use rendering::{load_or_create_config, RenderConfig};
