use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub vsync: bool,
    pub clear_color: [f32; 4],
    pub shader_path: PathBuf,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            window_title: "GlCanvas".to_string(),
            vsync: true,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader_path: PathBuf::from("assets/shaders/basic.shader"),
        }
    }
}

pub fn load_or_create_config() -> Result<RenderConfig> {
    let config_path = get_config_path()?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    if !config_path.exists() {
        let default_config = RenderConfig::default();
        let toml_content = toml::to_string_pretty(&default_config)?;
        std::fs::write(&config_path, toml_content).context("Failed to write default config")?;
        return Ok(default_config);
    }

    let content =
        std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "glcanvas", "GlCanvas")
        .context("Couldn't determine project directory")?;
    Ok(proj_dirs.config_dir().join("render.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_bootstrap_constants() {
        let config = RenderConfig::default();
        assert_eq!(config.window_width, 800);
        assert_eq!(config.window_height, 600);
        assert_eq!(config.clear_color, [0.2, 0.3, 0.3, 1.0]);
        assert_eq!(
            config.shader_path,
            PathBuf::from("assets/shaders/basic.shader")
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = RenderConfig::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: RenderConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.window_title, config.window_title);
        assert_eq!(parsed.vsync, config.vsync);
        assert_eq!(parsed.clear_color, config.clear_color);
    }
}
