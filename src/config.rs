use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Text injection method: "direct" or "clipboard"
    #[serde(default = "default_method")]
    pub method: String,

    /// Time a pointer move is spread over, in milliseconds. Zero teleports.
    #[serde(default = "default_move_duration_ms")]
    pub move_duration_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            move_duration_ms: default_move_duration_ms(),
        }
    }
}

fn default_method() -> String {
    "direct".into()
}

fn default_move_duration_ms() -> u64 {
    1000
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|s| toml::from_str(&s).ok())
                .unwrap_or_default()
        } else {
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.input.method, "direct");
        assert_eq!(config.input.move_duration_ms, 1000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[input]\nmethod = \"clipboard\"\n").unwrap();
        assert_eq!(config.input.method, "clipboard");
        assert_eq!(config.input.move_duration_ms, 1000);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.input.method, "direct");
    }
}
