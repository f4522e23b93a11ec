use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

/// Runtime configuration. The only secret is the Gemini API key; its absence
/// disables the remote capabilities instead of failing startup.
#[derive(Debug, Default)]
pub struct Config {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    gemini: GeminiSection,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiSection {
    api_key: Option<String>,
}

impl Config {
    /// Loads the config file, with the `GEMINI_API_KEY` environment variable
    /// taking precedence. Missing or malformed files are treated as empty.
    pub fn load() -> Self {
        let from_env = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        let gemini_api_key = from_env.or_else(Self::key_from_file);
        Self { gemini_api_key }
    }

    fn key_from_file() -> Option<String> {
        let path = config_path()?;
        let content = fs::read_to_string(&path).ok()?;
        let parsed: ConfigFile = match toml::from_str(&content) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("ignoring malformed config at {}: {err}", path.display());
                return None;
            }
        };
        parsed.gemini.api_key.filter(|v| !v.trim().is_empty())
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("inkcal").join("config.toml"))
}
