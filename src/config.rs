use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transcoder::EncodeOptions;

/// Optional JSON settings file; every field has a default so a partial
/// file is valid.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default = "default_bitrate_kbps")]
    pub bitrate_kbps: u32,

    #[serde(default)]
    pub skip_existing: bool,

    #[serde(default = "default_crf")]
    pub crf: u32,

    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_encoder")]
    pub encoder: String,
}

fn default_extensions() -> Vec<String> {
    vec![String::from("mp4"), String::from("wmv")]
}

fn default_bitrate_kbps() -> u32 {
    3000
}

fn default_crf() -> u32 {
    23
}

fn default_preset() -> String {
    String::from("medium")
}

fn default_encoder() -> String {
    String::from("ffmpeg")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            extensions: default_extensions(),
            bitrate_kbps: default_bitrate_kbps(),
            skip_existing: false,
            crf: default_crf(),
            preset: default_preset(),
            encoder: default_encoder(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|err| ConfigError::Io(path.to_path_buf(), err.to_string()))?;
        serde_json::from_str(&text)
            .map_err(|err| ConfigError::Parse(path.to_path_buf(), err.to_string()))
    }

    pub fn encode_options(&self, bitrate_kbps: u32) -> EncodeOptions {
        EncodeOptions {
            program: self.encoder.clone(),
            crf: self.crf,
            preset: self.preset.clone(),
            bitrate_kbps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["mp4", "wmv"]);
        assert_eq!(config.bitrate_kbps, 3000);
        assert!(!config.skip_existing);
        assert_eq!(config.crf, 23);
        assert_eq!(config.preset, "medium");
        assert_eq!(config.encoder, "ffmpeg");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{ "bitrate_kbps": 1500 }"#).unwrap();
        assert_eq!(config.bitrate_kbps, 1500);
        assert_eq!(config.preset, "medium");
        assert_eq!(config.extensions, vec!["mp4", "wmv"]);
    }

    #[test]
    fn test_load_missing_file() {
        match Config::load(Path::new("/no/such/config.json")) {
            Err(ConfigError::Io(_, _)) => (),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_, _))));
    }
}
