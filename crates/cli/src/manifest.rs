use std::{fs, path::Path};

use golinks_sdk::ClientConfig;
use serde::{Deserialize, Serialize};

/// Optional golinks.toml next to where the CLI runs
///
/// ```toml
/// endpoint = "http://go.example"
/// page_size = 500
/// include_generated_names = false
/// timeout_ms = 10000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub endpoint: Option<String>,
    pub page_size: Option<u32>,
    pub include_generated_names: Option<bool>,
    pub timeout_ms: Option<u64>,
}

impl Manifest {
    /// Load the manifest, or an empty one if the file doesn't exist
    pub fn load(manifest_file_path: &Path) -> Result<Self, String> {
        if !manifest_file_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(manifest_file_path)
            .map_err(|e| format!("Failed to read {}: {}", manifest_file_path.display(), e))?;

        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse {}: {}", manifest_file_path.display(), e))
    }

    /// Lay the manifest over the client defaults
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(include) = self.include_generated_names {
            config = config.with_generated_names(include);
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config = config.with_timeout(timeout_ms);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::load(&dir.path().join("golinks.toml")).unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.client_config(), ClientConfig::default());
    }

    #[test]
    fn test_load_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golinks.toml");
        fs::write(
            &path,
            "endpoint = \"http://go.example\"\npage_size = 20000\ntimeout_ms = 500\n",
        )
        .unwrap();

        let config = Manifest::load(&path).unwrap().client_config();
        assert_eq!(config.endpoint, "http://go.example");
        assert_eq!(config.page_size, 10_000);
        assert_eq!(config.timeout_ms, 500);
        assert!(!config.include_generated_names);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golinks.toml");
        fs::write(&path, "page_size = \"lots\"\n").unwrap();

        let error = Manifest::load(&path).unwrap_err();
        assert!(error.starts_with("Failed to parse"), "{error}");
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("golinks.toml");
        fs::write(&path, "endpiont = \"http://go.example\"\n").unwrap();

        assert!(Manifest::load(&path).is_err());
    }
}
