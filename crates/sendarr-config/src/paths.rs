use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("SENDARR_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("sendarr");

        Ok(Self { config_dir: base_dir })
    }

    pub fn from_container_env() -> Self {
        Self {
            config_dir: container_base_path(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // A pre-created base directory indicates a container deployment
        let base = container_base_path();
        if base.exists() {
            return Self::from_container_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_container_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_directories_creates_only_the_config_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = PathManager {
            config_dir: tmp.path().join("nested").join("sendarr"),
        };

        manager.ensure_directories().unwrap();

        assert!(manager.config_dir().is_dir());
        assert_eq!(
            manager.settings_file(),
            manager.config_dir().join("settings.toml")
        );
        let entries: Vec<_> = std::fs::read_dir(manager.config_dir())
            .unwrap()
            .collect();
        assert!(entries.is_empty());
    }
}
