use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "scorekeep";

/// Centralized application directory resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    config_dir: PathBuf,
    state_dir: PathBuf,
}

impl AppDirs {
    /// XDG-style locations under `$HOME`, falling back to platform directories.
    pub fn resolve() -> Self {
        if let Ok(home) = std::env::var("HOME") {
            let home = PathBuf::from(home);
            Self {
                config_dir: home.join(".config").join(APP_NAME),
                state_dir: home.join(".local").join("state").join(APP_NAME),
            }
        } else if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            Self {
                config_dir: pd.config_dir().to_path_buf(),
                state_dir: pd.data_local_dir().to_path_buf(),
            }
        } else {
            Self::in_dir(".")
        }
    }

    /// Keep everything in one directory (used by `--data-dir`).
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            config_dir: dir.as_ref().to_path_buf(),
            state_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn db_path(&self) -> PathBuf {
        self.state_dir.join("history.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join("scorekeep.log")
    }
}
