use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::game::GameCatalog;

/// Persistent settings: the game catalog and what was played last.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub games: GameCatalog,
    pub last_game: Option<String>,
    pub last_players: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            games: GameCatalog::default(),
            last_game: None,
            last_players: Vec::new(),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files yield the default config.
    fn load(&self) -> Config {
        let mut cfg = match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).unwrap_or_else(|e| {
                log::warn!("ignoring malformed config {}: {}", self.path.display(), e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };
        for (game, err) in cfg.games.retain_valid() {
            log::warn!("dropping game {:?} from {}: {}", game.name, self.path.display(), err);
        }
        cfg.games.ensure_default();
        cfg
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        log::debug!("saved config to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    cfg: std::cell::RefCell<Option<Config>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Config {
        self.cfg.borrow().clone().unwrap_or_default()
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        *self.cfg.borrow_mut() = Some(cfg.clone());
        Ok(())
    }
}
