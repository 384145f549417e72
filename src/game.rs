use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_GAME_NAME: &str = "Rummikub";
pub const DEFAULT_WINNING_SCORE: i64 = 100;

/// A configured game: a name and the score a player must reach.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub name: String,
    pub winning_score: i64,
}

impl Game {
    /// Build a game from user input. The name is trimmed.
    pub fn new(name: &str, winning_score: i64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyGameName);
        }
        if winning_score <= 0 {
            return Err(Error::InvalidWinningScore(winning_score));
        }
        Ok(Self {
            name: name.to_string(),
            winning_score,
        })
    }
}

impl Default for Game {
    fn default() -> Self {
        Self {
            name: DEFAULT_GAME_NAME.to_string(),
            winning_score: DEFAULT_WINNING_SCORE,
        }
    }
}

/// The persistent list of games, kept in insertion order with unique names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GameCatalog {
    games: Vec<Game>,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self { games: Vec::new() }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.name == name.trim())
    }

    pub fn get(&self, name: &str) -> Result<&Game> {
        self.find(name)
            .ok_or_else(|| Error::UnknownGame(name.trim().to_string()))
    }

    pub fn add(&mut self, game: Game) -> Result<()> {
        if self.find(&game.name).is_some() {
            return Err(Error::DuplicateGame(game.name));
        }
        self.games.push(game);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Game> {
        let idx = self
            .games
            .iter()
            .position(|g| g.name == name.trim())
            .ok_or_else(|| Error::UnknownGame(name.trim().to_string()))?;
        Ok(self.games.remove(idx))
    }

    /// Drops entries that `Game::new` would refuse and later duplicates of a
    /// name. Returns what was dropped and why.
    pub fn retain_valid(&mut self) -> Vec<(Game, Error)> {
        let mut kept: Vec<Game> = Vec::with_capacity(self.games.len());
        let mut dropped = Vec::new();
        for game in self.games.drain(..) {
            match Game::new(&game.name, game.winning_score) {
                Ok(valid) if kept.iter().any(|g| g.name == valid.name) => {
                    let err = Error::DuplicateGame(valid.name);
                    dropped.push((game, err));
                }
                Ok(valid) => kept.push(valid),
                Err(err) => dropped.push((game, err)),
            }
        }
        self.games = kept;
        dropped
    }

    /// Inserts the default game when nothing is configured.
    pub fn ensure_default(&mut self) {
        if self.games.is_empty() {
            self.games.push(Game::default());
        }
    }
}

impl Default for GameCatalog {
    fn default() -> Self {
        let mut catalog = Self::new();
        catalog.ensure_default();
        catalog
    }
}
