use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::contention::{process_round_end, ContentionState, Verdict};
use crate::error::{Error, Result};
use crate::game::Game;
use crate::history::HistoryRecord;
use crate::round::{evaluate, RoundEvaluation};

/// One entry of the point log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PointEntry {
    pub player: String,
    pub points_added: i64,
    pub new_score: i64,
    pub timestamp: DateTime<Local>,
}

/// What happened after points were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreUpdate {
    pub player: String,
    pub new_score: i64,
    /// Someone is at or above the winning score, so the round should be closed.
    pub round_end_due: bool,
}

/// Parse user-entered points. Leading `+` and surrounding spaces are accepted.
pub fn parse_points(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    digits
        .parse::<i64>()
        .map_err(|_| Error::InvalidPoints(input.trim().to_string()))
}

/// Trim names, drop blanks and reject duplicates.
pub fn validate_players<I, S>(names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name.to_string()) {
            return Err(Error::DuplicatePlayer(name.to_string()));
        }
        players.push(name.to_string());
    }
    if players.is_empty() {
        return Err(Error::NoPlayers);
    }
    Ok(players)
}

/// The one session being played.
#[derive(Debug, Clone)]
pub struct Session {
    pub game: Game,
    pub players: Vec<String>,
    pub scores: BTreeMap<String, i64>,
    pub started_at: DateTime<Local>,
    pub ended_at: Option<DateTime<Local>>,
    pub winner: Option<String>,
    pub point_log: Vec<PointEntry>,
    pub contention: ContentionState,
    pub rounds_played: u32,
}

impl Session {
    pub fn start<I, S>(game: Game, players: I, now: DateTime<Local>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let players = validate_players(players)?;
        let scores = players.iter().map(|p| (p.clone(), 0)).collect();
        log::info!(
            "session started: {} (first to {}) with {}",
            game.name,
            game.winning_score,
            players.join(", ")
        );
        Ok(Self {
            game,
            players,
            scores,
            started_at: now,
            ended_at: None,
            winner: None,
            point_log: Vec::new(),
            contention: ContentionState::new(),
            rounds_played: 0,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn score(&self, player: &str) -> Option<i64> {
        self.scores.get(player).copied()
    }

    /// Scores in player order.
    pub fn standings(&self) -> Vec<(&str, i64)> {
        self.players
            .iter()
            .map(|p| (p.as_str(), self.scores.get(p).copied().unwrap_or_default()))
            .collect()
    }

    pub fn evaluate(&self) -> Result<RoundEvaluation> {
        evaluate(self.standings(), self.game.winning_score)
    }

    pub fn add_points(&mut self, player: &str, delta: i64, now: DateTime<Local>) -> Result<ScoreUpdate> {
        if self.is_finished() {
            return Err(Error::SessionFinished);
        }
        let score = self
            .scores
            .get_mut(player)
            .ok_or_else(|| Error::UnknownPlayer(player.to_string()))?;
        let new_score = score
            .checked_add(delta)
            .ok_or_else(|| Error::ScoreOutOfRange {
                player: player.to_string(),
                score: *score,
                delta,
            })?;
        *score = new_score;

        self.point_log.push(PointEntry {
            player: player.to_string(),
            points_added: delta,
            new_score,
            timestamp: now,
        });
        log::debug!("{} scored {} (new total {})", player, delta, new_score);

        let round_end_due = self.evaluate()?.threshold_reached;
        Ok(ScoreUpdate {
            player: player.to_string(),
            new_score,
            round_end_due,
        })
    }

    /// Close the current round and adjudicate it. A win finishes the session.
    pub fn end_round(&mut self, now: DateTime<Local>) -> Result<Verdict> {
        if self.is_finished() {
            return Err(Error::SessionFinished);
        }
        let evaluation = self.evaluate()?;
        let outcome = process_round_end(&evaluation, std::mem::take(&mut self.contention));
        self.contention = outcome.state;
        self.rounds_played += 1;
        log::info!("round {} ended: {}", self.rounds_played, outcome.verdict);

        if let Verdict::Won { winner } = &outcome.verdict {
            self.winner = Some(winner.clone());
            self.ended_at = Some(now);
            self.contention.clear();
            log::info!("winner declared: {} in {}", winner, self.game.name);
        }
        Ok(outcome.verdict)
    }

    /// Stop without a winner. The session is recorded as incomplete.
    pub fn abandon(&mut self, now: DateTime<Local>) {
        if !self.is_finished() {
            self.ended_at = Some(now);
            self.contention.clear();
            log::info!("session abandoned: {}", self.game.name);
        }
    }

    /// The history record for this session; `now` stands in for a missing end time.
    pub fn to_record(&self, now: DateTime<Local>) -> HistoryRecord {
        HistoryRecord::new(
            &self.game.name,
            self.players.clone(),
            self.started_at,
            Some(self.ended_at.unwrap_or(now)),
            self.winner.clone(),
            self.point_log.clone(),
        )
    }
}
