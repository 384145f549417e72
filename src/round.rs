use crate::error::{Error, Result};

/// Snapshot of who is leading when a round is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundEvaluation {
    pub top_score: i64,
    /// Every player tied at `top_score`, in the order the scores were given.
    pub leaders: Vec<String>,
    pub winning_score: i64,
    pub threshold_reached: bool,
}

impl RoundEvaluation {
    /// The leader when exactly one player holds the top score.
    pub fn sole_leader(&self) -> Option<&str> {
        match self.leaders.as_slice() {
            [leader] => Some(leader.as_str()),
            _ => None,
        }
    }
}

/// Find the top score, the players holding it and whether it reaches
/// `winning_score`.
pub fn evaluate<'a, I>(scores: I, winning_score: i64) -> Result<RoundEvaluation>
where
    I: IntoIterator<Item = (&'a str, i64)>,
{
    let scores: Vec<(&str, i64)> = scores.into_iter().collect();
    let top_score = scores
        .iter()
        .map(|&(_, score)| score)
        .max()
        .ok_or(Error::NoScores)?;

    let leaders = scores
        .iter()
        .filter(|&&(_, score)| score == top_score)
        .map(|&(player, _)| player.to_string())
        .collect();

    Ok(RoundEvaluation {
        top_score,
        leaders,
        winning_score,
        threshold_reached: top_score >= winning_score,
    })
}
