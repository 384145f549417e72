//! Win adjudication across round-ends.
//!
//! A player wins by being the only leader at or above the winning score on
//! [`ROUNDS_TO_WIN`] consecutive round-ends. A tie or a drop below the winning
//! score clears any progress.

use std::fmt;

use crate::round::RoundEvaluation;

/// Consecutive sole-leader round-ends at or above the winning score needed to win.
pub const ROUNDS_TO_WIN: u32 = 2;

/// Who is currently holding the lead past the winning score, and for how long.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentionState {
    pub contender: Option<String>,
    pub win_streak: u32,
}

impl ContentionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contender = None;
        self.win_streak = 0;
    }
}

/// Result of a round-end, for the UI to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continuing {
        leader: String,
        rounds_remaining: u32,
        message: String,
    },
    TieBroken {
        message: String,
        tied_players: Vec<String>,
    },
    NotYetAtThreshold {
        message: String,
    },
    Won {
        winner: String,
    },
}

impl Verdict {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn winner(&self) -> Option<&str> {
        match self {
            Verdict::Won { winner } => Some(winner.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Continuing { message, .. }
            | Verdict::TieBroken { message, .. }
            | Verdict::NotYetAtThreshold { message } => write!(f, "{}", message),
            Verdict::Won { winner } => write!(f, "{} wins!", winner),
        }
    }
}

/// The state to carry into the next round and the verdict for this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    pub state: ContentionState,
    pub verdict: Verdict,
}

/// Apply one round-end to the contention state.
///
/// On [`Verdict::Won`] the returned state still names the winner with a full
/// streak; the session clears it once the win has been recorded.
pub fn process_round_end(evaluation: &RoundEvaluation, state: ContentionState) -> RoundOutcome {
    let mut state = state;

    if !evaluation.threshold_reached {
        state.clear();
        let message = format!(
            "Round over. Nobody has reached {} points yet. Start the next round.",
            evaluation.winning_score
        );
        return RoundOutcome {
            state,
            verdict: Verdict::NotYetAtThreshold { message },
        };
    }

    let leader = match evaluation.sole_leader() {
        Some(leader) => leader.to_string(),
        None => {
            state.clear();
            let message = format!(
                "Tie for the lead at {} points! The game continues. Start the next round.",
                evaluation.top_score
            );
            return RoundOutcome {
                state,
                verdict: Verdict::TieBroken {
                    message,
                    tied_players: evaluation.leaders.clone(),
                },
            };
        }
    };

    if state.contender.as_deref() == Some(leader.as_str()) {
        state.win_streak += 1;
    } else {
        state.contender = Some(leader.clone());
        state.win_streak = 1;
    }

    let verdict = if state.win_streak >= ROUNDS_TO_WIN {
        Verdict::Won { winner: leader }
    } else {
        let rounds_remaining = ROUNDS_TO_WIN - state.win_streak;
        let message = format!(
            "{} has the lead with {} points! They must hold the lead for {} more round(s) to win. Start the next round.",
            leader, evaluation.top_score, rounds_remaining
        );
        Verdict::Continuing {
            leader,
            rounds_remaining,
            message,
        }
    };

    RoundOutcome { state, verdict }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::evaluate;
    use assert_matches::assert_matches;

    fn round(scores: &[(&str, i64)], state: ContentionState) -> RoundOutcome {
        let eval = evaluate(scores.iter().copied(), 10).unwrap();
        process_round_end(&eval, state)
    }

    fn contender(name: &str, streak: u32) -> ContentionState {
        ContentionState {
            contender: Some(name.to_string()),
            win_streak: streak,
        }
    }

    #[test]
    fn first_sole_lead_at_threshold_starts_a_streak() {
        let out = round(&[("A", 12), ("B", 0)], ContentionState::new());
        assert_eq!(out.state, contender("A", 1));
        assert_matches!(
            &out.verdict,
            Verdict::Continuing { leader, rounds_remaining: 1, message }
                if leader == "A" && message.contains("1 more round")
        );
    }

    #[test]
    fn tie_at_threshold_resets_progress() {
        let out = round(&[("A", 12), ("B", 12)], contender("A", 1));
        assert_eq!(out.state, ContentionState::new());
        assert_matches!(
            &out.verdict,
            Verdict::TieBroken { tied_players, message }
                if tied_players == &vec!["A".to_string(), "B".to_string()]
                    && message.starts_with("Tie for the lead at 12 points!")
        );
    }

    #[test]
    fn second_consecutive_sole_lead_wins() {
        let first = round(&[("A", 12), ("B", 3)], ContentionState::new());
        let second = round(&[("A", 15), ("B", 8)], first.state);
        assert_eq!(second.verdict, Verdict::Won { winner: "A".into() });
        assert_eq!(second.state, contender("A", 2));
        assert_eq!(second.verdict.winner(), Some("A"));
    }

    #[test]
    fn new_leader_starts_over_at_one() {
        let first = round(&[("A", 12), ("B", 3)], ContentionState::new());
        let second = round(&[("A", 12), ("B", 20)], first.state);
        assert_eq!(second.state, contender("B", 1));
        assert_matches!(second.verdict, Verdict::Continuing { leader, .. } if leader == "B");
    }

    #[test]
    fn dropping_below_threshold_clears_contender() {
        let first = round(&[("A", 12), ("B", 3)], ContentionState::new());
        let second = round(&[("A", 7), ("B", 3)], first.state);
        assert_eq!(second.state, ContentionState::new());
        assert_matches!(
            &second.verdict,
            Verdict::NotYetAtThreshold { message } if message.contains("10 points")
        );
    }

    #[test]
    fn below_threshold_with_no_contender_is_noop() {
        let out = round(&[("A", 1), ("B", 1)], ContentionState::new());
        assert_eq!(out.state, ContentionState::new());
        assert_matches!(out.verdict, Verdict::NotYetAtThreshold { .. });
    }

    #[test]
    fn tie_below_threshold_reports_not_yet() {
        // threshold check comes before the tie check
        let out = round(&[("A", 5), ("B", 5)], contender("A", 1));
        assert_matches!(out.verdict, Verdict::NotYetAtThreshold { .. });
        assert_eq!(out.state.win_streak, 0);
    }

    #[test]
    fn tie_between_two_sole_leads_prevents_win() {
        let s1 = round(&[("A", 12), ("B", 3)], ContentionState::new());
        let s2 = round(&[("A", 12), ("B", 12)], s1.state);
        let s3 = round(&[("A", 14), ("B", 12)], s2.state);
        assert_eq!(s3.state, contender("A", 1));
        assert_matches!(s3.verdict, Verdict::Continuing { .. });
        let s4 = round(&[("A", 14), ("B", 12)], s3.state);
        assert_eq!(s4.verdict, Verdict::Won { winner: "A".into() });
    }

    #[test]
    fn streak_is_zero_whenever_contender_is_none() {
        let mut state = ContentionState::new();
        let rounds: [&[(&str, i64)]; 6] = [
            &[("A", 11), ("B", 2)],
            &[("A", 11), ("B", 11)],
            &[("A", 4), ("B", 11)],
            &[("A", 4), ("B", 9)],
            &[("A", 13), ("B", 9)],
            &[("A", 13), ("B", 13)],
        ];
        for scores in rounds {
            state = round(scores, state).state;
            assert!(state.win_streak <= ROUNDS_TO_WIN);
            if state.contender.is_none() {
                assert_eq!(state.win_streak, 0);
            } else {
                assert!(state.win_streak > 0);
            }
        }
    }

    #[test]
    fn verdict_display_matches_message() {
        let out = round(&[("A", 12), ("B", 0)], ContentionState::new());
        assert_eq!(
            out.verdict.message(),
            "A has the lead with 12 points! They must hold the lead for 1 more round(s) to win. Start the next round."
        );
        assert_eq!(Verdict::Won { winner: "A".into() }.to_string(), "A wins!");
    }
}
