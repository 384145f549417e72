use assert_matches::assert_matches;
use rand::Rng;
use scorekeep::{evaluate, process_round_end, ContentionState, Verdict, ROUNDS_TO_WIN};

/// Play a list of score snapshots as consecutive round-ends.
fn play(rounds: &[&[(&str, i64)]], winning_score: i64) -> Vec<(Verdict, ContentionState)> {
    let mut state = ContentionState::new();
    let mut out = Vec::new();
    for scores in rounds {
        let eval = evaluate(scores.iter().copied(), winning_score).unwrap();
        let outcome = process_round_end(&eval, state);
        state = outcome.state.clone();
        out.push((outcome.verdict, outcome.state));
    }
    out
}

#[test]
fn evaluator_matches_brute_force_on_random_scores() {
    let mut rng = rand::thread_rng();
    let names = ["A", "B", "C", "D", "E"];
    for _ in 0..500 {
        let n = rng.gen_range(1..=names.len());
        let scores: Vec<(&str, i64)> = names[..n]
            .iter()
            .map(|&p| (p, rng.gen_range(-5..=5)))
            .collect();
        let winning: i64 = rng.gen_range(1..=6);
        let eval = evaluate(scores.iter().copied(), winning).unwrap();

        let max = scores.iter().map(|s| s.1).max().unwrap();
        let expected: Vec<String> = scores
            .iter()
            .filter(|s| s.1 == max)
            .map(|s| s.0.to_string())
            .collect();
        assert_eq!(eval.top_score, max);
        assert_eq!(eval.leaders, expected);
        assert!(!eval.leaders.is_empty());
        assert_eq!(eval.threshold_reached, max >= winning);
    }
}

#[test]
fn random_rounds_keep_streak_invariants() {
    let mut rng = rand::thread_rng();
    let mut state = ContentionState::new();
    for _ in 0..1000 {
        let scores: [(&str, i64); 2] = [("A", rng.gen_range(0..4)), ("B", rng.gen_range(0..4))];
        let eval = evaluate(scores, 2).unwrap();
        let outcome = process_round_end(&eval, state);

        if !eval.threshold_reached {
            assert_matches!(outcome.verdict, Verdict::NotYetAtThreshold { .. });
            assert_eq!(outcome.state, ContentionState::new());
        } else if eval.leaders.len() > 1 {
            assert_matches!(outcome.verdict, Verdict::TieBroken { .. });
            assert_eq!(outcome.state.win_streak, 0);
        }
        assert!(outcome.state.win_streak <= ROUNDS_TO_WIN);
        assert_eq!(
            outcome.state.contender.is_none(),
            outcome.state.win_streak == 0
        );

        // a win ends the session, so the next round starts from scratch
        state = if outcome.verdict.winner().is_some() {
            ContentionState::new()
        } else {
            outcome.state
        };
    }
}

#[test]
fn scenario_lead_then_tie() {
    let results = play(&[&[("A", 12), ("B", 0)], &[("A", 12), ("B", 12)]], 10);

    assert_matches!(
        &results[0].0,
        Verdict::Continuing { message, .. } if message.contains("1 more round")
    );
    assert_eq!(results[0].1.contender.as_deref(), Some("A"));
    assert_eq!(results[0].1.win_streak, 1);

    assert_matches!(
        &results[1].0,
        Verdict::TieBroken { tied_players, .. } if tied_players.len() == 2
    );
    assert_eq!(results[1].1, ContentionState::new());
}

#[test]
fn scenario_two_rounds_in_a_row_wins() {
    let results = play(&[&[("A", 12), ("B", 0)], &[("A", 12), ("B", 4)]], 10);
    assert_eq!(results[1].0, Verdict::Won { winner: "A".into() });
}

#[test]
fn scenario_leader_switch_restarts_streak() {
    let results = play(&[&[("A", 12), ("B", 0)], &[("A", 12), ("B", 13)]], 10);
    assert_eq!(results[1].1.contender.as_deref(), Some("B"));
    assert_eq!(results[1].1.win_streak, 1);
}

#[test]
fn scenario_negative_adjustment_drops_contender() {
    let results = play(&[&[("A", 12), ("B", 0)], &[("A", 2), ("B", 0)]], 10);
    assert_matches!(results[1].0, Verdict::NotYetAtThreshold { .. });
    assert_eq!(results[1].1.contender, None);
}
