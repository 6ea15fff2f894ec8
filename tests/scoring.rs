use matchsheet::classify::{
    self, Label, ProbPair, classify_prob_diff, classify_win_prob,
};
use matchsheet::correlate;
use matchsheet::error::FeatureError;

#[test]
fn prob_diff_examples_from_the_threshold_model() {
    assert_eq!(
        classify_prob_diff(ProbPair { win: 0.6, loss: 0.1 }, 0.2, 0.2),
        Label::HomeWin
    );
    assert_eq!(
        classify_prob_diff(ProbPair { win: 0.3, loss: 0.5 }, 0.1, 0.1),
        Label::HomeLoss
    );
    assert_eq!(
        classify_prob_diff(
            ProbPair {
                win: 0.5,
                loss: 0.45
            },
            0.1,
            0.1
        ),
        Label::Tie
    );
}

#[test]
fn asymmetric_coefficients_control_each_side_of_the_tie_band() {
    let row = ProbPair { win: 0.2, loss: 0.5 };
    assert_eq!(classify_prob_diff(row, 0.1, 0.4), Label::Tie);
    assert_eq!(classify_prob_diff(row, 0.1, 0.2), Label::HomeLoss);
}

#[test]
fn single_prob_variant_uses_inclusive_thresholds() {
    assert_eq!(classify_win_prob(0.85, 0.15, 0.2), Label::HomeWin);
    assert_eq!(classify_win_prob(0.2, 0.15, 0.2), Label::HomeLoss);
    assert_eq!(classify_win_prob(0.6, 0.15, 0.2), Label::Tie);
}

#[test]
fn scorer_flags_misclassified_rows_only() {
    let guesses = [Label::HomeWin, Label::Tie];
    let truth = [Label::HomeWin, Label::HomeLoss];
    assert_eq!(classify::misclassified(&guesses, &truth), vec![0, 1]);

    let rows = [
        ProbPair { win: 0.8, loss: 0.1 },
        ProbPair { win: 0.4, loss: 0.4 },
        ProbPair { win: 0.1, loss: 0.7 },
    ];
    let truth = [Label::HomeWin, Label::HomeWin, Label::HomeLoss];
    assert_eq!(
        classify::score_prob_diff(&rows, &truth, 0.25, 0.25),
        vec![0, 1, 0]
    );
}

#[test]
fn correlation_cutoffs_are_validated_before_any_work() {
    let cols = vec![("a".to_string(), vec![Some(1.0), Some(2.0)])];
    assert_eq!(
        correlate::strong_pairs(&cols, 1.5, -0.5).unwrap_err(),
        FeatureError::PositiveCutoff(1.5)
    );
}

#[test]
fn correlated_feature_pair_is_reported_once() {
    let cols = vec![
        (
            "stamina_avg_diff".to_string(),
            vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        ),
        (
            "strength_avg_diff".to_string(),
            vec![Some(1.3), Some(1.6), Some(3.9), Some(3.2), Some(5.4)],
        ),
    ];
    let pairs = correlate::strong_pairs(&cols, 0.5, -1.0).unwrap();
    assert_eq!(pairs.len(), 1);
    assert!(pairs[0].r > 0.85 && pairs[0].r < 0.99);
    assert_ne!(pairs[0].a, pairs[0].b);
}
