use std::fmt;

/// Discrete match outcome from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    HomeWin,
    HomeLoss,
    Tie,
}

impl Label {
    pub fn from_goals(home_goals: i32, away_goals: i32) -> Label {
        if home_goals > away_goals {
            Label::HomeWin
        } else if home_goals < away_goals {
            Label::HomeLoss
        } else {
            Label::Tie
        }
    }

    pub fn parse(raw: &str) -> Option<Label> {
        match raw {
            "Home Win" => Some(Label::HomeWin),
            "Home Loss" => Some(Label::HomeLoss),
            "Tie" => Some(Label::Tie),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::HomeWin => "Home Win",
            Label::HomeLoss => "Home Loss",
            Label::Tie => "Tie",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicted win/loss probability pair for one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbPair {
    pub win: f64,
    pub loss: f64,
}

/// Probability-difference variant. `coef_a` widens the tie band on the win
/// side, `coef_b` on the loss side; both comparisons are strict.
pub fn classify_prob_diff(probs: ProbPair, coef_a: f64, coef_b: f64) -> Label {
    let edge = probs.win - probs.loss;
    if edge > coef_a {
        Label::HomeWin
    } else if edge < -coef_b {
        Label::HomeLoss
    } else {
        Label::Tie
    }
}

/// Single-probability variant over a scalar win probability.
pub fn classify_win_prob(win: f64, coef_win: f64, coef_loss: f64) -> Label {
    if win >= 1.0 - coef_win {
        Label::HomeWin
    } else if win <= coef_loss {
        Label::HomeLoss
    } else {
        Label::Tie
    }
}

/// 0/1 indicator per row, 1 = misclassified. Extra rows on either side are
/// ignored; external coefficient-search loops consume this vector directly.
pub fn misclassified(guesses: &[Label], truth: &[Label]) -> Vec<u8> {
    guesses
        .iter()
        .zip(truth)
        .map(|(guess, actual)| u8::from(guess != actual))
        .collect()
}

pub fn score_prob_diff(rows: &[ProbPair], truth: &[Label], coef_a: f64, coef_b: f64) -> Vec<u8> {
    let guesses: Vec<Label> = rows
        .iter()
        .map(|row| classify_prob_diff(*row, coef_a, coef_b))
        .collect();
    misclassified(&guesses, truth)
}

pub fn score_win_prob(probs: &[f64], truth: &[Label], coef_win: f64, coef_loss: f64) -> Vec<u8> {
    let guesses: Vec<Label> = probs
        .iter()
        .map(|p| classify_win_prob(*p, coef_win, coef_loss))
        .collect();
    misclassified(&guesses, truth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goals_map_to_labels() {
        assert_eq!(Label::from_goals(3, 1), Label::HomeWin);
        assert_eq!(Label::from_goals(0, 2), Label::HomeLoss);
        assert_eq!(Label::from_goals(1, 1), Label::Tie);
    }

    #[test]
    fn prob_diff_classifies_the_three_bands() {
        let win = ProbPair { win: 0.6, loss: 0.1 };
        assert_eq!(classify_prob_diff(win, 0.2, 0.2), Label::HomeWin);

        let loss = ProbPair { win: 0.3, loss: 0.5 };
        assert_eq!(classify_prob_diff(loss, 0.1, 0.1), Label::HomeLoss);

        let tie = ProbPair {
            win: 0.5,
            loss: 0.45,
        };
        assert_eq!(classify_prob_diff(tie, 0.1, 0.1), Label::Tie);
    }

    #[test]
    fn prob_diff_band_edges_are_strict() {
        let on_a = ProbPair { win: 0.5, loss: 0.3 };
        assert_eq!(classify_prob_diff(on_a, 0.2, 0.2), Label::Tie);
        let on_b = ProbPair { win: 0.3, loss: 0.5 };
        assert_eq!(classify_prob_diff(on_b, 0.2, 0.2), Label::Tie);
    }

    #[test]
    fn win_prob_thresholds_are_inclusive() {
        assert_eq!(classify_win_prob(0.8, 0.2, 0.3), Label::HomeWin);
        assert_eq!(classify_win_prob(0.3, 0.2, 0.3), Label::HomeLoss);
        assert_eq!(classify_win_prob(0.5, 0.2, 0.3), Label::Tie);
    }

    #[test]
    fn misclassification_vector_flags_wrong_guesses() {
        let guesses = [Label::HomeWin, Label::Tie];
        let truth = [Label::HomeWin, Label::HomeLoss];
        assert_eq!(misclassified(&guesses, &truth), vec![0, 1]);
    }

    #[test]
    fn score_prob_diff_applies_row_wise() {
        let rows = [
            ProbPair { win: 0.6, loss: 0.1 },
            ProbPair { win: 0.3, loss: 0.5 },
            ProbPair {
                win: 0.5,
                loss: 0.45,
            },
        ];
        let truth = [Label::HomeWin, Label::HomeWin, Label::Tie];
        assert_eq!(score_prob_diff(&rows, &truth, 0.2, 0.2), vec![0, 1, 0]);
    }

    #[test]
    fn label_text_round_trips() {
        for label in [Label::HomeWin, Label::HomeLoss, Label::Tie] {
            assert_eq!(Label::parse(label.as_str()), Some(label));
        }
        assert_eq!(Label::parse("Away Win"), None);
    }
}
