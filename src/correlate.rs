use crate::error::FeatureError;

/// An unordered feature pair and its Pearson coefficient.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPair {
    pub a: String,
    pub b: String,
    pub r: f64,
}

/// Feature pairs correlated beyond the cutoffs. Cutoff ranges are validated
/// eagerly: `positive_cut_off` must sit in [0, 1] and `negative_cut_off` in
/// [-1, 0]. Pairs are deduplicated (i < j scan) and never self-paired;
/// missing cells drop the row from that pair's sample.
pub fn strong_pairs(
    columns: &[(String, Vec<Option<f64>>)],
    positive_cut_off: f64,
    negative_cut_off: f64,
) -> Result<Vec<CorrelationPair>, FeatureError> {
    if !(0.0..=1.0).contains(&positive_cut_off) {
        return Err(FeatureError::PositiveCutoff(positive_cut_off));
    }
    if !(-1.0..=0.0).contains(&negative_cut_off) {
        return Err(FeatureError::NegativeCutoff(negative_cut_off));
    }

    let mut out = Vec::new();
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let Some(r) = pearson(&columns[i].1, &columns[j].1) else {
                continue;
            };
            if r >= positive_cut_off || r <= negative_cut_off {
                out.push(CorrelationPair {
                    a: columns[i].0.clone(),
                    b: columns[j].0.clone(),
                    r,
                });
            }
        }
    }
    Ok(out)
}

/// Pairwise-complete Pearson r; `None` when fewer than two complete rows
/// survive or either column is constant.
fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0.0;
    let (mut sum_x, mut sum_y) = (0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        if let (Some(x), Some(y)) = (x, y) {
            n += 1.0;
            sum_x += x;
            sum_y += y;
        }
    }
    if n < 2.0 {
        return None;
    }
    let (mean_x, mean_y) = (sum_x / n, sum_y / n);

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        if let (Some(x), Some(y)) = (x, y) {
            let (dx, dy) = (x - mean_x, y - mean_y);
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[f64]) -> (String, Vec<Option<f64>>) {
        (name.to_string(), values.iter().copied().map(Some).collect())
    }

    #[test]
    fn out_of_range_cutoffs_are_rejected() {
        let cols = vec![column("a", &[1.0, 2.0])];
        assert_eq!(
            strong_pairs(&cols, 1.5, -0.5).unwrap_err(),
            FeatureError::PositiveCutoff(1.5)
        );
        assert_eq!(
            strong_pairs(&cols, 0.5, 0.2).unwrap_err(),
            FeatureError::NegativeCutoff(0.2)
        );
    }

    #[test]
    fn correlated_pair_is_reported_once_without_self_pairs() {
        // Near-linear with a wobble so r lands around 0.9, not 1.0.
        let cols = vec![
            column("stamina_avg_diff", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            column("strength_avg_diff", &[1.3, 1.6, 3.9, 3.2, 5.4]),
        ];
        let pairs = strong_pairs(&cols, 0.5, -1.0).unwrap();
        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert_eq!(pair.a, "stamina_avg_diff");
        assert_eq!(pair.b, "strength_avg_diff");
        assert!(pair.r > 0.85 && pair.r < 0.99);
    }

    #[test]
    fn negative_cutoff_picks_up_inverse_relationships() {
        let cols = vec![
            column("a", &[1.0, 2.0, 3.0, 4.0]),
            column("b", &[4.0, 3.0, 2.0, 1.0]),
        ];
        let pairs = strong_pairs(&cols, 1.0, -0.8).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!((pairs[0].r + 1.0).abs() < 1e-9);
    }

    #[test]
    fn weak_pairs_are_filtered_out() {
        let cols = vec![
            column("a", &[1.0, 2.0, 3.0, 4.0, 5.0]),
            column("b", &[2.0, 5.0, 1.0, 4.0, 3.0]),
        ];
        let pairs = strong_pairs(&cols, 0.9, -0.9).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn missing_cells_shrink_the_sample_instead_of_poisoning_it() {
        let cols = vec![
            (
                "a".to_string(),
                vec![Some(1.0), None, Some(3.0), Some(4.0)],
            ),
            (
                "b".to_string(),
                vec![Some(2.0), Some(9.0), Some(6.0), Some(8.0)],
            ),
        ];
        let pairs = strong_pairs(&cols, 0.5, -1.0).unwrap();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn constant_column_has_no_defined_correlation() {
        let cols = vec![
            column("a", &[3.0, 3.0, 3.0]),
            column("b", &[1.0, 2.0, 3.0]),
        ];
        let pairs = strong_pairs(&cols, 0.0, -0.0).unwrap();
        assert!(pairs.is_empty());
    }
}
