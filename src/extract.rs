use rayon::prelude::*;
use tracing::{debug, warn};

use crate::classify::Label;
use crate::error::FeatureError;
use crate::features::{self, CombinePolicy, FeatureRow};
use crate::roster::{self, MatchRecord, Side};
use crate::table::AttributeTable;
use crate::team::Team;

/// Per-match outcome of a batch run: usable with full data, usable with
/// some features degraded to missing, or skipped outright.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionStatus {
    Full,
    Partial { missing: usize },
    Failed(FeatureError),
}

#[derive(Debug, Clone)]
pub struct MatchExtraction {
    pub match_id: i64,
    pub status: ExtractionStatus,
    pub row: Option<FeatureRow>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractSummary {
    pub matches: usize,
    pub full: usize,
    pub partial: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions<'a> {
    pub policy: CombinePolicy,
    pub player_attributes: &'a [&'a str],
    /// Team attribute columns joined per side; empty skips the team join.
    pub team_attributes: &'a [&'a str],
}

/// Pure per-match extraction: roster assembly, attribute resolution at the
/// match date, then aggregation. No shared mutable state, so the batch
/// runner can fan matches out across threads.
pub fn extract_match_features(
    record: &MatchRecord,
    players: &AttributeTable,
    attrs: &[&str],
    policy: CombinePolicy,
) -> Result<FeatureRow, FeatureError> {
    let mut roster = roster::extract_roster(record)?;
    roster.resolve_all(record.date, players);
    features::combine(&roster, attrs, policy)
}

/// Latest team snapshots for both sides, flattened under the aggregator's
/// side grammar (`{attr}_H_team` / `{attr}_A_team`).
pub fn team_feature_row(
    record: &MatchRecord,
    teams: &AttributeTable,
    columns: &[&str],
) -> Result<FeatureRow, FeatureError> {
    let mut row = FeatureRow::new();
    for (side, team_id) in [
        (Side::Home, record.home_team_id),
        (Side::Away, record.away_team_id),
    ] {
        let mut team = Team::new(team_id);
        team.load(teams);
        let entry = team.latest_entry(record.date, columns)?;
        for (name, value) in entry.values {
            row.insert(format!("{name}_{}_team", side.key()), value.as_num());
        }
    }
    Ok(row)
}

pub fn extract_all(
    matches: &[MatchRecord],
    players: &AttributeTable,
    teams: &AttributeTable,
    opts: &ExtractOptions<'_>,
) -> Vec<MatchExtraction> {
    matches
        .par_iter()
        .map(|record| extract_one(record, players, teams, opts))
        .collect()
}

pub fn summarize(results: &[MatchExtraction]) -> ExtractSummary {
    let mut summary = ExtractSummary {
        matches: results.len(),
        ..ExtractSummary::default()
    };
    for result in results {
        match result.status {
            ExtractionStatus::Full => summary.full += 1,
            ExtractionStatus::Partial { .. } => summary.partial += 1,
            ExtractionStatus::Failed(_) => summary.failed += 1,
        }
    }
    summary
}

fn extract_one(
    record: &MatchRecord,
    players: &AttributeTable,
    teams: &AttributeTable,
    opts: &ExtractOptions<'_>,
) -> MatchExtraction {
    let result = extract_match_features(record, players, opts.player_attributes, opts.policy)
        .and_then(|mut row| {
            if !opts.team_attributes.is_empty() {
                row.extend(team_feature_row(record, teams, opts.team_attributes)?);
            }
            Ok(row)
        });

    match result {
        Ok(row) => {
            let missing = features::missing_count(&row);
            let status = if missing == 0 {
                ExtractionStatus::Full
            } else {
                debug!(match_id = record.match_id, missing, "features degraded");
                ExtractionStatus::Partial { missing }
            };
            MatchExtraction {
                match_id: record.match_id,
                status,
                row: Some(row),
            }
        }
        Err(err) => {
            warn!(match_id = record.match_id, %err, "skipping malformed match");
            MatchExtraction {
                match_id: record.match_id,
                status: ExtractionStatus::Failed(err),
                row: None,
            }
        }
    }
}

/// Ground-truth labels for every finished match, in input order.
pub fn match_labels(matches: &[MatchRecord]) -> Vec<Option<Label>> {
    matches
        .iter()
        .map(|m| match (m.home_goals, m.away_goals) {
            (Some(h), Some(a)) => Some(Label::from_goals(h, a)),
            _ => None,
        })
        .collect()
}

/// Transposes extraction results into named feature columns, aligned by
/// result order. Failed matches contribute a missing cell per column.
pub fn feature_columns(results: &[MatchExtraction]) -> Vec<(String, Vec<Option<f64>>)> {
    let Some(first) = results.iter().find_map(|r| r.row.as_ref()) else {
        return Vec::new();
    };
    let names: Vec<&String> = first.keys().collect();

    names
        .iter()
        .map(|&name| {
            let column = results
                .iter()
                .map(|r| r.row.as_ref().and_then(|row| row.get(name).copied().flatten()))
                .collect();
            (name.clone(), column)
        })
        .collect()
}
