use std::collections::BTreeMap;

use crate::error::FeatureError;
use crate::player::Player;
use crate::roster::{Roster, Side, SideRoster};

/// Flat feature mapping for one match. `None` is the missing sentinel;
/// key order is deterministic for export.
pub type FeatureRow = BTreeMap<String, Option<f64>>;

/// Player attribute columns used when the caller does not supply a list.
pub const DEFAULT_PLAYER_ATTRIBUTES: [&str; 8] = [
    "overall_rating",
    "potential",
    "short_passing",
    "ball_control",
    "reactions",
    "stamina",
    "strength",
    "interceptions",
];

/// Team attribute columns joined alongside the player features.
pub const DEFAULT_TEAM_ATTRIBUTES: [&str; 4] = [
    "buildUpPlaySpeed",
    "chanceCreationPassing",
    "defencePressure",
    "defenceAggression",
];

/// How per-player attributes are folded into match features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinePolicy {
    /// One feature per attribute, side and slot.
    All,
    /// Home slot i minus away slot i, positionally paired.
    Diff,
    /// Mean outfield difference per attribute plus a goalkeeper difference.
    AvgDiff,
}

impl CombinePolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(CombinePolicy::All),
            "diff" => Some(CombinePolicy::Diff),
            "avg_diff" => Some(CombinePolicy::AvgDiff),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CombinePolicy::All => "all",
            CombinePolicy::Diff => "diff",
            CombinePolicy::AvgDiff => "avg_diff",
        }
    }
}

/// Folds a resolved roster into a feature row for the requested attributes.
/// Missing values degrade the affected feature to `None` and never abort;
/// an unresolved player is the caller's bug and surfaces as an error.
pub fn combine(
    roster: &Roster,
    attrs: &[&str],
    policy: CombinePolicy,
) -> Result<FeatureRow, FeatureError> {
    let mut row = FeatureRow::new();
    for &attr in attrs {
        match policy {
            CombinePolicy::All => per_player(&mut row, roster, attr)?,
            CombinePolicy::Diff => pairwise_diff(&mut row, roster, attr)?,
            CombinePolicy::AvgDiff => averaged_diff(&mut row, roster, attr)?,
        }
    }
    Ok(row)
}

pub fn missing_count(row: &FeatureRow) -> usize {
    row.values().filter(|v| v.is_none()).count()
}

fn numeric(player: &Player, attr: &str) -> Result<Option<f64>, FeatureError> {
    Ok(player.attribute(attr)?.as_num())
}

fn per_player(row: &mut FeatureRow, roster: &Roster, attr: &str) -> Result<(), FeatureError> {
    for side in [Side::Home, Side::Away] {
        let side_roster = roster.side(side);
        for (index, player) in side_roster.players.iter().enumerate() {
            row.insert(
                format!("{attr}_{}_{}", side.key(), index + 1),
                numeric(player, attr)?,
            );
        }
        row.insert(
            format!("{attr}_{}_gk", side.key()),
            numeric(&side_roster.goalkeeper, attr)?,
        );
    }
    Ok(())
}

fn pairwise_diff(row: &mut FeatureRow, roster: &Roster, attr: &str) -> Result<(), FeatureError> {
    for (index, (home, away)) in roster
        .home
        .players
        .iter()
        .zip(&roster.away.players)
        .enumerate()
    {
        let value = match (numeric(home, attr)?, numeric(away, attr)?) {
            (Some(h), Some(a)) => Some(h - a),
            _ => None,
        };
        row.insert(format!("{attr}_diff_{}", index + 1), value);
    }
    row.insert(format!("{attr}_diff_gk"), goalkeeper_diff(roster, attr)?);
    Ok(())
}

fn averaged_diff(row: &mut FeatureRow, roster: &Roster, attr: &str) -> Result<(), FeatureError> {
    let value = match (outfield_sum(&roster.home, attr)?, outfield_sum(&roster.away, attr)?) {
        (Some(home), Some(away)) => {
            Some((home - away) / roster.home.players.len() as f64)
        }
        _ => None,
    };
    row.insert(format!("{attr}_avg_diff"), value);
    row.insert(format!("{attr}_diff_gk"), goalkeeper_diff(roster, attr)?);
    Ok(())
}

/// Sum over the 10 outfield players; one missing term poisons the whole sum.
fn outfield_sum(side: &SideRoster, attr: &str) -> Result<Option<f64>, FeatureError> {
    let mut sum = 0.0;
    for player in &side.players {
        match numeric(player, attr)? {
            Some(v) => sum += v,
            None => return Ok(None),
        }
    }
    Ok(Some(sum))
}

fn goalkeeper_diff(roster: &Roster, attr: &str) -> Result<Option<f64>, FeatureError> {
    Ok(
        match (
            numeric(&roster.home.goalkeeper, attr)?,
            numeric(&roster.away.goalkeeper, attr)?,
        ) {
            (Some(h), Some(a)) => Some(h - a),
            _ => None,
        },
    )
}
