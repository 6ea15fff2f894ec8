use std::fmt;

use chrono::NaiveDate;

use crate::error::FeatureError;
use crate::player::Player;
use crate::table::AttributeTable;

pub const SLOTS_PER_SIDE: usize = 11;

/// Pitch coordinates that mark the goalkeeper slot in the match layout.
pub const GOALKEEPER_POSITION: (i32, i32) = (1, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    /// Short key used in feature names.
    pub fn key(&self) -> &'static str {
        match self {
            Side::Home => "H",
            Side::Away => "A",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => write!(f, "home"),
            Side::Away => write!(f, "away"),
        }
    }
}

/// One of the 11 numbered positions in the match record layout for a side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SlotRecord {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub player_id: Option<i64>,
}

impl SlotRecord {
    fn position(&self) -> Option<(i32, i32)> {
        Some((self.x?, self.y?))
    }

    fn is_goalkeeper(&self) -> bool {
        self.position() == Some(GOALKEEPER_POSITION)
    }
}

/// One row of the flat match table: per side, 11 slots of pitch coordinates
/// and player ids, plus the match date and final score when known.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub match_id: i64,
    pub date: NaiveDate,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_goals: Option<i32>,
    pub away_goals: Option<i32>,
    pub home_slots: [SlotRecord; SLOTS_PER_SIDE],
    pub away_slots: [SlotRecord; SLOTS_PER_SIDE],
}

/// 10 outfield players in slot order (goalkeeper slot removed) plus the
/// goalkeeper. The order matters: pairwise aggregation pairs slot i against
/// slot i positionally.
#[derive(Debug, Clone)]
pub struct SideRoster {
    pub players: Vec<Player>,
    pub goalkeeper: Player,
}

impl SideRoster {
    fn resolve_all(&mut self, as_of: NaiveDate, table: &AttributeTable) {
        for player in &mut self.players {
            player.resolve(as_of, table);
        }
        self.goalkeeper.resolve(as_of, table);
    }
}

#[derive(Debug, Clone)]
pub struct Roster {
    pub home: SideRoster,
    pub away: SideRoster,
}

impl Roster {
    pub fn side(&self, side: Side) -> &SideRoster {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    /// Resolves all 22 players against the player attribute table for the
    /// match date. Explicit second step after extraction.
    pub fn resolve_all(&mut self, as_of: NaiveDate, players: &AttributeTable) {
        self.home.resolve_all(as_of, players);
        self.away.resolve_all(as_of, players);
    }
}

/// Builds both side rosters from one match record. Fails on a side without
/// exactly one goalkeeper-marked slot or on a slot with no player id.
pub fn extract_roster(record: &MatchRecord) -> Result<Roster, FeatureError> {
    Ok(Roster {
        home: side_roster(&record.home_slots, Side::Home)?,
        away: side_roster(&record.away_slots, Side::Away)?,
    })
}

fn side_roster(
    slots: &[SlotRecord; SLOTS_PER_SIDE],
    side: Side,
) -> Result<SideRoster, FeatureError> {
    let gk_slots: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.is_goalkeeper())
        .map(|(index, _)| index)
        .collect();
    if gk_slots.len() != 1 {
        return Err(FeatureError::GoalkeeperCount {
            side,
            found: gk_slots.len(),
        });
    }
    let gk_index = gk_slots[0];

    let Some(gk_id) = slots[gk_index].player_id else {
        return Err(FeatureError::MissingPlayerId {
            side,
            slot: gk_index + 1,
        });
    };

    let mut players = Vec::with_capacity(SLOTS_PER_SIDE - 1);
    for (index, slot) in slots.iter().enumerate() {
        if index == gk_index {
            continue;
        }
        let Some(player_id) = slot.player_id else {
            return Err(FeatureError::MissingPlayerId {
                side,
                slot: index + 1,
            });
        };
        players.push(Player::new(player_id));
    }

    Ok(SideRoster {
        players,
        goalkeeper: Player::new(gk_id),
    })
}
