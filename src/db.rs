use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use tracing::warn;

use crate::roster::{MatchRecord, SLOTS_PER_SIDE, SlotRecord};
use crate::table::{AttributeSnapshot, AttributeTable, Value};

pub const TEAM_ATTRIBUTES_TABLE: &str = "Team_Attributes";
pub const TEAM_ID_COLUMN: &str = "team_api_id";
pub const PLAYER_ATTRIBUTES_TABLE: &str = "Player_Attributes";
pub const PLAYER_ID_COLUMN: &str = "player_api_id";

/// Opens the historical database snapshot read-only; the pipeline never
/// writes back to it.
pub fn open_db(path: &Path) -> Result<Connection> {
    Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .with_context(|| format!("open sqlite db {}", path.display()))
}

pub fn load_team_attributes(conn: &Connection) -> Result<AttributeTable> {
    load_attribute_table(conn, TEAM_ATTRIBUTES_TABLE, TEAM_ID_COLUMN)
}

pub fn load_player_attributes(conn: &Connection) -> Result<AttributeTable> {
    load_attribute_table(conn, PLAYER_ATTRIBUTES_TABLE, PLAYER_ID_COLUMN)
}

/// Loads one snapshot table with dynamic column discovery: every column
/// that is not the row id, the entity id, the date or a secondary FIFA id
/// becomes an attribute. Row order follows the primary key so the
/// resolver's stable-first tie-break is reproducible across runs.
pub fn load_attribute_table(
    conn: &Connection,
    table: &str,
    id_column: &str,
) -> Result<AttributeTable> {
    let mut stmt = conn
        .prepare(&format!("SELECT * FROM {table} ORDER BY id"))
        .with_context(|| format!("prepare {table} query"))?;
    let column_names: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let id_index = column_names
        .iter()
        .position(|name| name == id_column)
        .with_context(|| format!("{table} has no {id_column} column"))?;
    let date_index = column_names
        .iter()
        .position(|name| name == "date")
        .with_context(|| format!("{table} has no date column"))?;

    let attribute_indexes: Vec<usize> = column_names
        .iter()
        .enumerate()
        .filter(|(index, name)| {
            *index != id_index
                && *index != date_index
                && name.as_str() != "id"
                && !name.ends_with("_fifa_api_id")
        })
        .map(|(index, _)| index)
        .collect();

    let rows = stmt
        .query_map([], |row| {
            let entity_id: Option<i64> = row.get(id_index)?;
            let date: Option<String> = row.get(date_index)?;
            let mut values = HashMap::with_capacity(attribute_indexes.len());
            for &index in &attribute_indexes {
                values.insert(column_names[index].clone(), cell_value(row.get_ref(index)?));
            }
            Ok((entity_id, date, values))
        })
        .with_context(|| format!("query {table}"))?;

    let mut table_out = AttributeTable::default();
    for row in rows {
        let (entity_id, date, values) = row.with_context(|| format!("decode {table} row"))?;
        let Some(entity_id) = entity_id else {
            warn!(table, "dropping snapshot without an entity id");
            continue;
        };
        let Some(date) = date.as_deref().and_then(parse_snapshot_date) else {
            warn!(table, entity_id, "dropping snapshot with unparseable date");
            continue;
        };
        table_out.push(AttributeSnapshot {
            entity_id,
            date,
            values,
        });
    }
    Ok(table_out)
}

pub fn load_matches(conn: &Connection) -> Result<Vec<MatchRecord>> {
    let mut columns = vec![
        "match_api_id".to_string(),
        "date".to_string(),
        "home_team_api_id".to_string(),
        "away_team_api_id".to_string(),
        "home_team_goal".to_string(),
        "away_team_goal".to_string(),
    ];
    columns.extend(slot_columns("home"));
    columns.extend(slot_columns("away"));

    let sql = format!("SELECT {} FROM Match ORDER BY id", columns.join(", "));
    let mut stmt = conn.prepare(&sql).context("prepare Match query")?;

    let rows = stmt
        .query_map([], |row| {
            let match_id: Option<i64> = row.get(0)?;
            let date: Option<String> = row.get(1)?;
            let home_team_id: Option<i64> = row.get(2)?;
            let away_team_id: Option<i64> = row.get(3)?;
            let home_goals: Option<i32> = row.get(4)?;
            let away_goals: Option<i32> = row.get(5)?;
            let home_slots = read_slots(row, 6)?;
            let away_slots = read_slots(row, 6 + 3 * SLOTS_PER_SIDE)?;
            Ok((
                match_id,
                date,
                home_team_id,
                away_team_id,
                home_goals,
                away_goals,
                home_slots,
                away_slots,
            ))
        })
        .context("query Match")?;

    let mut out = Vec::new();
    for row in rows {
        let (match_id, date, home_team_id, away_team_id, home_goals, away_goals, home_slots, away_slots) =
            row.context("decode Match row")?;
        let (Some(match_id), Some(home_team_id), Some(away_team_id)) =
            (match_id, home_team_id, away_team_id)
        else {
            warn!("dropping match row without ids");
            continue;
        };
        let Some(date) = date.as_deref().and_then(parse_snapshot_date) else {
            warn!(match_id, "dropping match with unparseable date");
            continue;
        };
        out.push(MatchRecord {
            match_id,
            date,
            home_team_id,
            away_team_id,
            home_goals,
            away_goals,
            home_slots,
            away_slots,
        });
    }
    Ok(out)
}

fn slot_columns(side: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(3 * SLOTS_PER_SIDE);
    for i in 1..=SLOTS_PER_SIDE {
        out.push(format!("{side}_player_X{i}"));
    }
    for i in 1..=SLOTS_PER_SIDE {
        out.push(format!("{side}_player_Y{i}"));
    }
    for i in 1..=SLOTS_PER_SIDE {
        out.push(format!("{side}_player_{i}"));
    }
    out
}

fn read_slots(
    row: &rusqlite::Row<'_>,
    base: usize,
) -> rusqlite::Result<[SlotRecord; SLOTS_PER_SIDE]> {
    let mut slots = [SlotRecord::default(); SLOTS_PER_SIDE];
    for (i, slot) in slots.iter_mut().enumerate() {
        // Coordinates are numeric affinity in the source; accept either
        // integer or real storage.
        let x: Option<f64> = row.get(base + i)?;
        let y: Option<f64> = row.get(base + SLOTS_PER_SIDE + i)?;
        let player_id: Option<i64> = row.get(base + 2 * SLOTS_PER_SIDE + i)?;
        *slot = SlotRecord {
            x: x.map(|v| v as i32),
            y: y.map(|v| v as i32),
            player_id,
        };
    }
    Ok(slots)
}

fn cell_value(cell: ValueRef<'_>) -> Value {
    match cell {
        ValueRef::Null => Value::Missing,
        ValueRef::Integer(v) => Value::Num(v as f64),
        ValueRef::Real(v) => Value::Num(v),
        ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(_) => Value::Missing,
    }
}

/// Dates in the snapshot are "YYYY-MM-DD HH:MM:SS" or plain "YYYY-MM-DD".
fn parse_snapshot_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.split_whitespace().next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
