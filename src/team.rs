use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::FeatureError;
use crate::table::{AttributeSnapshot, AttributeTable, Value};
use crate::temporal::latest_before;

/// One team's resolved attribute row, always keyed by the team id so callers
/// can join it even when every value is missing.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamEntry {
    pub team_id: i64,
    pub values: BTreeMap<String, Value>,
}

/// A team and the borrowed slice of its historical attribute rows. `load`
/// must run before `latest_entry`; the entries stay views into the shared
/// table, never copies.
#[derive(Debug, Clone)]
pub struct Team<'a> {
    id: i64,
    entries: Option<Vec<&'a AttributeSnapshot>>,
}

impl<'a> Team<'a> {
    pub fn new(id: i64) -> Self {
        Self { id, entries: None }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn load(&mut self, table: &'a AttributeTable) {
        self.entries = Some(table.rows_for(self.id));
    }

    /// Latest snapshot strictly before `as_of`, restricted to `columns`.
    /// With no prior snapshot every requested column comes back `Missing`.
    pub fn latest_entry(
        &self,
        as_of: NaiveDate,
        columns: &[&str],
    ) -> Result<TeamEntry, FeatureError> {
        let entries = self
            .entries
            .as_deref()
            .ok_or(FeatureError::TeamNotLoaded(self.id))?;
        let snapshot = latest_before(entries, as_of);

        let mut values = BTreeMap::new();
        for &column in columns {
            let value = match snapshot {
                Some(snap) => snap.value(column),
                None => Value::Missing,
            };
            values.insert(column.to_string(), value);
        }
        Ok(TeamEntry {
            team_id: self.id,
            values,
        })
    }
}
