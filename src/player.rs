use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::FeatureError;
use crate::table::{AttributeTable, Value};
use crate::temporal::latest_before;

/// A rostered player. Construction and attribute resolution are separate
/// steps: the roster extractor builds unresolved players, and `resolve`
/// caches the time-appropriate snapshot as a flat name -> value map.
#[derive(Debug, Clone)]
pub struct Player {
    id: i64,
    attributes: Option<HashMap<String, Value>>,
}

impl Player {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_resolved(&self) -> bool {
        self.attributes.is_some()
    }

    /// Caches the latest snapshot strictly before `as_of`. A player with no
    /// prior snapshot resolves to an empty map, so later lookups read
    /// `Missing` instead of failing the match.
    pub fn resolve(&mut self, as_of: NaiveDate, table: &AttributeTable) {
        let rows = table.rows_for(self.id);
        let attributes = match latest_before(&rows, as_of) {
            Some(snapshot) => snapshot.values.clone(),
            None => HashMap::new(),
        };
        self.attributes = Some(attributes);
    }

    pub fn attribute(&self, name: &str) -> Result<Value, FeatureError> {
        let attributes = self
            .attributes
            .as_ref()
            .ok_or(FeatureError::PlayerNotResolved(self.id))?;
        Ok(attributes.get(name).cloned().unwrap_or(Value::Missing))
    }
}
