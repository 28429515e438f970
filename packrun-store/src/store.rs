// Packrun Store - SQLite retrieval layer
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! SQLite read path.
//!
//! Each signal lives in its own table with `timestamp`, `value` and
//! `line_id` columns. Reads are filtered per line and ordered in SQL; the
//! pipeline still sorts defensively on its side. Value coercion never
//! fails: a non-numeric value becomes a missing marker and is handled
//! downstream. An unparseable timestamp is a retrieval error, since the
//! reading cannot be placed in time.

use chrono::{DateTime, NaiveDateTime};
use packrun::{LineSignals, Observation};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Default database filename used by the plant historian.
pub const DEFAULT_DB_FILE: &str = "plant_data.db";

/// Table names for the three signal kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub state_table: String,
    pub counter_table: String,
    pub weight_table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            state_table: "plant_state_data".to_string(),
            counter_table: "plant_counter_data".to_string(),
            weight_table: "plant_weight_data".to_string(),
        }
    }
}

/// Read-only handle on the plant database.
pub struct PlantStore {
    conn: Connection,
    config: StoreConfig,
}

impl PlantStore {
    /// Open a database file with the default table names.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open a database file with explicit table names.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        Ok(Self {
            conn: Connection::open(path)?,
            config,
        })
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            config: StoreConfig::default(),
        })
    }

    /// Table names in use.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Distinct line identifiers present in the state table.
    pub fn line_ids(&self) -> Result<Vec<String>> {
        let sql = format!(
            "SELECT DISTINCT line_id FROM {} ORDER BY line_id",
            self.config.state_table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let ids = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Materialize one line's three signals as an immutable snapshot.
    pub fn load_line(&self, line_id: &str) -> Result<LineSignals> {
        let mut signals = LineSignals::new(line_id);
        signals.state = self.load_signal(&self.config.state_table, line_id)?;
        signals.counter = self.load_signal(&self.config.counter_table, line_id)?;
        signals.weight = self.load_signal(&self.config.weight_table, line_id)?;

        log::debug!(
            "line {}: {} state / {} counter / {} weight readings",
            line_id,
            signals.state.len(),
            signals.counter.len(),
            signals.weight.len()
        );
        Ok(signals)
    }

    fn load_signal(&self, table: &str, line_id: &str) -> Result<Vec<Observation>> {
        let sql = format!(
            "SELECT timestamp, value FROM {table} WHERE line_id = ?1 ORDER BY timestamp"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([line_id])?;

        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let ts_ref = row.get_ref(0)?;
            let Some(timestamp_ms) = coerce_timestamp(ts_ref) else {
                return Err(StoreError::InvalidTimestamp {
                    table: table.to_string(),
                    raw: describe_value(ts_ref),
                });
            };
            let value = coerce_value(row.get_ref(1)?);
            out.push(Observation {
                timestamp_ms,
                value,
            });
        }
        Ok(out)
    }
}

/// Coerce a stored timestamp into epoch milliseconds.
///
/// INTEGER columns are taken as epoch milliseconds, REAL as epoch seconds,
/// TEXT is parsed as the historian's `YYYY-MM-DD HH:MM:SS[.fff]` form or
/// RFC 3339.
fn coerce_timestamp(value: ValueRef<'_>) -> Option<u64> {
    match value {
        ValueRef::Integer(ms) => u64::try_from(ms).ok(),
        ValueRef::Real(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Some((seconds * 1000.0) as u64)
        }
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).ok()?;
            parse_timestamp_text(text.trim())
        }
        _ => None,
    }
}

fn parse_timestamp_text(text: &str) -> Option<u64> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return u64::try_from(naive.and_utc().timestamp_millis()).ok();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return u64::try_from(parsed.timestamp_millis()).ok();
    }
    None
}

/// Coerce a stored value into `f64`, mapping anything unusable to the
/// missing marker.
fn coerce_value(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(v) => Some(v as f64),
        ValueRef::Real(v) if v.is_finite() => Some(v),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .ok()?
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        _ => None,
    }
}

fn describe_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} byte blob>", bytes.len()),
    }
}
