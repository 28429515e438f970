// Packrun Store - SQLite retrieval layer
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the retrieval layer

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Main error type for store operations
///
/// A retrieval error aborts the affected line only; it must never be
/// mistaken for "no runs on this line".
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying SQLite failure
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored timestamp parsed under no supported form, so the reading
    /// cannot be placed in time
    #[error("Unparseable timestamp {raw:?} in table {table}")]
    InvalidTimestamp { table: String, raw: String },
}
