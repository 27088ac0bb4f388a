//! Column schemas for the static reference tables.
//!
//! Headers are normalized (trimmed, lowercased) and checked against the
//! required column list once, before any row is parsed. Loading fails fast
//! when a required column is absent; alternate column names are not
//! accepted.

use std::collections::HashMap;
use std::path::Path;

use csv::StringRecord;

use crate::error::DataError;

// ---

/// Expected columns of one CSV table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

pub const CROP_PROFILES: TableSchema = TableSchema {
    required: &[
        "crop",
        "ph_min",
        "ph_max",
        "water_need",
        "climate_zone",
        "season",
        "base_yield",
        "carbon_footprint",
    ],
    optional: &[
        "fertilizer",
        "sowing_months",
        "crop_hi",
        "crop_ta",
        "crop_te",
        "crop_ml",
    ],
};

pub const MARKET_PRICES: TableSchema = TableSchema {
    required: &["crop", "base_price"],
    optional: &[],
};

/// Normalized column positions of a validated header row.
#[derive(Debug, Clone)]
pub struct Columns {
    index: HashMap<String, usize>,
}

/// Normalize a header cell: surrounding whitespace removed, lowercased.
pub fn normalize_header(name: &str) -> String {
    name.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}

impl Columns {
    /// Validate `headers` against `schema`, reporting every missing column.
    pub fn validate(
        headers: &StringRecord,
        schema: &TableSchema,
        path: &Path,
    ) -> Result<Self, DataError> {
        // ---
        let mut index = HashMap::new();
        for (pos, name) in headers.iter().enumerate() {
            // First occurrence wins on duplicate headers
            index.entry(normalize_header(name)).or_insert(pos);
        }

        let missing: Vec<String> = schema
            .required
            .iter()
            .filter(|c| !index.contains_key(**c))
            .map(|c| c.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(DataError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }

        for column in schema.optional {
            if !index.contains_key(*column) {
                tracing::debug!("{}: optional column '{}' absent", path.display(), column);
            }
        }

        Ok(Self { index })
    }

    /// Trimmed cell for `column`, or `None` if the column is absent.
    pub fn get<'r>(&self, record: &'r StringRecord, column: &str) -> Option<&'r str> {
        self.index
            .get(column)
            .and_then(|pos| record.get(*pos))
            .map(str::trim)
    }

    /// Like [`Columns::get`], treating blank cells as absent.
    pub fn get_non_empty(&self, record: &StringRecord, column: &str) -> Option<String> {
        self.get(record, column)
            .filter(|v| !v.is_empty())
            .map(String::from)
    }
}
