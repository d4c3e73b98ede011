//! Backup file export and import.

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use serde::Serialize;
use serde_json::Value;

use crate::dashboard::error::DashboardError;
use crate::models::{ColorMeanings, Tile};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    tiles: &'a [Tile],
    color_meanings: &'a ColorMeanings,
}

/// Pretty-printed `{tiles, colorMeanings}` document.
pub fn export_document(tiles: &[Tile], meanings: &ColorMeanings) -> Result<String, DashboardError> {
    serde_json::to_string_pretty(&ExportDocument {
        tiles,
        color_meanings: meanings,
    })
    .map_err(|e| DashboardError::Validation(format!("Could not serialise backup: {e}")))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("navigation-backup-{}.json", date.format("%Y-%m-%d"))
}

/// File name for a backup taken now, dated in UTC.
pub fn export_file_name_today() -> String {
    export_file_name(Utc::now().date_naive())
}

/// What an import file asks to replace. Each part is applied on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    pub tiles: Option<Vec<Tile>>,
    pub color_meanings: Option<ColorMeanings>,
}

/// Validates a backup document as a whole. Nothing is applied unless every
/// recognised field present is well-formed.
pub fn parse_import(raw: &str) -> Result<ImportPlan, DashboardError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| DashboardError::Validation(format!("Import failed: file is not valid JSON ({e})")))?;
    let Value::Object(mut fields) = document else {
        return Err(DashboardError::Validation("Unrecognised backup file format".to_string()));
    };

    let tiles = match fields.remove("tiles") {
        None | Some(Value::Null) => None,
        Some(value @ Value::Array(_)) => Some(
            serde_json::from_value::<Vec<Tile>>(value)
                .map_err(|e| DashboardError::Validation(format!("Invalid tiles in backup: {e}")))?,
        ),
        Some(_) => {
            return Err(DashboardError::Validation("Backup field `tiles` must be an array".to_string()));
        }
    };

    if let Some(tiles) = &tiles {
        let mut seen = HashSet::new();
        if let Some(dup) = tiles.iter().find(|t| !seen.insert(t.id.as_str())) {
            return Err(DashboardError::Validation(format!(
                "Backup contains tile id `{}` more than once",
                dup.id
            )));
        }
    }

    let color_meanings = match fields.remove("colorMeanings") {
        None | Some(Value::Null) => None,
        Some(value @ Value::Object(_)) => Some(
            serde_json::from_value::<ColorMeanings>(value)
                .map_err(|e| DashboardError::Validation(format!("Invalid color meanings in backup: {e}")))?,
        ),
        Some(_) => {
            return Err(DashboardError::Validation(
                "Backup field `colorMeanings` must be an object".to_string(),
            ));
        }
    };

    if tiles.is_none() && color_meanings.is_none() {
        return Err(DashboardError::Validation(
            "Unrecognised backup file format: expected `tiles` or `colorMeanings`".to_string(),
        ));
    }
    Ok(ImportPlan { tiles, color_meanings })
}
