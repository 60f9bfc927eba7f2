//! Task document loading.
//!
//! A task document is the JSON form of what a host hands the chart on
//! every update:
//!
//! ```json
//! {
//!   "tasks": [{ "id": "1", "group": "Phase A", "start": "2024-01-01", "end": "2024-01-10" }],
//!   "additionalColumns": [{ "key": "cost", "displayName": "Cost" }],
//!   "labelDisplayName": "Note",
//!   "labelParentName": "Phase"
//! }
//! ```

use ganttline_core::{AdditionalColumn, LegendPalette, Task};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a task document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid task document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parsed task document
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub additional_columns: Vec<AdditionalColumn>,
    #[serde(default)]
    pub label_display_name: Option<String>,
    #[serde(default)]
    pub label_parent_name: Option<String>,
    #[serde(default)]
    pub label_item_name: Option<String>,
}

impl TaskDocument {
    /// Parse a document and fill in missing bar colours
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        let mut document: Self = serde_json::from_str(source)?;
        LegendPalette::new().assign(&mut document.tasks);
        Ok(document)
    }
}

/// Read and parse a task document from disk
pub fn load(path: &Path) -> Result<TaskDocument, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = TaskDocument::from_json(&source).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        tasks = document.tasks.len(),
        columns = document.additional_columns.len(),
        "loaded task document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ganttline_core::{DEFAULT_COLOR, PALETTE};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_document_and_assigns_colours() {
        let json = r##"{
            "tasks": [
                { "id": "1", "group": "A", "legendValue": "Ops", "start": "2024-01-01", "end": "2024-01-05" },
                { "id": "2", "group": "A", "legendValue": "Dev", "color": "#123456" },
                { "id": "3", "group": "B", "legendValue": "Ops" },
                { "id": "4", "group": "B" }
            ],
            "additionalColumns": [{ "key": "cost", "displayName": "Cost", "format": "0.00" }],
            "labelParentName": "Phase"
        }"##;
        let document = TaskDocument::from_json(json).unwrap();

        assert_eq!(document.tasks.len(), 4);
        assert_eq!(document.tasks[0].color, PALETTE[0]);
        assert_eq!(document.tasks[1].color, "#123456");
        assert_eq!(document.tasks[2].color, PALETTE[0]);
        assert_eq!(document.tasks[3].color, DEFAULT_COLOR);
        assert_eq!(document.additional_columns[0].format.as_deref(), Some("0.00"));
        assert_eq!(document.label_parent_name.as_deref(), Some("Phase"));
        assert_eq!(document.label_display_name, None);
    }

    #[test]
    fn missing_tasks_is_an_error() {
        assert!(TaskDocument::from_json(r#"{ "additionalColumns": [] }"#).is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load(Path::new("/nonexistent/tasks.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tasks.json"));
    }
}
