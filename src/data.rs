//! Record sources for the demo: a JSON file or the built-in users

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::record::Row;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("could not read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain a JSON array of objects", .path.display())]
    NotAnArray { path: PathBuf },
    #[error("{}: element {index} is not an object", .path.display())]
    NotAnObject { path: PathBuf, index: usize },
}

/// Load a JSON array of objects
pub fn load_records(path: &Path) -> Result<Vec<Row>, DataError> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| DataError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(DataError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            _ => Err(DataError::NotAnObject {
                path: path.to_path_buf(),
                index,
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

pub fn sample_records() -> Vec<Row> {
    [
        json!({"id": 1, "name": "Alice Johnson", "email": "alice@example.com"}),
        json!({"id": 2, "name": "Bob Smith", "email": "bob@example.com"}),
        json!({"id": 3, "name": "Carol White", "email": "carol@example.com"}),
    ]
    .into_iter()
    .filter_map(|v| match v {
        Value::Object(map) => Some(map),
        _ => None,
    })
    .collect()
}
