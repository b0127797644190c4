// Reference-data providers: every source of resort data hands the scanner the same
// ordered list of resorts, whether it comes from the store file, compiled-in data
// or a stub.

use crate::resort::{Resort, RoomType};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BUCKET: &str = "2021";

// Any failure here is fatal for the run: there is nothing to scan without resorts
#[derive(Error, Debug)]
pub enum ReferenceDataError {
    #[error("Failed to read store {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Store is not a valid bucket map: {0}")]
    InvalidStore(#[source] serde_json::Error),

    #[error("Bucket {0} not found in store")]
    MissingBucket(String),

    #[error("Failed to parse resort {key}: {source}")]
    InvalidResort {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid embedded chart: {0}")]
    InvalidEmbeddedData(String),
}

pub trait ReferenceDataProvider: Send + Sync {
    fn load_resorts(&self) -> Result<Vec<Resort>, ReferenceDataError>;
}

/// Reads resorts from a JSON key-value store file.
///
/// The file maps bucket names to buckets, and each bucket maps a record key to one
/// serialized [`Resort`]. Resorts come back in ascending key order.
#[derive(Debug, Clone)]
pub struct FileStoreProvider {
    path: PathBuf,
    bucket: String,
}

impl FileStoreProvider {
    pub fn new(path: impl Into<PathBuf>, bucket: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bucket: bucket.into(),
        }
    }
}

impl ReferenceDataProvider for FileStoreProvider {
    fn load_resorts(&self) -> Result<Vec<Resort>, ReferenceDataError> {
        let contents =
            std::fs::read_to_string(&self.path).map_err(|source| ReferenceDataError::Io {
                path: self.path.clone(),
                source,
            })?;

        let resorts = parse_store(&contents, &self.bucket)?;
        tracing::debug!(
            path = %self.path.display(),
            bucket = %self.bucket,
            resorts = resorts.len(),
            "Loaded resorts from store"
        );
        Ok(resorts)
    }
}

// Decode one bucket of a store document, keeping the key of any record that fails
pub fn parse_store(contents: &str, bucket: &str) -> Result<Vec<Resort>, ReferenceDataError> {
    let mut buckets: BTreeMap<String, BTreeMap<String, Value>> =
        serde_json::from_str(contents).map_err(ReferenceDataError::InvalidStore)?;

    let records = buckets
        .remove(bucket)
        .ok_or_else(|| ReferenceDataError::MissingBucket(bucket.to_string()))?;

    records
        .into_iter()
        .map(|(key, value)| {
            serde_json::from_value::<Resort>(value)
                .map_err(|source| ReferenceDataError::InvalidResort { key, source })
        })
        .collect()
}

// Fixed resorts and room types without point charts, for runs driven by a synthetic
// point source
#[derive(Debug, Default, Clone, Copy)]
pub struct StubProvider;

impl ReferenceDataProvider for StubProvider {
    fn load_resorts(&self) -> Result<Vec<Resort>, ReferenceDataError> {
        let room = |name: &str, description: &str, view_type: &str| RoomType {
            name: name.to_string(),
            description: description.to_string(),
            view_type: view_type.to_string(),
            point_chart: Vec::new(),
        };

        Ok(vec![
            Resort {
                name: "Bay Lake Tower".to_string(),
                room_types: vec![
                    room("Deluxe Studio", "Sleeps up to 4", "Standard View"),
                    room("One-Bedroom Villa", "Sleeps up to 5", "Lake View"),
                ],
            },
            Resort {
                name: "Old Key West".to_string(),
                room_types: vec![room("Deluxe Studio", "Sleeps up to 4", "Standard View")],
            },
        ])
    }
}
