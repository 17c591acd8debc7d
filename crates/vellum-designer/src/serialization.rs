//! Serialization and deserialization for document snapshots.
//!
//! A snapshot is the persisted form of a document: its strokes, background
//! settings and the font sources its text needs. Selection, sessions and
//! history are never persisted.

use crate::model::Stroke;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use vellum_core::constants::SNAPSHOT_VERSION;
use vellum_core::DocumentError;

/// Where a font referenced by the document can be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSourceKind {
    /// Remote font service URL
    Google,
    /// Inline `data:` URL
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedFont {
    pub kind: FontSourceKind,
    pub url: String,
}

impl EmbeddedFont {
    /// Classify `url` by its scheme.
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let kind = if url.starts_with("data:") {
            FontSourceKind::Data
        } else {
            FontSourceKind::Google
        };
        Self { kind, url }
    }
}

/// Snapshot metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: "Untitled".to_string(),
            created: now,
            modified: now,
        }
    }
}

/// Persisted document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub version: u32,
    pub strokes: Vec<Stroke>,
    /// Background color
    pub bg: String,
    #[serde(rename = "transparentBG")]
    pub transparent_bg: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub embedded_fonts: BTreeMap<String, EmbeddedFont>,
    #[serde(default)]
    pub metadata: SnapshotMetadata,
}

impl DocumentSnapshot {
    pub fn new(strokes: Vec<Stroke>, bg: impl Into<String>, transparent_bg: bool) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            strokes,
            bg: bg.into(),
            transparent_bg,
            embedded_fonts: BTreeMap::new(),
            metadata: SnapshotMetadata::default(),
        }
    }

    /// Families used by text strokes, sorted and without duplicates.
    pub fn referenced_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .strokes
            .iter()
            .filter_map(Stroke::as_text)
            .map(|t| t.font_family.clone())
            .collect();
        families.sort();
        families.dedup();
        families
    }

    /// Check the version, that stroke ids are unique and that every
    /// stroke has usable geometry.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(DocumentError::UnsupportedVersion {
                version: self.version,
            });
        }
        let mut seen = HashSet::new();
        for stroke in &self.strokes {
            if !seen.insert(stroke.id()) {
                return Err(DocumentError::DuplicateId {
                    id: stroke.id().to_string(),
                });
            }
            stroke.check_geometry()?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(|e| DocumentError::Format {
            reason: e.to_string(),
        })
    }

    /// Parse and validate a snapshot.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let snapshot: Self = serde_json::from_str(json).map_err(|e| DocumentError::Format {
            reason: e.to_string(),
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Save snapshot to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = self.clone();
        out.metadata.modified = Utc::now();
        let json = out.to_json().context("Failed to serialize document")?;
        std::fs::write(path.as_ref(), json).context("Failed to write document file")?;
        tracing::info!("Saved document to {}", path.as_ref().display());
        Ok(())
    }

    /// Load snapshot from file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read document file")?;
        let snapshot = Self::from_json(&content).context("Failed to parse document file")?;
        tracing::info!(
            "Loaded {} stroke(s) from {}",
            snapshot.strokes.len(),
            path.as_ref().display()
        );
        Ok(snapshot)
    }
}
