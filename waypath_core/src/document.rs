// waypath_core/src/document.rs

//! The export/import document: waypoints, config, the computed path and its
//! metrics, bundled with a little metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{DocumentError, PlanningError};
use crate::planning::{PathPlanner, PlannedPath};
use crate::types::{Metrics, PathPoint, Waypoint};

pub const DOCUMENT_VERSION: &str = "1.0";
pub const DOCUMENT_TYPE: &str = "waypath-document";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub created: DateTime<Utc>,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathDocument {
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    #[serde(default)]
    pub path: Vec<PathPoint>,
    pub config: PlannerConfig,
    #[serde(default)]
    pub metrics: Option<Metrics>,
    /// Event zones and command markers. Opaque here; carried through as-is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<serde_json::Value>,
    pub metadata: DocumentMetadata,
}

impl PathDocument {
    /// Bundles a planning run for export, stamped with the current time.
    pub fn new(name: &str, waypoints: &[Waypoint], config: &PlannerConfig, planned: &PlannedPath) -> Self {
        Self {
            name: name.to_string(),
            waypoints: waypoints.to_vec(),
            path: planned.points.clone(),
            config: *config,
            metrics: planned.metrics,
            events: Vec::new(),
            metadata: DocumentMetadata {
                created: Utc::now(),
                version: DOCUMENT_VERSION.to_string(),
                kind: DOCUMENT_TYPE.to_string(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates an exported document. Never partially applies:
    /// the caller either gets a complete document or an error.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let document: PathDocument = serde_json::from_str(text)
            .map_err(|e| DocumentError::MalformedImport(e.to_string()))?;
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), DocumentError> {
        if self.metadata.kind != DOCUMENT_TYPE {
            return Err(DocumentError::MalformedImport(format!(
                "unexpected document type '{}', expected '{}'",
                self.metadata.kind, DOCUMENT_TYPE
            )));
        }

        let major = self.metadata.version.split('.').next().unwrap_or_default();
        let supported = DOCUMENT_VERSION.split('.').next().unwrap_or_default();
        if major != supported {
            return Err(DocumentError::MalformedImport(format!(
                "unsupported document version '{}'",
                self.metadata.version
            )));
        }

        for (i, wp) in self.waypoints.iter().enumerate() {
            wp.validate().map_err(|reason| {
                DocumentError::MalformedImport(format!("waypoint {}: {}", i, reason))
            })?;
        }
        Ok(())
    }

    /// Re-runs the planner on the stored waypoints and config.
    pub fn replan(&self) -> Result<PlannedPath, PlanningError> {
        PathPlanner::new(self.config).plan(&self.waypoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> PathDocument {
        let waypoints = vec![Waypoint::new(0.0, 0.0), Waypoint::new(2.0, 1.0).with_heading(45.0)];
        let config = PlannerConfig::default();
        let planned = PathPlanner::new(config).plan(&waypoints).unwrap();
        PathDocument::new("sample", &waypoints, &config, &planned)
    }

    #[test]
    fn test_json_uses_expected_keys() {
        let json = sample_document().to_json().unwrap();
        assert!(json.contains("\"type\": \"waypath-document\""));
        assert!(json.contains("\"stopAtWaypoint\""));
        assert!(json.contains("\"totalDistance\""));
        assert!(json.contains("\"path_resolution\""));
    }

    #[test]
    fn test_rejects_garbage() {
        let err = PathDocument::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DocumentError::MalformedImport(_)));
    }

    #[test]
    fn test_rejects_wrong_type_tag() {
        let mut doc = sample_document();
        doc.metadata.kind = "something-else".to_string();
        let json = doc.to_json().unwrap();
        assert!(matches!(PathDocument::from_json(&json), Err(DocumentError::MalformedImport(_))));
    }

    #[test]
    fn test_rejects_future_major_version() {
        let mut doc = sample_document();
        doc.metadata.version = "2.0".to_string();
        let json = doc.to_json().unwrap();
        assert!(PathDocument::from_json(&json).is_err());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let mut doc = sample_document();
        doc.waypoints[0].radius = 0.0;
        let json = doc.to_json().unwrap();
        assert!(PathDocument::from_json(&json).is_err());
    }

    #[test]
    fn test_opaque_events_survive() {
        let mut doc = sample_document();
        doc.events.push(serde_json::json!({ "kind": "beep", "params": { "volume": 3 } }));
        let back = PathDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back.events, doc.events);
    }
}
