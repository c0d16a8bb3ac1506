//! Technical bulletin model
//!
//! Table: bulletins
//!
//! The original domain modeled one subtype per bulletin kind. Here a bulletin
//! is a single record carrying a type tag plus a typed JSON payload; only the
//! processor registered for that tag (in `es-bulletins`) knows how to build
//! and render it. Adding a kind means adding a payload struct and registering
//! a processor — this crate and the orchestrator stay untouched.

use chrono::{DateTime, Utc};
use es_core::traits::{Activatable, Entity, Id, Identifiable, ProjectScoped, Timestamped};
use serde::{Deserialize, Serialize};

/// A technical field report tied to a project and an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bulletin {
    pub id: Option<Id>,

    /// Owning project
    pub project_id: Id,

    /// Authoring user
    pub author_id: Id,

    /// Type tag reported by the processor that built this bulletin
    /// (e.g. "SPT", "RESISTIVITY"). Stored uppercase.
    pub bulletin_type: String,

    /// Type-specific fields, shaped by the payload struct for the tag
    pub payload: serde_json::Value,

    /// When the field work was executed
    pub executed_at: DateTime<Utc>,

    /// Storage path of the generated document; empty until first render
    pub document_path: Option<String>,

    pub active: bool,

    pub created_at: Option<DateTime<Utc>>,
}

impl Bulletin {
    pub fn new(
        project_id: Id,
        author_id: Id,
        bulletin_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: None,
            project_id,
            author_id,
            bulletin_type: bulletin_type.into().to_uppercase(),
            payload,
            executed_at: Utc::now(),
            document_path: None,
            active: true,
            created_at: None,
        }
    }

    /// The type tag this bulletin reports.
    pub fn bulletin_type(&self) -> &str {
        &self.bulletin_type
    }

    pub fn has_document(&self) -> bool {
        self.document_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

impl Identifiable for Bulletin {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl Timestamped for Bulletin {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Activatable for Bulletin {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl ProjectScoped for Bulletin {
    fn project_id(&self) -> Id {
        self.project_id
    }
}

impl Entity for Bulletin {
    const TABLE_NAME: &'static str = "bulletins";
    const TYPE_NAME: &'static str = "Bulletin";
}

/// Incoming request to create a bulletin of some type.
///
/// `data` is handed as-is to the resolved processor; the core never inspects
/// type-specific fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBulletinRequest {
    /// Requested bulletin type, matched case-insensitively
    #[serde(rename = "type")]
    pub type_tag: String,

    pub project_id: Id,

    pub executed_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub data: serde_json::Value,
}

/// SPT (standard penetration test) bulletin fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SptPayload {
    pub initial_depth: Option<f64>,
    pub final_depth: Option<f64>,
    pub blows_first_30cm: Option<i32>,
    pub blows_last_30cm: Option<i32>,
    pub soil_classification: Option<String>,
}

/// Electrical resistivity bulletin fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResistivityPayload {
    pub equipment_model: Option<String>,
    /// Electrode arrangement, e.g. Wenner or Schlumberger
    pub method: Option<String>,
    pub spacing: Option<f64>,
    pub resistance_value: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_type_tag_normalized_uppercase() {
        let bulletin = Bulletin::new(1, 2, "spt", json!({}));
        assert_eq!(bulletin.bulletin_type(), "SPT");
    }

    #[test]
    fn test_document_presence() {
        let mut bulletin = Bulletin::new(1, 2, "SPT", json!({}));
        assert!(!bulletin.has_document());

        bulletin.document_path = Some(String::new());
        assert!(!bulletin.has_document());

        bulletin.document_path = Some("bulletins/1/spt-1.txt".into());
        assert!(bulletin.has_document());
    }

    #[test]
    fn test_spt_payload_parse() {
        let payload: SptPayload = serde_json::from_value(json!({
            "initialDepth": 0.0,
            "finalDepth": 12.5,
            "blowsFirst30cm": 8,
            "blowsLast30cm": 15,
            "soilClassification": "Argila siltosa"
        }))
        .unwrap();

        assert_eq!(payload.final_depth, Some(12.5));
        assert_eq!(payload.soil_classification.as_deref(), Some("Argila siltosa"));
    }

    #[test]
    fn test_request_type_field_alias() {
        let request: CreateBulletinRequest = serde_json::from_value(json!({
            "type": "spt",
            "projectId": 4,
            "data": { "soilClassification": "Areia fina" }
        }))
        .unwrap();

        assert_eq!(request.type_tag, "spt");
        assert_eq!(request.project_id, 4);
    }
}
