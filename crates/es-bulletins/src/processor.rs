//! Bulletin processor trait
//!
//! One processor per bulletin kind. The orchestrator never inspects
//! type-specific fields; it resolves a processor by tag and delegates
//! building and rendering to it.

use bytes::Bytes;
use chrono::Utc;

use es_core::error::EsError;
use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::bulletin::{Bulletin, CreateBulletinRequest};
use es_models::project::Project;

/// Capability interface for one bulletin kind.
///
/// Implementations own the payload shape for their tag: `build` parses and
/// normalizes the incoming `data`, `render` produces the report document.
pub trait BulletinProcessor: Send + Sync {
    /// Canonical tag, uppercase (e.g. "SPT").
    fn type_tag(&self) -> &'static str;

    /// Tag match is case-insensitive.
    fn supports(&self, tag: &str) -> bool {
        tag.eq_ignore_ascii_case(self.type_tag())
    }

    /// Validate the request payload and assemble the bulletin record.
    fn build(&self, request: &CreateBulletinRequest, author_id: Id) -> EsResult<Bulletin>;

    /// Render the report document for a previously built bulletin.
    fn render(&self, bulletin: &Bulletin, project: &Project) -> EsResult<Bytes>;

    /// Filename for the rendered document.
    fn document_filename(&self, bulletin: &Bulletin) -> String {
        let id = bulletin.id.unwrap_or(0);
        format!("{}-{}.txt", self.type_tag().to_lowercase(), id)
    }
}

/// Shared scaffolding for `build`: carries over executed_at (defaulting to
/// now) and normalizes the type tag through [`Bulletin::new`].
pub(crate) fn assemble_bulletin(
    processor_tag: &str,
    request: &CreateBulletinRequest,
    author_id: Id,
    normalized_payload: serde_json::Value,
) -> Bulletin {
    let mut bulletin = Bulletin::new(request.project_id, author_id, processor_tag, normalized_payload);
    bulletin.executed_at = request.executed_at.unwrap_or_else(Utc::now);
    bulletin
}

/// Shared payload parsing: a malformed `data` object is a validation error,
/// not an internal one.
pub(crate) fn parse_payload<T: serde::de::DeserializeOwned>(
    tag: &str,
    data: &serde_json::Value,
) -> EsResult<T> {
    serde_json::from_value(data.clone()).map_err(|e| {
        let mut errors = es_core::error::ValidationErrors::new();
        errors.add("data", format!("invalid {} payload: {}", tag, e));
        EsError::Validation(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Dummy;

    impl BulletinProcessor for Dummy {
        fn type_tag(&self) -> &'static str {
            "DUMMY"
        }

        fn build(&self, request: &CreateBulletinRequest, author_id: Id) -> EsResult<Bulletin> {
            Ok(assemble_bulletin(self.type_tag(), request, author_id, json!({})))
        }

        fn render(&self, _bulletin: &Bulletin, _project: &Project) -> EsResult<Bytes> {
            Ok(Bytes::from_static(b"dummy"))
        }
    }

    #[test]
    fn test_supports_is_case_insensitive() {
        let p = Dummy;
        assert!(p.supports("dummy"));
        assert!(p.supports("Dummy"));
        assert!(p.supports("DUMMY"));
        assert!(!p.supports("OTHER"));
    }

    #[test]
    fn test_assemble_keeps_requested_execution_time() {
        let executed = chrono::Utc::now() - chrono::Duration::days(3);
        let request = CreateBulletinRequest {
            type_tag: "dummy".into(),
            project_id: 1,
            executed_at: Some(executed),
            data: json!({}),
        };

        let bulletin = Dummy.build(&request, 7).unwrap();
        assert_eq!(bulletin.executed_at, executed);
        assert_eq!(bulletin.bulletin_type(), "DUMMY");
        assert_eq!(bulletin.author_id, 7);
    }
}
