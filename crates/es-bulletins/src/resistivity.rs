//! Electrical resistivity bulletin processor
//!
//! Payload shape: [`ResistivityPayload`].

use bytes::Bytes;

use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::bulletin::{Bulletin, CreateBulletinRequest, ResistivityPayload};
use es_models::project::Project;

use crate::processor::{assemble_bulletin, parse_payload, BulletinProcessor};

pub struct ResistivityProcessor;

impl BulletinProcessor for ResistivityProcessor {
    fn type_tag(&self) -> &'static str {
        "RESISTIVITY"
    }

    fn build(&self, request: &CreateBulletinRequest, author_id: Id) -> EsResult<Bulletin> {
        let payload: ResistivityPayload = parse_payload(self.type_tag(), &request.data)?;

        if let Some(spacing) = payload.spacing {
            if spacing <= 0.0 {
                let mut errors = es_core::error::ValidationErrors::new();
                errors.add("spacing", "must be positive");
                return Err(errors.into());
            }
        }

        let normalized = serde_json::to_value(&payload)
            .map_err(|e| es_core::error::EsError::Internal(e.to_string()))?;
        Ok(assemble_bulletin(self.type_tag(), request, author_id, normalized))
    }

    fn render(&self, bulletin: &Bulletin, project: &Project) -> EsResult<Bytes> {
        let payload: ResistivityPayload = parse_payload(self.type_tag(), &bulletin.payload)?;

        let mut report = String::new();
        report.push_str("BOLETIM DE RESISTIVIDADE ELETRICA\n");
        report.push_str("=================================\n\n");
        report.push_str(&format!("Projeto: {}\n", project.name));
        if let Some(client) = &project.client_name {
            report.push_str(&format!("Cliente: {}\n", client));
        }
        report.push_str(&format!(
            "Executado em: {}\n\n",
            bulletin.executed_at.format("%Y-%m-%d")
        ));

        if let Some(model) = &payload.equipment_model {
            report.push_str(&format!("Equipamento: {}\n", model));
        }
        if let Some(method) = &payload.method {
            report.push_str(&format!("Arranjo: {}\n", method));
        }
        if let Some(spacing) = payload.spacing {
            report.push_str(&format!("Espacamento: {:.2} m\n", spacing));
        }
        if let Some(value) = payload.resistance_value {
            report.push_str(&format!("Resistividade: {:.2} ohm.m\n", value));
        }

        Ok(Bytes::from(report))
    }
}
