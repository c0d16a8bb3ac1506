//! SPT bulletin processor
//!
//! Standard penetration test reports. Payload shape: [`SptPayload`].

use bytes::Bytes;

use es_core::result::EsResult;
use es_core::traits::Id;
use es_models::bulletin::{Bulletin, CreateBulletinRequest, SptPayload};
use es_models::project::Project;

use crate::processor::{assemble_bulletin, parse_payload, BulletinProcessor};

pub struct SptProcessor;

impl BulletinProcessor for SptProcessor {
    fn type_tag(&self) -> &'static str {
        "SPT"
    }

    fn build(&self, request: &CreateBulletinRequest, author_id: Id) -> EsResult<Bulletin> {
        let payload: SptPayload = parse_payload(self.type_tag(), &request.data)?;

        if let (Some(initial), Some(final_depth)) = (payload.initial_depth, payload.final_depth) {
            if final_depth < initial {
                let mut errors = es_core::error::ValidationErrors::new();
                errors.add("finalDepth", "must not be shallower than the initial depth");
                return Err(errors.into());
            }
        }

        let normalized = serde_json::to_value(&payload)
            .map_err(|e| es_core::error::EsError::Internal(e.to_string()))?;
        Ok(assemble_bulletin(self.type_tag(), request, author_id, normalized))
    }

    fn render(&self, bulletin: &Bulletin, project: &Project) -> EsResult<Bytes> {
        let payload: SptPayload = parse_payload(self.type_tag(), &bulletin.payload)?;

        let mut report = String::new();
        report.push_str("BOLETIM DE SONDAGEM SPT\n");
        report.push_str("=======================\n\n");
        report.push_str(&format!("Projeto: {}\n", project.name));
        if let Some(client) = &project.client_name {
            report.push_str(&format!("Cliente: {}\n", client));
        }
        report.push_str(&format!(
            "Executado em: {}\n\n",
            bulletin.executed_at.format("%Y-%m-%d")
        ));

        if let Some(depth) = payload.initial_depth {
            report.push_str(&format!("Profundidade inicial: {:.2} m\n", depth));
        }
        if let Some(depth) = payload.final_depth {
            report.push_str(&format!("Profundidade final: {:.2} m\n", depth));
        }
        if let Some(blows) = payload.blows_first_30cm {
            report.push_str(&format!("Golpes (primeiros 30 cm): {}\n", blows));
        }
        if let Some(blows) = payload.blows_last_30cm {
            report.push_str(&format!("Golpes (ultimos 30 cm): {}\n", blows));
        }
        if let Some(soil) = &payload.soil_classification {
            report.push_str(&format!("Classificacao do solo: {}\n", soil));
        }

        Ok(Bytes::from(report))
    }
}
