//! # Manifesto
//!
//! Record model for air-cargo manifests and the mapping from backend rows.
//!
//! Rows arrive with loose shapes: older rows use `numero_manifesto`,
//! `data_recebimento` or `cia_aerea` where newer rows use the canonical
//! names. The mapping is total — every row produces a record, missing
//! fields default, and the canonical name wins when both spellings are
//! present.

use serde::Serialize;
use serde_json::Value;

use crate::shift::{Shift, classify};
use crate::utils::parse_received;
use chrono::NaiveDateTime;

pub const MANIFEST_TABLE: &str = "smo_manifestos";
pub const HISTORY_TABLE: &str = "smo_historico";
pub const MANIFEST_ID_FIELD: &str = "manifesto";
pub const CARIMBO_FIELD: &str = "carimbo";
pub const ID_PREFIX: &str = "MAO-";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Manifest {
    pub manifesto: String,
    pub voo: String,
    pub origem: String,
    pub destino: String,
    pub companhia: String,
    pub volumes: u64,
    pub peso_kg: f64,
    pub recebido_em: Option<String>,
    pub status: String,
    pub usuario: String,
    pub carimbo: Option<String>,
    pub observacoes: String,
}

impl Manifest {
    pub fn from_row(row: &Value) -> Self {
        Self {
            manifesto: text(row, &["manifesto", "numero_manifesto"]),
            voo: text(row, &["voo", "numero_voo"]),
            origem: text(row, &["origem"]),
            destino: text(row, &["destino"]),
            companhia: text(row, &["companhia", "cia_aerea"]),
            volumes: integer(row, &["volumes", "quantidade_volumes"]),
            peso_kg: number(row, &["peso_kg", "peso"]),
            recebido_em: optional_text(row, &["recebido_em", "data_recebimento"]),
            status: text(row, &["status"]),
            usuario: text(row, &["usuario", "usuario_action"]),
            carimbo: optional_text(row, &["carimbo", "data_action"]),
            observacoes: text(row, &["observacoes", "observacao"]),
        }
    }

    pub fn received_at(&self) -> Option<NaiveDateTime> {
        self.recebido_em.as_deref().and_then(parse_received)
    }

    pub fn turno(&self) -> Shift {
        classify(self.received_at())
    }

    pub fn lifecycle(&self) -> Option<Status> {
        Status::parse(&self.status)
    }

    /// Row as shown to the dashboard: stored fields plus the derived turno.
    pub fn to_view(&self) -> Value {
        let mut view = serde_json::json!({
            "manifesto": self.manifesto,
            "voo": self.voo,
            "origem": self.origem,
            "destino": self.destino,
            "companhia": self.companhia,
            "volumes": self.volumes,
            "peso_kg": self.peso_kg,
            "recebido_em": self.recebido_em,
            "status": self.status,
            "usuario": self.usuario,
            "carimbo": self.carimbo,
            "observacoes": self.observacoes,
        });

        view["turno"] = Value::String(self.turno().as_str().to_string());
        view
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Received,
    Started,
    Available,
    InConference,
    Pending,
    Complete,
    Delivered,
    Cancelled,
    Annulled,
}

impl Status {
    /// Lenient over accents and case; unknown vocabulary stays unknown,
    /// the backend owns it.
    pub fn parse(raw: &str) -> Option<Self> {
        match fold(raw).as_str() {
            "recebido" => Some(Status::Received),
            "iniciado" => Some(Status::Started),
            "disponivel" => Some(Status::Available),
            "em conferencia" => Some(Status::InConference),
            "pendente" => Some(Status::Pending),
            "completo" => Some(Status::Complete),
            "entregue" => Some(Status::Delivered),
            "cancelado" => Some(Status::Cancelled),
            "anulado" => Some(Status::Annulled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Received => "Recebido",
            Status::Started => "Iniciado",
            Status::Available => "Disponível",
            Status::InConference => "Em Conferência",
            Status::Pending => "Pendente",
            Status::Complete => "Completo",
            Status::Delivered => "Entregue",
            Status::Cancelled => "Cancelado",
            Status::Annulled => "Anulado",
        }
    }
}

fn fold(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

fn text(row: &Value, names: &[&str]) -> String {
    names
        .iter()
        .find_map(|name| row.get(name).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn optional_text(row: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| row.get(name).and_then(Value::as_str))
        .map(str::to_string)
}

fn integer(row: &Value, names: &[&str]) -> u64 {
    names
        .iter()
        .find_map(|name| row.get(name).and_then(Value::as_u64))
        .unwrap_or_default()
}

fn number(row: &Value, names: &[&str]) -> f64 {
    names
        .iter()
        .find_map(|name| row.get(name).and_then(Value::as_f64))
        .unwrap_or_default()
}
