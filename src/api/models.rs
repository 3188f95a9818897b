// API request/response models (DTOs)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::inventory::{LegoFields, LegoRow};

/// Standard API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(Meta::now()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            meta: Some(Meta::now()),
        }
    }
}

/// Metadata included in all API responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub version: String,
}

impl Meta {
    pub fn now() -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: uuid::Uuid::new_v4().to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// `GET /lego` filter pair; both or neither must be present.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "searchBy")]
    pub search_by: Option<String>,
    #[serde(rename = "searchValue")]
    pub search_value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionsQuery {
    pub category: Option<String>,
}

/// Create/update body: the full writable field set. `cantidad` is accepted
/// as an alias for `cant`; older clients send it on create.
#[derive(Debug, Clone, Deserialize)]
pub struct LegoPayload {
    pub code: Option<String>,
    pub lego: Option<String>,
    pub set: Option<String>,
    pub task: Option<String>,
    pub pedido: Option<String>,
    #[serde(alias = "cantidad")]
    pub cant: Option<String>,
    pub completo: Option<String>,
    pub reemplazado: Option<String>,
    /// Set-level edit: resolve and embed the set image before writing.
    #[serde(rename = "isEditSet", default)]
    pub is_edit_set: bool,
}

impl LegoPayload {
    pub fn into_fields(self) -> LegoFields {
        LegoFields {
            code: self.code,
            lego: self.lego,
            set: self.set,
            task: self.task,
            pedido: self.pedido,
            cant: self.cant,
            completo: self.completo,
            reemplazado: self.reemplazado,
        }
    }
}

/// A row with its response-time image annotations.
#[derive(Debug, Serialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub row: LegoRow,
    #[serde(rename = "imageSet")]
    pub image_set: String,
    #[serde(rename = "imagePiece")]
    pub image_piece: String,
}

/// Grouped-by-set summary attached to list responses.
#[derive(Debug, Serialize)]
pub struct SetSummary {
    pub name: String,
    pub image: String,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct ListPayload {
    pub items: Vec<AnnotatedRow>,
    pub sets: Vec<SetSummary>,
}

/// Update response: the written row plus the set image when one was resolved.
#[derive(Debug, Serialize)]
pub struct UpdatedRow {
    #[serde(flatten)]
    pub row: LegoRow,
    #[serde(rename = "imageSet", skip_serializing_if = "Option::is_none")]
    pub image_set: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_cantidad_alias() {
        let p: LegoPayload =
            serde_json::from_str(r#"{"code":"6093053","cantidad":"4"}"#).unwrap();
        assert_eq!(p.cant.as_deref(), Some("4"));
        assert!(!p.is_edit_set);
    }

    #[test]
    fn payload_parses_edit_set_flag() {
        let p: LegoPayload =
            serde_json::from_str(r#"{"lego":"41092","isEditSet":true}"#).unwrap();
        assert!(p.is_edit_set);
        let fields = p.into_fields();
        assert_eq!(fields.lego.as_deref(), Some("41092"));
    }
}
