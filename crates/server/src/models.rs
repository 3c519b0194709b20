use bidi_core::domain::model::StatusSnapshot;
use bidi_core::domain::severity::StatusColor;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub message: AuthMessage,
    pub bidi: BidiStatus,
    /// Provider summary as fetched, its error object, or `null` before the first poll.
    pub openapi: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct AuthMessage {
    pub auth: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BidiStatus {
    pub status: u8,
    pub color: StatusColor,
    pub text: String,
    pub extra: Option<String>,
    pub meaning: String,
}

impl From<&StatusSnapshot> for ApiResponse {
    fn from(snapshot: &StatusSnapshot) -> Self {
        Self {
            message: AuthMessage { auth: "Authorized" },
            bidi: BidiStatus {
                status: snapshot.status_number(),
                color: snapshot.color,
                text: snapshot.text.clone(),
                extra: snapshot.detail.clone(),
                meaning: snapshot.meaning.clone(),
            },
            openapi: snapshot
                .provider_summary
                .clone()
                .unwrap_or(serde_json::Value::Null),
        }
    }
}
