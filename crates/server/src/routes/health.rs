use axum::response::Json as ResponseJson;

use crate::error::ApiMessage;

pub async fn health_check() -> ResponseJson<ApiMessage> {
    ResponseJson(ApiMessage::new("OK"))
}
