//! JSON endpoint backing the debug-helper page.

use axum::Json;
use studydesk_api_types::{DebugRequest, DebugResponse};
use studydesk_core::domain::suggest;

pub async fn api_debug(Json(request): Json<DebugRequest>) -> Json<DebugResponse> {
    let suggestions = suggest(request.code.trim(), request.error.trim());
    Json(DebugResponse::ok(suggestions))
}
