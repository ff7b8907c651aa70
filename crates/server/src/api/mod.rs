//! HTTP surface: public pages, the debug JSON API, and the admin area.

pub mod admin;
pub mod debug;
pub mod error;
pub mod public;
pub mod state;

pub use error::{AppError, AppResult};
pub use state::AppState;

use std::sync::Arc;

use axum::middleware;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tera::Context;
use tower_http::trace::TraceLayer;

use crate::session::{self, SessionId};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(public::home))
        .route("/subject/{id}", get(public::subject_questions))
        .route("/question/{id}", get(public::question_detail))
        .route("/debug-helper", get(public::debug_helper))
        .route("/about", get(public::about))
        .route("/api/debug", post(debug::api_debug))
        .route("/admin", get(admin::login_form))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", get(admin::logout))
        .route("/admin/dashboard", get(admin::dashboard))
        .route(
            "/admin/subjects/add",
            get(admin::add_subject_form).post(admin::add_subject),
        )
        .route(
            "/admin/subjects/edit/{id}",
            get(admin::edit_subject_form).post(admin::edit_subject),
        )
        .route("/admin/subjects/delete/{id}", get(admin::delete_subject))
        .route(
            "/admin/questions/add",
            get(admin::add_question_form).post(admin::add_question),
        )
        .route(
            "/admin/questions/edit/{id}",
            get(admin::edit_question_form).post(admin::edit_question),
        )
        .route("/admin/questions/delete/{id}", get(admin::delete_question))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_layer,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Renders a template with the session's drained flash notices and login
/// state merged into the context.
pub(crate) fn render(
    state: &AppState,
    session: SessionId,
    template: &str,
    mut context: Context,
) -> Result<Html<String>, AppError> {
    context.insert("flashes", &state.sessions.take_flashes(session.0));
    context.insert("admin_username", &state.sessions.admin_username(session.0));

    let body = state.templates.render(template, &context)?;
    Ok(Html(body))
}
