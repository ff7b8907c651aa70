//! Public, read-only pages.

use std::sync::Arc;

use axum::Extension;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use tera::Context;

use super::{AppResult, AppState, render};
use crate::session::{Flash, SessionId};

pub async fn home(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    let subjects = state.subjects.list_all().await?;

    let mut context = Context::new();
    context.insert("subjects", &subjects);
    Ok(render(&state, session, "home.html", context)?.into_response())
}

pub async fn subject_questions(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let Some(subject) = state.subjects.find_by_id(id).await? else {
        state.sessions.flash(session.0, Flash::error("Subject not found!"));
        return Ok(Redirect::to("/").into_response());
    };

    let questions = state.questions.list_by_subject(id).await?;

    let mut context = Context::new();
    context.insert("subject", &subject);
    context.insert("questions", &questions);
    Ok(render(&state, session, "subject_questions.html", context)?.into_response())
}

pub async fn question_detail(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    let Some(question) = state.questions.find_with_subject(id).await? else {
        state.sessions.flash(session.0, Flash::error("Question not found!"));
        return Ok(Redirect::to("/").into_response());
    };

    let mut context = Context::new();
    context.insert("question", &question);
    Ok(render(&state, session, "question_detail.html", context)?.into_response())
}

pub async fn debug_helper(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    Ok(render(&state, session, "debug_helper.html", Context::new())?.into_response())
}

pub async fn about(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    Ok(render(&state, session, "about.html", Context::new())?.into_response())
}
