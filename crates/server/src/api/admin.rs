//! Admin area: session login and CRUD over subjects and questions.
//!
//! Every mutating route checks the session first; an unauthenticated request
//! is redirected to the login page without touching the store. Recoverable
//! failures (missing rows, empty fields, duplicate names) become flash
//! notices; the form is re-rendered with the submitted values so nothing the
//! admin typed is lost.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::{Extension, Form};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde_json::json;
use studydesk_core::domain::{DIFFICULTY_CHOICES, DomainError, normalize_difficulty};
use tera::Context;

use super::{AppResult, AppState, render};
use crate::auth;
use crate::session::{Flash, SessionId};

const DEFAULT_SUBJECT_COLOR: &str = "#3498db";
const DASHBOARD_RECENT_QUESTIONS: u64 = 10;

/// Login guard. Admin handlers return the redirect untouched when the
/// session holds no login.
fn require_admin(state: &AppState, session: SessionId) -> Result<(), Redirect> {
    if state.sessions.is_admin(session.0) {
        Ok(())
    } else {
        Err(Redirect::to("/admin"))
    }
}

// ---- Authentication ----

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    if state.sessions.is_admin(session.0) {
        return Ok(Redirect::to("/admin/dashboard").into_response());
    }

    Ok(render(&state, session, "admin_login.html", Context::new())?.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim();
    let admin = state.admins.find_by_username(username).await?;

    // One generic failure message; whether the username existed stays hidden.
    let verified = admin
        .map(|record| auth::verify_password(&form.password, &record.password_hash))
        .unwrap_or(false);

    if verified {
        state.sessions.login(session.0, username);
        state
            .sessions
            .flash(session.0, Flash::success("Login successful!"));
        Ok(Redirect::to("/admin/dashboard").into_response())
    } else {
        state
            .sessions
            .flash(session.0, Flash::error("Invalid credentials!"));
        Ok(Redirect::to("/admin").into_response())
    }
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    state.sessions.logout(session.0);
    state
        .sessions
        .flash(session.0, Flash::success("Logged out successfully!"));
    Ok(Redirect::to("/").into_response())
}

// ---- Dashboard ----

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let subjects = state.subjects.list_all().await?;
    let questions = state.questions.list_recent(DASHBOARD_RECENT_QUESTIONS).await?;
    let total_questions = state.questions.count().await?;

    let mut context = Context::new();
    context.insert(
        "stats",
        &json!({
            "total_subjects": subjects.len(),
            "total_questions": total_questions,
        }),
    );
    context.insert("subjects", &subjects);
    context.insert("questions", &questions);
    Ok(render(&state, session, "admin_dashboard.html", context)?.into_response())
}

// ---- Subjects ----

#[derive(Debug, Deserialize, Default)]
pub struct SubjectForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    color: String,
}

impl SubjectForm {
    fn trimmed(&self) -> (String, String, String) {
        let color = self.color.trim();
        (
            self.name.trim().to_string(),
            self.description.trim().to_string(),
            if color.is_empty() {
                DEFAULT_SUBJECT_COLOR.to_string()
            } else {
                color.to_string()
            },
        )
    }
}

fn render_subject_form(
    state: &AppState,
    session: SessionId,
    heading: &str,
    action: &str,
    name: &str,
    description: &str,
    color: &str,
) -> AppResult<Response> {
    let mut context = Context::new();
    context.insert("heading", heading);
    context.insert("action", action);
    context.insert(
        "form",
        &json!({ "name": name, "description": description, "color": color }),
    );
    Ok(render(state, session, "subject_form.html", context)?.into_response())
}

pub async fn add_subject_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    render_subject_form(
        &state,
        session,
        "Add Subject",
        "/admin/subjects/add",
        "",
        "",
        DEFAULT_SUBJECT_COLOR,
    )
}

pub async fn add_subject(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<SubjectForm>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let (name, description, color) = form.trimmed();
    let rerender = |state: &AppState| {
        render_subject_form(
            state,
            session,
            "Add Subject",
            "/admin/subjects/add",
            &name,
            &description,
            &color,
        )
    };

    if name.is_empty() {
        state
            .sessions
            .flash(session.0, Flash::error("Subject name is required!"));
        return rerender(&state);
    }

    let new_subject = crate::repository::NewSubject {
        name: name.clone(),
        description: (!description.is_empty()).then(|| description.clone()),
        color: color.clone(),
    };

    match state.subjects.create(new_subject).await {
        Ok(_) => {
            state
                .sessions
                .flash(session.0, Flash::success("Subject added successfully!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(err) if is_duplicate_name(&err) => {
            state
                .sessions
                .flash(session.0, Flash::error("Subject name already exists!"));
            rerender(&state)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_subject_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let Some(subject) = state.subjects.find_by_id(id).await? else {
        state.sessions.flash(session.0, Flash::error("Subject not found!"));
        return Ok(Redirect::to("/admin/dashboard").into_response());
    };

    render_subject_form(
        &state,
        session,
        "Edit Subject",
        &format!("/admin/subjects/edit/{id}"),
        &subject.name,
        subject.description.as_deref().unwrap_or(""),
        &subject.color,
    )
}

pub async fn edit_subject(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
    Form(form): Form<SubjectForm>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let (name, description, color) = form.trimmed();
    // On failure the form keeps what was submitted, not the stored row.
    let rerender = |state: &AppState| {
        render_subject_form(
            state,
            session,
            "Edit Subject",
            &format!("/admin/subjects/edit/{id}"),
            &name,
            &description,
            &color,
        )
    };

    if name.is_empty() {
        state
            .sessions
            .flash(session.0, Flash::error("Subject name is required!"));
        return rerender(&state);
    }

    let update = crate::repository::SubjectUpdate {
        name: name.clone(),
        description: (!description.is_empty()).then(|| description.clone()),
        color: color.clone(),
    };

    match state.subjects.update(id, update).await {
        Ok(Some(_)) => {
            state
                .sessions
                .flash(session.0, Flash::success("Subject updated successfully!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Ok(None) => {
            state.sessions.flash(session.0, Flash::error("Subject not found!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(err) if is_duplicate_name(&err) => {
            state
                .sessions
                .flash(session.0, Flash::error("Subject name already exists!"));
            rerender(&state)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_subject(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    // Deleting an absent id is fine; the cascade removes the questions.
    state.subjects.delete(id).await?;
    state
        .sessions
        .flash(session.0, Flash::success("Subject deleted successfully!"));
    Ok(Redirect::to("/admin/dashboard").into_response())
}

// ---- Questions ----

#[derive(Debug, Deserialize, Default)]
pub struct QuestionForm {
    #[serde(default)]
    subject_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    question_text: String,
    #[serde(default)]
    code_answer: String,
    #[serde(default)]
    difficulty: String,
}

struct QuestionFormValues {
    subject_id: Option<i32>,
    title: String,
    question_text: String,
    code_answer: String,
    difficulty: String,
}

impl QuestionForm {
    fn trimmed(&self) -> QuestionFormValues {
        QuestionFormValues {
            subject_id: self.subject_id.trim().parse().ok(),
            title: self.title.trim().to_string(),
            question_text: self.question_text.trim().to_string(),
            code_answer: self.code_answer.trim().to_string(),
            difficulty: normalize_difficulty(&self.difficulty),
        }
    }
}

impl QuestionFormValues {
    fn is_complete(&self) -> bool {
        self.subject_id.is_some()
            && !self.title.is_empty()
            && !self.question_text.is_empty()
            && !self.code_answer.is_empty()
    }
}

async fn render_question_form(
    state: &AppState,
    session: SessionId,
    heading: &str,
    action: &str,
    values: &QuestionFormValues,
) -> AppResult<Response> {
    let subjects = state.subjects.list_all().await?;

    let mut context = Context::new();
    context.insert("heading", heading);
    context.insert("action", action);
    context.insert("subjects", &subjects);
    context.insert("difficulty_choices", DIFFICULTY_CHOICES);
    context.insert(
        "form",
        &json!({
            "subject_id": values.subject_id.unwrap_or(0),
            "title": values.title,
            "question_text": values.question_text,
            "code_answer": values.code_answer,
            "difficulty": values.difficulty,
        }),
    );
    Ok(render(state, session, "question_form.html", context)?.into_response())
}

pub async fn add_question_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let empty = QuestionForm::default().trimmed();
    render_question_form(&state, session, "Add Question", "/admin/questions/add", &empty).await
}

pub async fn add_question(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let values = form.trimmed();

    if !values.is_complete() {
        state
            .sessions
            .flash(session.0, Flash::error("All fields are required!"));
        return render_question_form(
            &state,
            session,
            "Add Question",
            "/admin/questions/add",
            &values,
        )
        .await;
    }

    let new_question = crate::repository::NewQuestion {
        subject_id: values.subject_id.unwrap_or_default(),
        title: values.title.clone(),
        question_text: values.question_text.clone(),
        code_answer: values.code_answer.clone(),
        difficulty: values.difficulty.clone(),
    };

    match state.questions.create(new_question).await {
        Ok(_) => {
            state
                .sessions
                .flash(session.0, Flash::success("Question added successfully!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(err) if is_missing_subject(&err) => {
            state
                .sessions
                .flash(session.0, Flash::error("Selected subject does not exist!"));
            render_question_form(
                &state,
                session,
                "Add Question",
                "/admin/questions/add",
                &values,
            )
            .await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn edit_question_form(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let Some(question) = state.questions.find_by_id(id).await? else {
        state.sessions.flash(session.0, Flash::error("Question not found!"));
        return Ok(Redirect::to("/admin/dashboard").into_response());
    };

    let values = QuestionFormValues {
        subject_id: Some(question.subject_id),
        title: question.title,
        question_text: question.question_text,
        code_answer: question.code_answer,
        difficulty: question.difficulty,
    };
    render_question_form(
        &state,
        session,
        "Edit Question",
        &format!("/admin/questions/edit/{id}"),
        &values,
    )
    .await
}

pub async fn edit_question(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
    Form(form): Form<QuestionForm>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    let values = form.trimmed();
    let action = format!("/admin/questions/edit/{id}");

    if !values.is_complete() {
        state
            .sessions
            .flash(session.0, Flash::error("All fields are required!"));
        return render_question_form(&state, session, "Edit Question", &action, &values).await;
    }

    let update = crate::repository::QuestionUpdate {
        subject_id: values.subject_id.unwrap_or_default(),
        title: values.title.clone(),
        question_text: values.question_text.clone(),
        code_answer: values.code_answer.clone(),
        difficulty: values.difficulty.clone(),
    };

    match state.questions.update(id, update).await {
        Ok(Some(_)) => {
            state
                .sessions
                .flash(session.0, Flash::success("Question updated successfully!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Ok(None) => {
            state.sessions.flash(session.0, Flash::error("Question not found!"));
            Ok(Redirect::to("/admin/dashboard").into_response())
        }
        Err(err) if is_missing_subject(&err) => {
            state
                .sessions
                .flash(session.0, Flash::error("Selected subject does not exist!"));
            render_question_form(&state, session, "Edit Question", &action, &values).await
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn delete_question(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionId>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    if let Err(redirect) = require_admin(&state, session) {
        return Ok(redirect.into_response());
    }

    state.questions.delete(id).await?;
    state
        .sessions
        .flash(session.0, Flash::success("Question deleted successfully!"));
    Ok(Redirect::to("/admin/dashboard").into_response())
}

// ---- Error classification ----

fn is_duplicate_name(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::DuplicateSubjectName)
    )
}

fn is_missing_subject(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::MissingSubject)
    )
}
