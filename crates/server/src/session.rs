//! Server-side sessions keyed by a UUID carried in an HttpOnly cookie.
//!
//! Entries hold the admin login state and any flash notices queued for the
//! next rendered page. The cookie itself carries nothing but the id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::middleware::Next;
use axum::response::Response;
use cookie::{Cookie, SameSite};
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;

pub const SESSION_COOKIE: &str = "studydesk_session";

/// Per-request session id, inserted into request extensions by
/// [`session_layer`].
#[derive(Debug, Clone, Copy)]
pub struct SessionId(pub Uuid);

/// Transient notice shown once on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".to_string(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            category: "error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    admin_username: Option<String>,
    flashes: Vec<Flash>,
    expires_at: Instant,
}

pub struct SessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a live session id, reusing the submitted one when it still
    /// exists and has not expired, otherwise allocating a fresh entry.
    pub fn ensure(&self, submitted: Option<Uuid>) -> Uuid {
        let mut entries = self.entries.lock().expect("session store poisoned");
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);

        if let Some(id) = submitted {
            if entries.contains_key(&id) {
                return id;
            }
        }

        let id = Uuid::new_v4();
        entries.insert(
            id,
            SessionEntry {
                admin_username: None,
                flashes: Vec::new(),
                expires_at: now + self.ttl,
            },
        );
        id
    }

    pub fn login(&self, id: Uuid, username: impl Into<String>) {
        let mut entries = self.entries.lock().expect("session store poisoned");
        if let Some(entry) = entries.get_mut(&id) {
            entry.admin_username = Some(username.into());
        }
    }

    /// Clears the login state; a no-op when already logged out.
    pub fn logout(&self, id: Uuid) {
        let mut entries = self.entries.lock().expect("session store poisoned");
        if let Some(entry) = entries.get_mut(&id) {
            entry.admin_username = None;
        }
    }

    pub fn is_admin(&self, id: Uuid) -> bool {
        self.admin_username(id).is_some()
    }

    pub fn admin_username(&self, id: Uuid) -> Option<String> {
        let entries = self.entries.lock().expect("session store poisoned");
        entries.get(&id).and_then(|entry| entry.admin_username.clone())
    }

    pub fn flash(&self, id: Uuid, flash: Flash) {
        let mut entries = self.entries.lock().expect("session store poisoned");
        if let Some(entry) = entries.get_mut(&id) {
            entry.flashes.push(flash);
        }
    }

    /// Drains the queued notices; each notice is rendered exactly once.
    pub fn take_flashes(&self, id: Uuid) -> Vec<Flash> {
        let mut entries = self.entries.lock().expect("session store poisoned");
        entries
            .get_mut(&id)
            .map(|entry| std::mem::take(&mut entry.flashes))
            .unwrap_or_default()
    }
}

/// Attaches a [`SessionId`] to every request and sets the session cookie on
/// the response whenever a new entry was allocated.
pub async fn session_layer(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let submitted = request
        .headers()
        .get(COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_session_cookie);

    let id = state.sessions.ensure(submitted);
    request.extensions_mut().insert(SessionId(id));

    let mut response = next.run(request).await;

    if submitted != Some(id) {
        let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(state.secure_cookies)
            .build();
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }

    response
}

fn parse_session_cookie(header: &str) -> Option<Uuid> {
    Cookie::split_parse(header.to_string())
        .flatten()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}
