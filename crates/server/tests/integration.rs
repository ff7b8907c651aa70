use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tower::ServiceExt;

use studydesk_core::domain::DomainError;
use studydesk_migration::{Migrator, MigratorTrait};
use studydesk_server::api::{AppState, build_router};
use studydesk_server::auth;
use studydesk_server::config::ServerConfig;
use studydesk_server::db;
use studydesk_server::repository::{
    AdminUserRepository, NewQuestion, NewSubject, QuestionRepository, QuestionUpdate,
    SeaOrmAdminUserRepository, SeaOrmQuestionRepository, SeaOrmSubjectRepository,
    SubjectRepository, SubjectUpdate,
};

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps every statement on the same memory store.
async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite should connect");
    Migrator::up(&db, None).await.expect("migrations should run");
    db
}

fn subject(name: &str) -> NewSubject {
    NewSubject {
        name: name.to_string(),
        description: None,
        color: "#3498db".to_string(),
    }
}

fn question(subject_id: i32, title: &str) -> NewQuestion {
    NewQuestion {
        subject_id,
        title: title.to_string(),
        question_text: "What does this print?".to_string(),
        code_answer: "print(42)".to_string(),
        difficulty: "Medium".to_string(),
    }
}

// ---- Repository behavior ----

#[tokio::test]
async fn subjects_are_listed_once_each_sorted_by_name() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db);

    for name in ["DSV", "AJP", "Web Tech"] {
        subjects.create(subject(name)).await.expect("create subject");
    }

    let listed = subjects.list_all().await.expect("list subjects");
    let names: Vec<_> = listed.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["AJP", "DSV", "Web Tech"]);
}

#[tokio::test]
async fn duplicate_subject_name_is_rejected_without_a_write() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db);

    subjects.create(subject("AJP")).await.expect("create subject");
    let before = subjects.count().await.expect("count subjects");

    let err = subjects
        .create(subject("AJP"))
        .await
        .expect_err("duplicate name must fail");
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::DuplicateSubjectName)
    );

    let after = subjects.count().await.expect("count subjects");
    assert_eq!(before, after);
}

#[tokio::test]
async fn renaming_a_subject_onto_an_existing_name_is_rejected() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db);

    subjects.create(subject("AJP")).await.expect("create subject");
    let second = subjects.create(subject("DSV")).await.expect("create subject");

    let err = subjects
        .update(
            second.id,
            SubjectUpdate {
                name: "AJP".to_string(),
                description: None,
                color: second.color.clone(),
            },
        )
        .await
        .expect_err("rename onto a taken name must fail");
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::DuplicateSubjectName)
    );

    // The stored row is untouched.
    let stored = subjects
        .find_by_id(second.id)
        .await
        .expect("find subject")
        .expect("subject still present");
    assert_eq!(stored.name, "DSV");
}

#[tokio::test]
async fn deleting_a_subject_cascades_to_its_questions() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    let doomed = subjects.create(subject("AJP")).await.expect("create subject");
    let kept = subjects.create(subject("DSV")).await.expect("create subject");

    questions.create(question(doomed.id, "q1")).await.expect("create question");
    questions.create(question(doomed.id, "q2")).await.expect("create question");
    let survivor = questions.create(question(kept.id, "q3")).await.expect("create question");

    subjects.delete(doomed.id).await.expect("delete subject");

    assert!(subjects.find_by_id(doomed.id).await.expect("find").is_none());
    assert!(questions.list_by_subject(doomed.id).await.expect("list").is_empty());
    assert_eq!(questions.count().await.expect("count"), 1);
    assert!(questions.find_by_id(survivor.id).await.expect("find").is_some());
}

#[tokio::test]
async fn deleting_absent_rows_is_a_no_op() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    subjects.delete(4242).await.expect("delete absent subject");
    questions.delete(4242).await.expect("delete absent question");
}

#[tokio::test]
async fn questions_are_listed_newest_first() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    let owner = subjects.create(subject("AJP")).await.expect("create subject");
    for title in ["first", "second", "third"] {
        questions.create(question(owner.id, title)).await.expect("create question");
    }

    let listed = questions.list_by_subject(owner.id).await.expect("list questions");
    let titles: Vec<_> = listed.iter().map(|q| q.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn question_detail_joins_subject_name_and_color() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    let owner = subjects
        .create(NewSubject {
            name: "DBMS".to_string(),
            description: Some("Database Management Systems".to_string()),
            color: "#9b59b6".to_string(),
        })
        .await
        .expect("create subject");
    let created = questions.create(question(owner.id, "joins")).await.expect("create question");

    let detail = questions
        .find_with_subject(created.id)
        .await
        .expect("find detail")
        .expect("detail present");
    assert_eq!(detail.subject_name, "DBMS");
    assert_eq!(detail.subject_color, "#9b59b6");
    assert_eq!(detail.question.title, "joins");

    assert!(questions.find_with_subject(9999).await.expect("find").is_none());
}

#[tokio::test]
async fn question_writes_require_an_existing_subject() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    let err = questions
        .create(question(9999, "orphan"))
        .await
        .expect_err("insert with missing subject must fail");
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::MissingSubject)
    );

    let owner = subjects.create(subject("AJP")).await.expect("create subject");
    let created = questions.create(question(owner.id, "kept")).await.expect("create question");

    let err = questions
        .update(
            created.id,
            QuestionUpdate {
                subject_id: 9999,
                title: created.title.clone(),
                question_text: created.question_text.clone(),
                code_answer: created.code_answer.clone(),
                difficulty: created.difficulty.clone(),
            },
        )
        .await
        .expect_err("update onto missing subject must fail");
    assert_eq!(
        err.downcast_ref::<DomainError>(),
        Some(&DomainError::MissingSubject)
    );

    // No inconsistent row was left behind.
    let stored = questions
        .find_by_id(created.id)
        .await
        .expect("find question")
        .expect("question still present");
    assert_eq!(stored.subject_id, owner.id);
}

#[tokio::test]
async fn dashboard_recent_list_is_capped() {
    let db = test_db().await;
    let subjects = SeaOrmSubjectRepository::new(db.clone());
    let questions = SeaOrmQuestionRepository::new(db);

    let owner = subjects.create(subject("AJP")).await.expect("create subject");
    for i in 0..12 {
        questions
            .create(question(owner.id, &format!("q{i}")))
            .await
            .expect("create question");
    }

    let recent = questions.list_recent(10).await.expect("list recent");
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].question.title, "q11");
    assert!(recent.iter().all(|q| q.subject_name == "AJP"));
}

// ---- Bootstrap / seeding ----

#[tokio::test]
async fn seed_creates_defaults_and_is_idempotent() {
    let db = test_db().await;

    db::seed(&db).await.expect("first seed");
    db::seed(&db).await.expect("second seed");

    let subjects = SeaOrmSubjectRepository::new(db.clone());
    assert_eq!(subjects.count().await.expect("count"), 5);

    let names: Vec<_> = subjects
        .list_all()
        .await
        .expect("list")
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["AJP", "DAA", "DBMS", "DSV", "Web Tech"]);

    let admins = SeaOrmAdminUserRepository::new(db);
    let admin = admins
        .find_by_username("admin")
        .await
        .expect("find admin")
        .expect("admin seeded");
    assert!(auth::verify_password("admin123", &admin.password_hash));
    assert!(!auth::verify_password("wrong", &admin.password_hash));
}

// ---- Router behavior ----

async fn test_app() -> (Router, Arc<AppState>) {
    let db = test_db().await;
    db::seed(&db).await.expect("seed");

    let state = Arc::new(
        AppState::new(db, &ServerConfig::default()).expect("app state should build"),
    );
    (build_router(state.clone()), state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build")
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
}

/// The session cookie pair from a Set-Cookie header, without attributes.
fn session_cookie(response: &axum::response::Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("ascii cookie");
    header
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_form("/admin/login", "username=admin&password=admin123"))
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");
    session_cookie(&response)
}

#[tokio::test]
async fn home_page_lists_seeded_subjects() {
    let (app, _state) = test_app().await;

    let response = app.oneshot(get("/")).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let html = String::from_utf8(body.to_vec()).expect("utf8 body");
    assert!(html.contains("AJP"));
    assert!(html.contains("Web Tech"));
}

#[tokio::test]
async fn missing_subject_redirects_home() {
    let (app, _state) = test_app().await;

    let response = app.oneshot(get("/subject/9999")).await.expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn debug_api_answers_with_suggestions() {
    let (app, _state) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/debug")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"code":"","error":"IndentationError: unexpected indent"}"#,
        ))
        .expect("request should build");

    let response = app.oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(payload["success"], true);
    let suggestions = payload["suggestions"].as_array().expect("suggestions array");
    assert_eq!(suggestions.len(), 1);
    assert!(
        suggestions[0]
            .as_str()
            .expect("string suggestion")
            .contains("Indentation Error")
    );
}

#[tokio::test]
async fn admin_routes_redirect_to_login_without_a_session() {
    let (app, state) = test_app().await;
    let before = state.subjects.count().await.expect("count");

    for uri in [
        "/admin/dashboard",
        "/admin/subjects/add",
        "/admin/subjects/delete/1",
        "/admin/questions/add",
        "/admin/questions/delete/1",
    ] {
        let response = app.clone().oneshot(get(uri)).await.expect("request");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/admin", "{uri}");
    }

    // Hitting the add endpoint with a body pre-auth writes nothing either.
    let response = app
        .clone()
        .oneshot(post_form("/admin/subjects/add", "name=Sneaky"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(state.subjects.count().await.expect("count"), before);
}

#[tokio::test]
async fn login_then_dashboard_then_logout() {
    let (app, _state) = test_app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(get_with_cookie("/admin/dashboard", &cookie))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/admin/logout", &cookie))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    // The session is no longer authenticated.
    let response = app
        .clone()
        .oneshot(get_with_cookie("/admin/dashboard", &cookie))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn bad_credentials_leave_the_session_unauthenticated() {
    let (app, _state) = test_app().await;

    let response = app
        .clone()
        .oneshot(post_form("/admin/login", "username=admin&password=wrong"))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    let cookie = session_cookie(&response);
    let response = app
        .clone()
        .oneshot(get_with_cookie("/admin/dashboard", &cookie))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn authenticated_subject_add_writes_and_redirects() {
    let (app, state) = test_app().await;
    let cookie = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/subjects/add")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(COOKIE, &cookie)
        .body(Body::from("name=OS&description=Operating+Systems&color=%23123456"))
        .expect("request should build");

    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin/dashboard");

    assert_eq!(state.subjects.count().await.expect("count"), 6);
}

#[tokio::test]
async fn blank_subject_name_is_rejected_with_the_form_redisplayed() {
    let (app, state) = test_app().await;
    let cookie = login(&app).await;

    let request = Request::builder()
        .method("POST")
        .uri("/admin/subjects/add")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(COOKIE, &cookie)
        .body(Body::from("name=+++&description=whitespace+only"))
        .expect("request should build");

    let response = app.clone().oneshot(request).await.expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let html = String::from_utf8(body.to_vec()).expect("utf8 body");
    assert!(html.contains("Subject name is required!"));

    assert_eq!(state.subjects.count().await.expect("count"), 5);
}
