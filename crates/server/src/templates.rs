//! Tera template registry. Templates are embedded at compile time so
//! rendering never depends on the working directory.

use anyhow::{Context, Result};
use tera::Tera;

pub fn build_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../templates/base.html")),
        ("home.html", include_str!("../templates/home.html")),
        (
            "subject_questions.html",
            include_str!("../templates/subject_questions.html"),
        ),
        (
            "question_detail.html",
            include_str!("../templates/question_detail.html"),
        ),
        (
            "debug_helper.html",
            include_str!("../templates/debug_helper.html"),
        ),
        ("about.html", include_str!("../templates/about.html")),
        (
            "admin_login.html",
            include_str!("../templates/admin_login.html"),
        ),
        (
            "admin_dashboard.html",
            include_str!("../templates/admin_dashboard.html"),
        ),
        (
            "subject_form.html",
            include_str!("../templates/subject_form.html"),
        ),
        (
            "question_form.html",
            include_str!("../templates/question_form.html"),
        ),
    ])
    .context("failed to register templates")?;

    Ok(tera)
}
