//! Page templates, compiled into the binary.

use axum::response::Html;
use mate_core::{Error, Result};
use tera::{Context, Tera};
use tracing::error;

use crate::response::ApiError;

const TEMPLATES: [(&str, &str); 4] = [
    ("base.html", include_str!("../templates/base.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("survey.html", include_str!("../templates/survey.html")),
    ("stats.html", include_str!("../templates/stats.html")),
];

/// Parses every page template.
pub fn load() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)
        .map_err(|e| Error::internal(format!("failed to parse templates: {}", e)))?;
    Ok(tera)
}

/// Renders `name` into an HTML response.
pub fn render(tera: &Tera, name: &str, context: &Context) -> std::result::Result<Html<String>, ApiError> {
    tera.render(name, context).map(Html).map_err(|e| {
        error!(template = name, error = ?e, "Template rendering failed");
        ApiError::internal(format!("failed to render {}", name))
    })
}
