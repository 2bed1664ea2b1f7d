//! Client-side page view tagging.

use serde::Serialize;

/// Path reported for a page: `home` is the site root.
pub fn page_path(page_name: &str) -> String {
    if page_name == "home" {
        "/".to_string()
    } else {
        format!("/{}", page_name)
    }
}

/// Values the page templates need to render the gtag.js snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GtagContext {
    pub measurement_id: String,
    pub page_title: String,
    pub page_path: String,
}

impl GtagContext {
    pub fn new(measurement_id: impl Into<String>, page_name: &str) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            page_title: page_name.to_string(),
            page_path: page_path(page_name),
        }
    }
}
