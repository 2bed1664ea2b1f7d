//! Pages of the app and their view counters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Pages served by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Survey,
    Stats,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Survey, Page::Stats];

    /// Identifier used for analytics page titles.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Survey => "survey",
            Self::Stats => "stats",
        }
    }

    /// Key of the view counter row for this page.
    pub fn counter_name(&self) -> &'static str {
        match self {
            Self::Home => "홈",
            Self::Survey => "설문",
            Self::Stats => "통계",
        }
    }

    /// Looks a page up by slug or counter name.
    pub fn parse(name: &str) -> Option<Page> {
        Self::ALL
            .into_iter()
            .find(|page| page.slug() == name || page.counter_name() == name)
    }
}

/// One row of the page view table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViewRow {
    pub page_name: String,
    pub view_count: u64,
}

impl PageViewRow {
    pub fn new(page_name: impl Into<String>, view_count: u64) -> Self {
        Self {
            page_name: page_name.into(),
            view_count,
        }
    }
}

/// Page name to visit count, as persisted by the file counter.
pub type ViewCounts = BTreeMap<String, u64>;

/// Flatten a count map into table rows.
pub fn rows_from_counts(counts: &ViewCounts) -> Vec<PageViewRow> {
    counts
        .iter()
        .map(|(name, count)| PageViewRow::new(name.clone(), *count))
        .collect()
}
