//! Page view table.

use mate_core::PageViewRow;

/// Rows ordered by count, highest first. Ties are ordered by page name.
pub fn sorted_page_views(mut rows: Vec<PageViewRow>) -> Vec<PageViewRow> {
    rows.sort_by(|a, b| {
        b.view_count
            .cmp(&a.view_count)
            .then_with(|| a.page_name.cmp(&b.page_name))
    });
    rows
}
