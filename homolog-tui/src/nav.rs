//! Routes of the explorer.

use homolog_core::RecordId;

const EXPLORE_PATH: &str = "/explore-data";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Filters, search, grid, and preview.
    #[default]
    Explore,
    /// One record, addressed by its `_id`.
    Detail(RecordId),
}

impl Route {
    /// Parse `/explore-data` or `/explore-data/{id}`. A trailing slash is
    /// accepted; anything else is not a route.
    pub fn parse(path: &str) -> Option<Route> {
        let rest = path.strip_prefix(EXPLORE_PATH)?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Some(Route::Explore);
        }
        let id = rest.strip_prefix('/')?;
        if id.is_empty() || id.contains('/') {
            return None;
        }
        Some(Route::Detail(RecordId::new(id)))
    }

    pub fn path(&self) -> String {
        match self {
            Route::Explore => EXPLORE_PATH.to_string(),
            Route::Detail(id) => format!("{}/{}", EXPLORE_PATH, id),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Explore => "Explore",
            Route::Detail(_) => "Detail",
        }
    }
}
