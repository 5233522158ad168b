use crate::quiz::crew::{find_by_key, Character};
use crate::share::RESULT_ROUTE_PREFIX;

const RESULT_PATH: &str = "/result/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Quiz,
    SharedResult { slug: String },
}

impl Route {
    /// Parses a location such as `/`, `/result/el-capo` or `#/result/el-capo`.
    /// Anything that is not a result path opens the quiz.
    pub fn parse(location: &str) -> Self {
        let path = location.trim().trim_start_matches('#');
        match path.strip_prefix(RESULT_PATH) {
            Some(slug) if !slug.is_empty() && !slug.contains('/') => Route::SharedResult {
                slug: slug.to_string(),
            },
            _ => Route::Quiz,
        }
    }

    /// Recognises a full share link, e.g. `https://host/#/result/el-capo`.
    pub fn from_share_url(text: &str) -> Option<Self> {
        let text = text.trim();
        if !(text.starts_with("http://") || text.starts_with("https://")) {
            return None;
        }
        let fragment_at = text.find(RESULT_ROUTE_PREFIX)?;
        match Route::parse(&text[fragment_at..]) {
            Route::Quiz => None,
            route => Some(route),
        }
    }

    /// Reads a chat deep-link payload (`/start el-capo`). An empty payload is
    /// the plain quiz entry.
    pub fn from_start_payload(payload: &str) -> Self {
        let payload = payload.trim();
        if payload.is_empty() {
            Route::Quiz
        } else {
            Route::SharedResult {
                slug: payload.to_string(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedResult {
    Found(&'static Character),
    NotFound { slug: String },
}

pub fn resolve_shared_result(slug: &str) -> SharedResult {
    match find_by_key(slug) {
        Some(character) => SharedResult::Found(character),
        None => SharedResult::NotFound {
            slug: slug.to_string(),
        },
    }
}
