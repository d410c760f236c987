//! Search result shaping.
//!
//! Converts raw [`QueryMatch`]es into display-ready [`SearchResult`]s and
//! enforces the content preview limit.

use serde::Serialize;

use crate::models::QueryMatch;

/// Maximum number of characters of recipe content shown in a result.
pub const PREVIEW_CHARS: usize = 50;

/// Marker appended to content that was cut at [`PREVIEW_CHARS`].
pub const ELLIPSIS: &str = "...";

/// Default number of results a query returns.
pub const DEFAULT_TOP_K: usize = 3;

/// Largest `top_k` the vector database accepts for a single query.
pub const MAX_TOP_K: usize = 10_000;

/// A ranked search result ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    /// Content preview, at most [`PREVIEW_CHARS`] characters plus [`ELLIPSIS`].
    pub content: String,
    pub score: f32,
}

impl From<QueryMatch> for SearchResult {
    fn from(m: QueryMatch) -> Self {
        let metadata = m.metadata.unwrap_or_default();
        Self {
            id: m.id,
            title: metadata.title,
            content: truncate_content(&metadata.content),
            score: m.score,
        }
    }
}

/// Cut `content` to [`PREVIEW_CHARS`] Unicode scalar values.
///
/// Counting is by `char`, so a multi-byte character is never split.
/// The ellipsis is appended only when something was removed.
pub fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((byte_idx, _)) => format!("{}{}", &content[..byte_idx], ELLIPSIS),
        None => content.to_string(),
    }
}

/// Sort matches by descending score and keep at most `top_k`.
///
/// NaN scores sort last.
pub fn rank_matches(mut matches: Vec<QueryMatch>, top_k: usize) -> Vec<QueryMatch> {
    matches.sort_by(|a, b| match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => b
            .score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal),
    });
    matches.truncate(top_k);
    matches
}
