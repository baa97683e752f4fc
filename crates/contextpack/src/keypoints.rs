use crate::truncation::{char_window, ELLIPSIS};

/// Technical terms worth remembering, scanned in this order. The first hit
/// wins, so more specific phrases sit ahead of their substrings.
pub const VOCABULARY: &[&str] = &[
    "hash map",
    "hashmap",
    "dictionary",
    "array",
    "linked list",
    "binary search",
    "binary tree",
    "bst",
    "heap",
    "stack",
    "queue",
    "dynamic programming",
    "dp",
    "memoization",
    "recursion",
    "o(n)",
    "o(1)",
    "o(log n)",
    "o(n^2)",
    "time complexity",
    "space complexity",
    "sorting",
    "quicksort",
    "mergesort",
    "graph",
    "dfs",
    "bfs",
    "two pointer",
    "sliding window",
    "greedy",
    "backtracking",
];

/// Characters of context kept on each side of a matched term.
pub const WINDOW_BEFORE: usize = 30;
pub const WINDOW_AFTER: usize = 70;

/// A recognized term and the decorated snippet around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPointHit {
    pub keyword: &'static str,
    pub snippet: String,
}

/// Find the first vocabulary term in `text` (case-insensitive) and cut a
/// `...context...` snippet around it.
///
/// At most one hit per text. Returns `None` when no term matches or the
/// surrounding window is blank.
pub fn scan(text: &str) -> Option<KeyPointHit> {
    // ASCII lowering keeps byte offsets identical to `text`.
    let lowered = text.to_ascii_lowercase();
    let (keyword, start) = VOCABULARY
        .iter()
        .find_map(|term| lowered.find(term).map(|pos| (*term, pos)))?;

    let window = char_window(text, start, start + keyword.len(), WINDOW_BEFORE, WINDOW_AFTER).trim();
    if window.is_empty() {
        return None;
    }
    Some(KeyPointHit {
        keyword,
        snippet: format!("{ELLIPSIS}{window}{ELLIPSIS}"),
    })
}
