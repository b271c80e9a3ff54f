use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Lines of context around each hunk.
pub const DEFAULT_CONTEXT: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffStats {
    pub inserted: usize,
    pub deleted: usize,
}

/// Unified diff from `expected` to `actual`, with `expected`/`actual` headers.
pub fn unified_diff(expected: &str, actual: &str, context: usize) -> (String, DiffStats) {
    let expected = terminated(expected);
    let actual = terminated(actual);
    let diff = TextDiff::from_lines(expected.as_str(), actual.as_str());

    let mut stats = DiffStats::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => stats.inserted += 1,
            ChangeTag::Delete => stats.deleted += 1,
            ChangeTag::Equal => {}
        }
    }

    let text = diff
        .unified_diff()
        .context_radius(context)
        .header("expected", "actual")
        .to_string();
    (text, stats)
}

/// 1-based line of the first difference, if any.
pub fn first_differing_line(expected: &str, actual: &str) -> Option<usize> {
    let mut expected_lines = expected.lines();
    let mut actual_lines = actual.lines();
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return None,
            (Some(a), Some(b)) if a == b => line += 1,
            _ => return Some(line),
        }
    }
}

fn terminated(text: &str) -> String {
    let mut owned = text.to_string();
    if !owned.is_empty() && !owned.ends_with('\n') {
        owned.push('\n');
    }
    owned
}
