use regex::RegexBuilder;

/// A run of title text, flagged when it matches the query.
///
/// Rendering layers display `text` verbatim; no markup is ever interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub is_match: bool,
}

impl Span {
    fn new(text: &str, is_match: bool) -> Self {
        Self {
            text: text.to_string(),
            is_match,
        }
    }
}

/// Split `title` into spans, marking case-insensitive occurrences of `query`.
///
/// The query is matched literally after trimming; a blank query marks nothing.
pub fn highlight(title: &str, query: &str) -> Vec<Span> {
    if title.is_empty() {
        return Vec::new();
    }
    let needle = query.trim();
    if needle.is_empty() {
        return vec![Span::new(title, false)];
    }

    let Ok(re) = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    else {
        return vec![Span::new(title, false)];
    };

    let mut spans = Vec::new();
    let mut cursor = 0;
    for m in re.find_iter(title) {
        if m.start() > cursor {
            spans.push(Span::new(&title[cursor..m.start()], false));
        }
        spans.push(Span::new(m.as_str(), true));
        cursor = m.end();
    }
    if cursor < title.len() {
        spans.push(Span::new(&title[cursor..], false));
    }
    spans
}
