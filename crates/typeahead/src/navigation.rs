use core_types::MovieId;

/// Free-text search the user committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    text: String,
    include_adult: bool,
}

impl SearchTarget {
    pub fn new(text: impl Into<String>, include_adult: bool) -> Self {
        Self {
            text: text.into(),
            include_adult,
        }
    }

    /// The committed text exactly as chosen or typed (trimmed for raw commits).
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text escaped for use as a URL query value.
    pub fn escaped(&self) -> String {
        url::form_urlencoded::byte_serialize(self.text.as_bytes()).collect()
    }

    pub fn include_adult(&self) -> bool {
        self.include_adult
    }
}

/// Page navigation, implemented by the application shell.
pub trait Navigator: Send {
    fn go_to_search_results(&mut self, target: &SearchTarget);

    fn go_to_details(&mut self, id: MovieId);
}
