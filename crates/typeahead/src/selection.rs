use core_types::Suggestion;

/// Keys the search field reacts to; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// No suggestions on screen.
    Closed,
    OpenUnselected,
    OpenSelected(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Ignored,
    Highlighted(usize),
    CommitSuggestion(Suggestion),
    CommitRaw,
}

/// What a key did, plus whether the input's default handling must be suppressed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyResponse {
    pub action: KeyAction,
    pub prevent_default: bool,
}

impl KeyResponse {
    const fn ignored() -> Self {
        Self {
            action: KeyAction::Ignored,
            prevent_default: false,
        }
    }
}

/// The suggestion list and the keyboard highlight over it.
///
/// Invariant: `index` is either `None` or a valid position in `suggestions`.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    suggestions: Vec<Suggestion>,
    index: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh list; the highlight always starts cleared.
    pub fn replace(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.index = None;
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn reset_highlight(&mut self) {
        self.index = None;
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// The highlight as a signed position, `-1` meaning none.
    pub fn raw_index(&self) -> isize {
        self.index
            .and_then(|i| isize::try_from(i).ok())
            .unwrap_or(-1)
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.index.and_then(|i| self.suggestions.get(i))
    }

    pub fn phase(&self) -> SelectionPhase {
        match (self.suggestions.is_empty(), self.index) {
            (true, _) => SelectionPhase::Closed,
            (false, None) => SelectionPhase::OpenUnselected,
            (false, Some(i)) => SelectionPhase::OpenSelected(i),
        }
    }

    pub fn handle_key(&mut self, key: Key) -> KeyResponse {
        let len = self.suggestions.len();
        match key {
            Key::ArrowDown | Key::ArrowUp if len == 0 => KeyResponse::ignored(),
            Key::ArrowDown => {
                let next = match self.index {
                    Some(i) if i + 1 < len => i + 1,
                    _ => 0,
                };
                self.highlight(next)
            }
            Key::ArrowUp => {
                let next = match self.index {
                    Some(i) if i > 0 => i - 1,
                    _ => len - 1,
                };
                self.highlight(next)
            }
            Key::Enter => {
                let action = match self.selected() {
                    Some(s) => KeyAction::CommitSuggestion(s.clone()),
                    None => KeyAction::CommitRaw,
                };
                self.clear();
                KeyResponse {
                    action,
                    prevent_default: true,
                }
            }
            Key::Other => KeyResponse::ignored(),
        }
    }

    fn highlight(&mut self, index: usize) -> KeyResponse {
        self.index = Some(index);
        KeyResponse {
            action: KeyAction::Highlighted(index),
            prevent_default: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn open(titles: &[&str]) -> Selection {
        let mut s = Selection::new();
        s.replace(
            titles
                .iter()
                .enumerate()
                .map(|(i, t)| Suggestion::new(i as u64 + 1, *t))
                .collect(),
        );
        s
    }

    #[test]
    fn starts_closed() {
        let s = Selection::new();
        assert_eq!(s.phase(), SelectionPhase::Closed);
        assert_eq!(s.raw_index(), -1);
    }

    #[test]
    fn arrows_wrap_in_both_directions() {
        let mut s = open(&["a", "b", "c"]);
        assert_eq!(s.phase(), SelectionPhase::OpenUnselected);

        assert_eq!(s.handle_key(Key::ArrowUp).action, KeyAction::Highlighted(2));
        assert_eq!(s.handle_key(Key::ArrowDown).action, KeyAction::Highlighted(0));
        assert_eq!(s.handle_key(Key::ArrowUp).action, KeyAction::Highlighted(2));
        assert_eq!(s.handle_key(Key::ArrowDown).action, KeyAction::Highlighted(0));
        assert_eq!(s.handle_key(Key::ArrowDown).action, KeyAction::Highlighted(1));
        assert_eq!(s.phase(), SelectionPhase::OpenSelected(1));
    }

    #[test]
    fn arrows_suppress_caret_movement_only_when_open() {
        let mut s = open(&["a"]);
        assert!(s.handle_key(Key::ArrowDown).prevent_default);

        let mut closed = Selection::new();
        let resp = closed.handle_key(Key::ArrowDown);
        assert_eq!(resp.action, KeyAction::Ignored);
        assert!(!resp.prevent_default);
        assert_eq!(closed.phase(), SelectionPhase::Closed);
    }

    #[test]
    fn enter_commits_highlighted_title_and_closes() {
        let mut s = open(&["Batman", "Batman Begins"]);
        s.handle_key(Key::ArrowDown);
        s.handle_key(Key::ArrowDown);
        let resp = s.handle_key(Key::Enter);
        match resp.action {
            KeyAction::CommitSuggestion(sug) => assert_eq!(sug.title, "Batman Begins"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.phase(), SelectionPhase::Closed);
    }

    #[test]
    fn enter_without_highlight_is_raw_commit() {
        let mut s = open(&["Batman"]);
        assert_eq!(s.handle_key(Key::Enter).action, KeyAction::CommitRaw);
        assert_eq!(s.phase(), SelectionPhase::Closed);

        let mut closed = Selection::new();
        assert_eq!(closed.handle_key(Key::Enter).action, KeyAction::CommitRaw);
    }

    #[test]
    fn fresh_list_clears_highlight() {
        let mut s = open(&["a", "b"]);
        s.handle_key(Key::ArrowDown);
        s.replace(vec![Suggestion::new(9, "z")]);
        assert_eq!(s.phase(), SelectionPhase::OpenUnselected);
        s.replace(Vec::new());
        assert_eq!(s.phase(), SelectionPhase::Closed);
    }

    fn key() -> impl Strategy<Value = Key> {
        prop_oneof![
            Just(Key::ArrowDown),
            Just(Key::ArrowUp),
            Just(Key::Enter),
            Just(Key::Other),
        ]
    }

    proptest! {
        #[test]
        fn index_stays_in_domain(len in 0usize..7, keys in proptest::collection::vec(key(), 0..40)) {
            let titles: Vec<String> = (0..len).map(|i| format!("t{i}")).collect();
            let refs: Vec<&str> = titles.iter().map(String::as_str).collect();
            let mut s = open(&refs);
            for k in keys {
                s.handle_key(k);
                match s.index() {
                    Some(i) => prop_assert!(i < s.suggestions().len()),
                    None => prop_assert_eq!(s.raw_index(), -1),
                }
            }
        }
    }
}
