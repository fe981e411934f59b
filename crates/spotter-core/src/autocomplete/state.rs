use super::option::AutocompleteOption;

/// Mutable session of one autocomplete instance.
///
/// `highlighted` is `None` when nothing is highlighted and otherwise always
/// indexes into `options`. The list counts as open only while `options` is
/// non-empty.
#[derive(Debug, Clone)]
pub struct SessionState<T> {
    pub(crate) text: String,
    pub(crate) options: Vec<AutocompleteOption<T>>,
    pub(crate) is_open: bool,
    pub(crate) is_loading: bool,
    pub(crate) highlighted: Option<usize>,
}

impl<T> SessionState<T> {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
            is_open: false,
            is_loading: false,
            highlighted: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Query length in characters, the unit `min_chars` is measured in.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn options(&self) -> &[AutocompleteOption<T>] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.is_open && !self.options.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_option(&self) -> Option<&AutocompleteOption<T>> {
        self.highlighted.and_then(|i| self.options.get(i))
    }

    pub(crate) fn replace_options(&mut self, options: Vec<AutocompleteOption<T>>) {
        self.options = options;
        self.highlighted = None;
        self.is_open = !self.options.is_empty();
    }

    pub(crate) fn clear_options(&mut self) {
        self.options.clear();
        self.highlighted = None;
        self.is_open = false;
    }

    /// Close the list and drop the highlight; options stay cached.
    pub(crate) fn close(&mut self) {
        self.is_open = false;
        self.highlighted = None;
    }

    pub(crate) fn highlight_next(&mut self) {
        let last = match self.options.len() {
            0 => return,
            n => n - 1,
        };
        self.highlighted = Some(match self.highlighted {
            None => 0,
            Some(i) => (i + 1).min(last),
        });
    }

    /// Moving up from the first option leaves nothing highlighted.
    pub(crate) fn highlight_prev(&mut self) {
        self.highlighted = match self.highlighted {
            None | Some(0) => None,
            Some(i) => Some(i - 1),
        };
    }

    pub(crate) fn highlight(&mut self, index: usize) {
        if index < self.options.len() {
            self.highlighted = Some(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_options(n: usize) -> SessionState<()> {
        let mut state = SessionState::new("LA");
        state.replace_options(
            (0..n)
                .map(|i| AutocompleteOption::new(format!("V{i}"), format!("Label {i}")))
                .collect(),
        );
        state
    }

    #[test]
    fn test_replace_options_opens_and_resets_highlight() {
        let mut state = with_options(2);
        state.highlight(1);
        state.replace_options(vec![AutocompleteOption::new("X", "X")]);
        assert!(state.is_open());
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_empty_options_never_open() {
        let mut state = with_options(0);
        state.is_open = true;
        assert!(!state.is_open());
    }

    #[test]
    fn test_highlight_is_clamped() {
        let mut state = with_options(2);
        for _ in 0..5 {
            state.highlight_next();
        }
        assert_eq!(state.highlighted(), Some(1));
        for _ in 0..5 {
            state.highlight_prev();
        }
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_highlight_out_of_range_ignored() {
        let mut state = with_options(2);
        state.highlight(7);
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_text_len_counts_chars() {
        let state: SessionState<()> = SessionState::new("Zü");
        assert_eq!(state.text_len(), 2);
    }
}
