use std::time::Duration;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);
pub const DEFAULT_MIN_CHARS: usize = 2;

/// Per-instance settings of an [`Autocomplete`](super::Autocomplete).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteProps {
    /// Externally controlled initial text.
    pub value: String,
    pub placeholder: String,
    pub label: Option<String>,
    pub required: bool,
    /// Quiet period after the last keystroke before a lookup is dispatched.
    pub debounce: Duration,
    /// Queries shorter than this (in characters) never reach the source.
    pub min_chars: usize,
    pub disabled: bool,
}

impl AutocompleteProps {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            placeholder: String::new(),
            label: None,
            required: false,
            debounce: DEFAULT_DEBOUNCE,
            min_chars: DEFAULT_MIN_CHARS,
            disabled: false,
        }
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars = min_chars;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl Default for AutocompleteProps {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = AutocompleteProps::new("LPPT");
        assert_eq!(props.value, "LPPT");
        assert_eq!(props.debounce, Duration::from_millis(500));
        assert_eq!(props.min_chars, 2);
        assert!(props.placeholder.is_empty());
        assert!(props.label.is_none());
        assert!(!props.required);
        assert!(!props.disabled);
    }
}
