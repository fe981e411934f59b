use serde::{Deserialize, Serialize};

/// One selectable lookup result.
///
/// `value` is the canonical identifier handed to the selection callback and
/// must be unique within one batch; `label` is what the list shows and what
/// the input takes on selection. `data` is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutocompleteOption<T = serde_json::Value> {
    pub value: String,
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sublabel: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> AutocompleteOption<T> {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            sublabel: None,
            data: None,
        }
    }

    pub fn with_sublabel(mut self, sublabel: impl Into<String>) -> Self {
        self.sublabel = Some(sublabel.into());
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }
}
