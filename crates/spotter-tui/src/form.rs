/// Fields of the new-sighting form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Timestamp,
    Airport,
    Callsign,
    Location,
    Airline,
    Icao24,
    Registration,
    AircraftModel,
    Notes,
    Visibility,
}

impl FieldId {
    pub const ORDER: [FieldId; 10] = [
        FieldId::Timestamp,
        FieldId::Airport,
        FieldId::Callsign,
        FieldId::Location,
        FieldId::Airline,
        FieldId::Icao24,
        FieldId::Registration,
        FieldId::AircraftModel,
        FieldId::Notes,
        FieldId::Visibility,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldId::Timestamp => "Date & time",
            FieldId::Airport => "Airport",
            FieldId::Callsign => "Callsign",
            FieldId::Location => "Location",
            FieldId::Airline => "Airline",
            FieldId::Icao24 => "ICAO24",
            FieldId::Registration => "Registration",
            FieldId::AircraftModel => "Aircraft model",
            FieldId::Notes => "Notes",
            FieldId::Visibility => "Visibility",
        }
    }

    /// Backed by an autocomplete controller instead of a [`FormField`].
    pub fn is_autocomplete(self) -> bool {
        matches!(self, FieldId::Airport | FieldId::Callsign)
    }

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }
}

/// A plain single-line text input with a byte-offset caret.
#[derive(Debug, Clone, Default)]
pub struct FormField {
    pub value: String,
    pub cursor: usize,
}

impl FormField {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    /// Replace the whole value, caret at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.value[..self.cursor]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.value[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.value.len());
        }
    }

    /// Value with a block caret at the cursor position.
    pub fn with_caret(&self) -> String {
        let (before, after) = self.value.split_at(self.cursor);
        format!("{before}█{after}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_order_wraps() {
        assert_eq!(FieldId::Visibility.next(), FieldId::Timestamp);
        assert_eq!(FieldId::Timestamp.prev(), FieldId::Visibility);
        assert_eq!(FieldId::Airport.next(), FieldId::Callsign);
    }

    #[test]
    fn test_editing_multibyte() {
        let mut field = FormField::with_value("Sao");
        field.move_left();
        field.move_left();
        field.delete_back();
        field.insert_char('ã');
        assert_eq!(field.value, "ãao");
        field.move_right();
        assert_eq!(field.with_caret(), "ãa█o");
    }
}
