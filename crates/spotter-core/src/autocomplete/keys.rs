//! Keyboard transitions of the result list, as a lookup table.

/// Keys the controller reacts to. Everything else belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Escape,
}

/// Whether the result list is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    Always,
    /// The current text is at least `min_chars` long.
    QueryLongEnough,
    /// Something is highlighted and it is not the last option, or nothing is.
    BeforeLast,
    AtLast,
    Highlighted,
    NothingHighlighted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Dispatch a lookup for the current text now, skipping the debounce.
    LookupNow,
    HighlightNext,
    HighlightPrev,
    SelectHighlighted,
    Close,
    /// Handled, but nothing changes.
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub phase: Phase,
    pub key: NavKey,
    pub guard: Guard,
    pub action: Action,
}

const fn row(phase: Phase, key: NavKey, guard: Guard, action: Action) -> Transition {
    Transition {
        phase,
        key,
        guard,
        action,
    }
}

/// Rows are tried in order; the first whose phase, key and guard match wins.
/// No matching row means the key is not handled.
///
/// ArrowDown stops at the last option while ArrowUp walks back past the
/// first one to "nothing highlighted".
pub const TRANSITIONS: &[Transition] = &[
    row(Phase::Closed, NavKey::ArrowDown, Guard::QueryLongEnough, Action::LookupNow),
    row(Phase::Open, NavKey::ArrowDown, Guard::BeforeLast, Action::HighlightNext),
    row(Phase::Open, NavKey::ArrowDown, Guard::AtLast, Action::Noop),
    row(Phase::Open, NavKey::ArrowUp, Guard::Highlighted, Action::HighlightPrev),
    row(Phase::Open, NavKey::ArrowUp, Guard::NothingHighlighted, Action::Noop),
    row(Phase::Open, NavKey::Enter, Guard::Highlighted, Action::SelectHighlighted),
    row(Phase::Open, NavKey::Enter, Guard::NothingHighlighted, Action::Noop),
    row(Phase::Open, NavKey::Escape, Guard::Always, Action::Close),
];

/// What the guards get to look at.
#[derive(Debug, Clone, Copy)]
pub struct GuardInput {
    pub text_len: usize,
    pub min_chars: usize,
    pub highlighted: Option<usize>,
    pub option_count: usize,
}

impl Guard {
    pub fn holds(self, input: &GuardInput) -> bool {
        match self {
            Guard::Always => true,
            Guard::QueryLongEnough => input.text_len >= input.min_chars,
            Guard::BeforeLast => match input.highlighted {
                None => input.option_count > 0,
                Some(i) => i + 1 < input.option_count,
            },
            Guard::AtLast => {
                input.option_count > 0 && input.highlighted == Some(input.option_count - 1)
            }
            Guard::Highlighted => input.highlighted.is_some(),
            Guard::NothingHighlighted => input.highlighted.is_none(),
        }
    }
}

pub fn dispatch(phase: Phase, key: NavKey, input: &GuardInput) -> Option<Action> {
    TRANSITIONS
        .iter()
        .find(|t| t.phase == phase && t.key == key && t.guard.holds(input))
        .map(|t| t.action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(highlighted: Option<usize>, option_count: usize) -> GuardInput {
        GuardInput {
            text_len: 3,
            min_chars: 2,
            highlighted,
            option_count,
        }
    }

    #[test]
    fn test_closed_arrow_down_needs_long_enough_query() {
        let short = GuardInput {
            text_len: 1,
            ..input(None, 0)
        };
        assert_eq!(dispatch(Phase::Closed, NavKey::ArrowDown, &short), None);
        assert_eq!(
            dispatch(Phase::Closed, NavKey::ArrowDown, &input(None, 0)),
            Some(Action::LookupNow)
        );
    }

    #[test]
    fn test_closed_ignores_other_keys() {
        for key in [NavKey::ArrowUp, NavKey::Enter, NavKey::Escape] {
            assert_eq!(dispatch(Phase::Closed, key, &input(None, 3)), None);
        }
    }

    #[test]
    fn test_arrow_down_clamps_at_last() {
        assert_eq!(
            dispatch(Phase::Open, NavKey::ArrowDown, &input(None, 2)),
            Some(Action::HighlightNext)
        );
        assert_eq!(
            dispatch(Phase::Open, NavKey::ArrowDown, &input(Some(0), 2)),
            Some(Action::HighlightNext)
        );
        assert_eq!(
            dispatch(Phase::Open, NavKey::ArrowDown, &input(Some(1), 2)),
            Some(Action::Noop)
        );
    }

    #[test]
    fn test_arrow_up_returns_to_nothing() {
        assert_eq!(
            dispatch(Phase::Open, NavKey::ArrowUp, &input(Some(0), 2)),
            Some(Action::HighlightPrev)
        );
        assert_eq!(
            dispatch(Phase::Open, NavKey::ArrowUp, &input(None, 2)),
            Some(Action::Noop)
        );
    }

    #[test]
    fn test_enter_selects_only_with_highlight() {
        assert_eq!(
            dispatch(Phase::Open, NavKey::Enter, &input(Some(1), 2)),
            Some(Action::SelectHighlighted)
        );
        assert_eq!(
            dispatch(Phase::Open, NavKey::Enter, &input(None, 2)),
            Some(Action::Noop)
        );
    }

    #[test]
    fn test_escape_closes() {
        assert_eq!(
            dispatch(Phase::Open, NavKey::Escape, &input(Some(1), 2)),
            Some(Action::Close)
        );
    }

    #[test]
    fn test_every_open_key_is_handled() {
        let keys = [NavKey::ArrowDown, NavKey::ArrowUp, NavKey::Enter, NavKey::Escape];
        for highlighted in [None, Some(0), Some(2)] {
            for key in keys {
                assert!(
                    dispatch(Phase::Open, key, &input(highlighted, 3)).is_some(),
                    "{key:?} with {highlighted:?} fell through"
                );
            }
        }
    }
}
