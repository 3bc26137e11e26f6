//! Flow position - where a conversation is in the section sequence.

use serde::{Deserialize, Serialize};

use crate::domain::cv::Section;
use crate::domain::foundation::StateMachine;

/// One state per catalog section plus the terminal `Complete` state.
///
/// Transitions:
/// - `Active(s)` → `Active(s)` (repeatable entry accepted, or input rejected)
/// - `Active(s)` → `Active(s.next())` (section satisfied)
/// - `Active(last)` → `Complete`
/// - `Complete` has no outgoing transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowPosition {
    Active(Section),
    Complete,
}

impl FlowPosition {
    /// Position of a brand new conversation.
    pub fn initial() -> Self {
        Self::Active(Section::first())
    }

    /// Maps the persisted `current_section` (null means complete).
    pub fn from_current_section(section: Option<Section>) -> Self {
        match section {
            Some(s) => Self::Active(s),
            None => Self::Complete,
        }
    }

    /// The persisted form of this position.
    pub fn current_section(&self) -> Option<Section> {
        match self {
            Self::Active(s) => Some(*s),
            Self::Complete => None,
        }
    }

    /// The position after the active section is satisfied.
    pub fn successor(&self) -> Self {
        match self {
            Self::Active(s) => s.next().map_or(Self::Complete, Self::Active),
            Self::Complete => Self::Complete,
        }
    }
}

impl Default for FlowPosition {
    fn default() -> Self {
        Self::initial()
    }
}

impl StateMachine for FlowPosition {
    fn can_transition_to(&self, target: &Self) -> bool {
        match self {
            Self::Active(_) => target == self || *target == self.successor(),
            Self::Complete => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Active(_) => vec![*self, self.successor()],
            Self::Complete => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_position_is_first_section() {
        assert_eq!(FlowPosition::initial(), FlowPosition::Active(Section::PersonalInfo));
        assert_eq!(FlowPosition::default(), FlowPosition::initial());
    }

    #[test]
    fn successor_of_last_section_is_complete() {
        assert_eq!(
            FlowPosition::Active(Section::References).successor(),
            FlowPosition::Complete
        );
    }

    #[test]
    fn can_stay_or_advance_but_not_skip_ahead() {
        let pos = FlowPosition::Active(Section::Summary);
        assert!(pos.can_transition_to(&pos));
        assert!(pos.can_transition_to(&FlowPosition::Active(Section::Education)));
        assert!(!pos.can_transition_to(&FlowPosition::Active(Section::Skills)));
        assert!(!pos.can_transition_to(&FlowPosition::Active(Section::PersonalInfo)));
    }

    #[test]
    fn complete_is_terminal() {
        assert!(FlowPosition::Complete.is_terminal());
        assert!(!FlowPosition::initial().is_terminal());
        assert!(FlowPosition::Complete
            .transition_to(FlowPosition::initial())
            .is_err());
    }

    #[test]
    fn maps_to_and_from_current_section() {
        assert_eq!(FlowPosition::from_current_section(None), FlowPosition::Complete);
        let pos = FlowPosition::from_current_section(Some(Section::Skills));
        assert_eq!(pos.current_section(), Some(Section::Skills));
    }
}
