//! Closed vocabularies: actions, node kinds and semantic roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ACTIONS
// ============================================================================

/// Every command the translator recognizes.
///
/// The set is closed so that the matcher and renderer can `match`
/// exhaustively; adding an action is a compile-time visible change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Toggle,
    Add,
    Remove,
    Show,
    Hide,
    Set,
    Get,
    Put,
    Append,
    Take,
    Increment,
    Decrement,
    Log,
    Send,
    Trigger,
    Wait,
    Transition,
    Go,
    Call,
    Focus,
    Blur,
    Return,
    Fetch,
    Ask,
    /// Event handler: `on click toggle .active`
    On,
    /// Multiple chained steps
    Compound,
}

impl Action {
    /// All actions in declaration order.
    pub const ALL: [Action; 26] = [
        Action::Toggle,
        Action::Add,
        Action::Remove,
        Action::Show,
        Action::Hide,
        Action::Set,
        Action::Get,
        Action::Put,
        Action::Append,
        Action::Take,
        Action::Increment,
        Action::Decrement,
        Action::Log,
        Action::Send,
        Action::Trigger,
        Action::Wait,
        Action::Transition,
        Action::Go,
        Action::Call,
        Action::Focus,
        Action::Blur,
        Action::Return,
        Action::Fetch,
        Action::Ask,
        Action::On,
        Action::Compound,
    ];

    /// Canonical (English) name, also the explicit-notation spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::Toggle => "toggle",
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Show => "show",
            Action::Hide => "hide",
            Action::Set => "set",
            Action::Get => "get",
            Action::Put => "put",
            Action::Append => "append",
            Action::Take => "take",
            Action::Increment => "increment",
            Action::Decrement => "decrement",
            Action::Log => "log",
            Action::Send => "send",
            Action::Trigger => "trigger",
            Action::Wait => "wait",
            Action::Transition => "transition",
            Action::Go => "go",
            Action::Call => "call",
            Action::Focus => "focus",
            Action::Blur => "blur",
            Action::Return => "return",
            Action::Fetch => "fetch",
            Action::Ask => "ask",
            Action::On => "on",
            Action::Compound => "compound",
        }
    }

    /// Structural kind of nodes carrying this action.
    pub const fn kind(self) -> NodeKind {
        match self {
            Action::On => NodeKind::EventHandler,
            Action::Compound => NodeKind::Compound,
            _ => NodeKind::Command,
        }
    }

    /// Actions that have a surface keyword (everything except `compound`).
    pub fn keyworded() -> impl Iterator<Item = Action> {
        Self::ALL.into_iter().filter(|a| *a != Action::Compound)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known action or role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name: {}", self.0)
    }
}

impl std::error::Error for UnknownName {}

impl FromStr for Action {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == lower)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

// ============================================================================
// NODE KINDS
// ============================================================================

/// Structural category of a semantic node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Command,
    EventHandler,
    Conditional,
    Compound,
    Loop,
}

impl NodeKind {
    /// Kinds whose nodes carry nested steps in `body`.
    pub const fn has_body(self) -> bool {
        !matches!(self, NodeKind::Command)
    }
}

// ============================================================================
// ROLES
// ============================================================================

/// Semantic slot filled by a value within a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Destination,
    Source,
    Manner,
    Quantity,
    Duration,
    Event,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Patient,
        Role::Destination,
        Role::Source,
        Role::Manner,
        Role::Quantity,
        Role::Duration,
        Role::Event,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Destination => "destination",
            Role::Source => "source",
            Role::Manner => "manner",
            Role::Quantity => "quantity",
            Role::Duration => "duration",
            Role::Event => "event",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == lower)
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip() -> Result<(), UnknownName> {
        for action in Action::ALL {
            assert_eq!(action.as_str().parse::<Action>()?, action);
        }
        Ok(())
    }

    #[test]
    fn test_action_parse_is_case_insensitive() -> Result<(), UnknownName> {
        assert_eq!("Toggle".parse::<Action>()?, Action::Toggle);
        assert!("frobnicate".parse::<Action>().is_err());
        Ok(())
    }

    #[test]
    fn test_action_kinds() {
        assert_eq!(Action::On.kind(), NodeKind::EventHandler);
        assert_eq!(Action::Compound.kind(), NodeKind::Compound);
        assert_eq!(Action::Toggle.kind(), NodeKind::Command);
        assert!(Action::keyworded().all(|a| a != Action::Compound));
    }

    #[test]
    fn test_role_serde_names() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_string(&Role::Destination)?, "\"destination\"");
        assert_eq!(serde_json::from_str::<Role>("\"patient\"")?, Role::Patient);
        Ok(())
    }
}
