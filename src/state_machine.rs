// Copyright 2025 Cowboy AI, LLC.

//! States of a behaviour session
//!
//! ```text
//! Uninitialized --as--> PersonaActive <--setter--> SettingState
//! ```
//!
//! `SettingState` may nest (a setter block issuing another setter step);
//! leaving it returns to whatever state was current when it was entered.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// Trait for types that can be used as states in a state machine
pub trait State: Debug + Clone + PartialEq + Eq + Send + Sync {
    /// Get the name of this state for logging/debugging
    fn name(&self) -> &'static str;

    /// Check if this is a terminal state
    fn is_terminal(&self) -> bool {
        false
    }

    /// Check if the machine may move from this state to `target`
    fn can_transition_to(&self, target: &Self) -> bool;
}

/// Lifecycle of a [`Behaviour`](crate::Behaviour)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviourState {
    /// No persona designated yet
    Uninitialized,
    /// A persona is designated and steps are narrated
    PersonaActive,
    /// Inside a setter block: narration suppressed, persona restored on exit
    SettingState,
}

impl BehaviourState {
    /// Check if ordinary steps may be dispatched in this state
    pub fn accepts_steps(&self) -> bool {
        !matches!(self, BehaviourState::Uninitialized)
    }
}

impl State for BehaviourState {
    fn name(&self) -> &'static str {
        match self {
            BehaviourState::Uninitialized => "Uninitialized",
            BehaviourState::PersonaActive => "PersonaActive",
            BehaviourState::SettingState => "SettingState",
        }
    }

    fn can_transition_to(&self, target: &Self) -> bool {
        use BehaviourState::*;
        matches!(
            (self, target),
            (Uninitialized, PersonaActive)
                | (Uninitialized, SettingState)
                | (PersonaActive, PersonaActive)
                | (PersonaActive, SettingState)
                | (SettingState, SettingState)
                | (SettingState, PersonaActive)
                | (SettingState, Uninitialized)
        )
    }
}
