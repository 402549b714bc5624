// Copyright 2025 Cowboy AI, LLC.

//! The fluent Given/When/Then surface
//!
//! A [`Behaviour`] remembers who is acting (`as_persona`) and whether steps
//! are narrated. Every step is dispatched synchronously and independently;
//! a failing step stops the chain through `?`.
//!
//! Setter steps (`given_set`, `when_set`, `then_set`) compose several steps
//! into one narrated line: the label column is written, narration is
//! suppressed while the block runs, and the persona designated before the
//! block is restored afterwards, whether the block succeeded or not.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::commands::DomainCommand;
use crate::config::ScenarioConfig;
use crate::dispatch::{Dispatcher, TRANSCRIPT_TARGET};
use crate::errors::{NarrativeError, NarrativeResult};
use crate::narration::Narrator;
use crate::persona::{Persona, PersonaResolver};
use crate::persona_type::PersonaType;
use crate::readable::{expand_to_readable, lower_first, pad_label};
use crate::registry::PersonaRegistry;
use crate::state_machine::{BehaviourState, State};

/// Label of a narrated step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepLabel {
    /// Persona designation
    As,
    /// Precondition
    Given,
    /// Action
    When,
    /// Outcome
    Then,
}

impl StepLabel {
    /// Text shown in the label column
    pub fn as_str(&self) -> &'static str {
        match self {
            StepLabel::As => "As",
            StepLabel::Given => "Given",
            StepLabel::When => "When",
            StepLabel::Then => "Then",
        }
    }
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A running scenario
pub struct Behaviour {
    id: Uuid,
    registry: Arc<PersonaRegistry>,
    narrator: Arc<dyn Narrator>,
    target_layer: Option<String>,
    current_persona: Option<PersonaType>,
    session_narrate: bool,
    narrate: bool,
    label_open: bool,
    state: BehaviourState,
}

impl Behaviour {
    /// Start a session with no persona designated
    pub fn new(registry: Arc<PersonaRegistry>, narrator: Arc<dyn Narrator>, config: ScenarioConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry,
            narrator,
            target_layer: config.target_layer,
            current_persona: None,
            session_narrate: config.narrate,
            narrate: config.narrate,
            label_open: false,
            state: BehaviourState::Uninitialized,
        }
    }

    /// Identifier correlating this scenario's log events
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Persona type the next step is dispatched to
    pub fn current_persona(&self) -> Option<&PersonaType> {
        self.current_persona.as_ref()
    }

    /// Whether steps are currently narrated
    pub fn narration_enabled(&self) -> bool {
        self.narrate
    }

    /// Layer qualifier fixed at session creation
    pub fn target_layer(&self) -> Option<&str> {
        self.target_layer.as_deref()
    }

    /// Current lifecycle state
    pub fn state(&self) -> BehaviourState {
        self.state
    }

    /// Designate who performs the following steps
    pub fn as_persona<P: Persona>(&mut self, role: &P) -> NarrativeResult<&mut Self> {
        let resolved = PersonaResolver::new(&self.registry).resolve(role, self.target_layer.as_deref())?;
        debug!(scenario_id = %self.id, persona = %resolved.qualified_name(), "Persona designated");
        self.current_persona = Some(resolved);
        if self.state == BehaviourState::Uninitialized {
            self.transition(BehaviourState::PersonaActive);
        }
        if self.narrate {
            let line = expand_to_readable(&format!("{}{}", pad_label(StepLabel::As.as_str()), role.name()));
            self.narrate_line(&line);
        }
        Ok(self)
    }

    /// Dispatch a precondition step
    pub fn given(&mut self, command: DomainCommand) -> NarrativeResult<&mut Self> {
        self.step(StepLabel::Given, command)
    }

    /// Dispatch an action step
    pub fn when(&mut self, command: DomainCommand) -> NarrativeResult<&mut Self> {
        self.step(StepLabel::When, command)
    }

    /// Dispatch an outcome step
    pub fn then(&mut self, command: DomainCommand) -> NarrativeResult<&mut Self> {
        self.step(StepLabel::Then, command)
    }

    /// Precondition composed of silently dispatched steps
    ///
    /// ```rust,no_run
    /// # use cim_narrative::{Behaviour, DomainCommand, DomainEntity, NarrativeResult};
    /// # struct Account;
    /// # impl DomainEntity for Account {}
    /// fn registered_customer(set: &mut Behaviour) -> NarrativeResult<()> {
    ///     set.perform("registered_customer")
    ///         .given(DomainCommand::new(Account, "register"))?
    ///         .given(DomainCommand::new(Account, "activate"))?;
    ///     Ok(())
    /// }
    ///
    /// # fn run(behaviour: &mut Behaviour) -> NarrativeResult<()> {
    /// behaviour.given_set(registered_customer)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn given_set<F>(&mut self, block: F) -> NarrativeResult<&mut Self>
    where
        F: FnOnce(&mut Behaviour) -> NarrativeResult<()>,
    {
        self.step_set(StepLabel::Given, block)
    }

    /// Action composed of silently dispatched steps
    pub fn when_set<F>(&mut self, block: F) -> NarrativeResult<&mut Self>
    where
        F: FnOnce(&mut Behaviour) -> NarrativeResult<()>,
    {
        self.step_set(StepLabel::When, block)
    }

    /// Outcome composed of silently dispatched steps
    pub fn then_set<F>(&mut self, block: F) -> NarrativeResult<&mut Self>
    where
        F: FnOnce(&mut Behaviour) -> NarrativeResult<()>,
    {
        self.step_set(StepLabel::Then, block)
    }

    /// Narrate `step_name` as readable text with a lower-case first letter
    ///
    /// Written even while a setter block suppresses its steps, since it
    /// completes the label column the setter opened. Silent sessions write
    /// nothing.
    pub fn perform(&mut self, step_name: &str) -> &mut Self {
        if self.session_narrate {
            let text = lower_first(&expand_to_readable(step_name));
            self.narrate_line(&text);
        }
        self.label_open = false;
        self
    }

    fn step(&mut self, label: StepLabel, command: DomainCommand) -> NarrativeResult<&mut Self> {
        let persona = match (&self.current_persona, self.state.accepts_steps()) {
            (Some(persona), true) => persona.clone(),
            _ => {
                return Err(NarrativeError::NoPersonaDesignated {
                    step: label.to_string(),
                })
            }
        };
        trace!(scenario_id = %self.id, %label, operation = command.operation(), "Step");
        Dispatcher::new(&self.registry, self.narrator.as_ref()).dispatch(
            label.as_str(),
            command,
            &persona,
            self.narrate,
        )?;
        Ok(self)
    }

    fn step_set<F>(&mut self, label: StepLabel, block: F) -> NarrativeResult<&mut Self>
    where
        F: FnOnce(&mut Behaviour) -> NarrativeResult<()>,
    {
        let remembered_persona = self.current_persona.clone();
        let remembered_narrate = self.narrate;
        let remembered_state = self.state;

        let opens_label = self.narrate;
        if opens_label {
            self.narrator.write(&pad_label(label.as_str()));
            self.label_open = true;
        }
        self.narrate = false;
        self.transition(BehaviourState::SettingState);

        let outcome = block(self);

        // A label nobody completed must not prefix the next line.
        if opens_label && std::mem::take(&mut self.label_open) {
            self.narrator.write_line("");
        }
        self.current_persona = remembered_persona;
        self.narrate = remembered_narrate;
        self.transition(remembered_state);
        outcome.map(|()| self)
    }

    fn transition(&mut self, target: BehaviourState) {
        debug_assert!(
            self.state.can_transition_to(&target),
            "illegal transition {} -> {}",
            self.state.name(),
            target.name()
        );
        trace!(scenario_id = %self.id, from = self.state.name(), to = target.name(), "Behaviour state");
        self.state = target;
    }

    fn narrate_line(&self, line: &str) {
        trace!(target: TRANSCRIPT_TARGET, "{line}");
        self.narrator.write_line(line);
    }
}

impl fmt::Debug for Behaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behaviour")
            .field("id", &self.id)
            .field("target_layer", &self.target_layer)
            .field("current_persona", &self.current_persona)
            .field("session_narrate", &self.session_narrate)
            .field("narrate", &self.narrate)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::DomainEntity;
    use crate::narration::TranscriptRecorder;
    use pretty_assertions::assert_eq;

    struct Account;
    impl DomainEntity for Account {}

    #[derive(Default)]
    struct Customer {
        account: Option<Account>,
    }
    impl Persona for Customer {}

    #[derive(Default)]
    struct Administrator;
    impl Persona for Administrator {}

    fn session(recorder: &TranscriptRecorder) -> Behaviour {
        let mut registry = PersonaRegistry::new();
        registry
            .persona::<Customer>()
            .default_constructor()
            .entity(|customer: &mut Customer, account: Account| customer.account = Some(account))
            .step("open", |customer| {
                assert!(customer.account.is_some());
                Ok(())
            });
        registry
            .persona::<Administrator>()
            .default_constructor()
            .entity(|_: &mut Administrator, _: Account| {})
            .step("approve", |_| Ok(()));
        Behaviour::new(
            Arc::new(registry),
            Arc::new(recorder.clone()),
            ScenarioConfig::default(),
        )
    }

    #[test]
    fn steps_before_a_persona_are_usage_errors() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        assert_eq!(behaviour.state(), BehaviourState::Uninitialized);

        let err = behaviour.given(DomainCommand::new(Account, "open")).unwrap_err();
        assert!(matches!(err, NarrativeError::NoPersonaDesignated { ref step } if step == "Given"));
        assert!(recorder.lines().is_empty());
    }

    #[test]
    fn as_persona_activates_and_narrates() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        behaviour
            .as_persona(&Customer::default())
            .unwrap()
            .when(DomainCommand::new(Account, "open"))
            .unwrap();

        assert_eq!(behaviour.state(), BehaviourState::PersonaActive);
        assert_eq!(behaviour.current_persona(), Some(&PersonaType::of::<Customer>()));
        assert_eq!(recorder.lines(), vec!["       As Customer", "     When open Account"]);
    }

    #[test]
    fn setter_restores_persona_and_narration() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        behaviour.as_persona(&Customer::default()).unwrap();

        behaviour
            .given_set(|set| {
                assert!(!set.narration_enabled());
                assert_eq!(set.state(), BehaviourState::SettingState);
                set.perform("approved_account")
                    .as_persona(&Administrator)?
                    .given(DomainCommand::new(Account, "approve"))?;
                Ok(())
            })
            .unwrap();

        assert!(behaviour.narration_enabled());
        assert_eq!(behaviour.state(), BehaviourState::PersonaActive);
        assert_eq!(behaviour.current_persona(), Some(&PersonaType::of::<Customer>()));
        assert_eq!(
            recorder.lines(),
            vec!["       As Customer", "    Given approved account"]
        );
    }

    #[test]
    fn setter_restores_state_when_the_block_fails() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        behaviour.as_persona(&Customer::default()).unwrap();

        let err = behaviour
            .then_set(|set| {
                set.as_persona(&Administrator)?
                    .then(DomainCommand::new(Account, "close"))?;
                Ok(())
            })
            .unwrap_err();

        assert!(err.is_not_implemented());
        assert!(behaviour.narration_enabled());
        assert_eq!(behaviour.current_persona(), Some(&PersonaType::of::<Customer>()));
        assert_eq!(behaviour.state(), BehaviourState::PersonaActive);
    }

    #[test]
    fn unfinished_setter_label_does_not_leak_into_the_next_line() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        behaviour.as_persona(&Customer::default()).unwrap();

        behaviour
            .then_set(|set| {
                set.then(DomainCommand::new(Account, "close"))?;
                Ok(())
            })
            .unwrap_err();
        behaviour.when(DomainCommand::new(Account, "open")).unwrap();

        assert_eq!(recorder.pending(), "");
        assert_eq!(
            recorder.lines(),
            vec!["       As Customer", "     Then ", "     When open Account"]
        );
    }

    #[test]
    fn setter_before_a_persona_returns_to_uninitialized() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);

        behaviour
            .given_set(|set| {
                set.as_persona(&Administrator)?
                    .given(DomainCommand::new(Account, "approve"))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(behaviour.state(), BehaviourState::Uninitialized);
        assert!(behaviour.current_persona().is_none());
    }

    #[test]
    fn perform_lower_cases_the_first_letter() {
        let recorder = TranscriptRecorder::new();
        let mut behaviour = session(&recorder);
        behaviour.perform("RegisteredCustomer");
        assert_eq!(recorder.lines(), vec!["registered Customer"]);
    }

    #[test]
    fn narration_can_start_disabled() {
        let recorder = TranscriptRecorder::new();
        let mut registry = PersonaRegistry::new();
        registry.persona::<Administrator>().default_constructor();
        let config = ScenarioConfig {
            narrate: false,
            ..ScenarioConfig::default()
        };
        let mut behaviour = Behaviour::new(Arc::new(registry), Arc::new(recorder.clone()), config);

        behaviour.as_persona(&Administrator).unwrap();
        behaviour
            .given_set(|set| {
                set.perform("registered_customer");
                Ok(())
            })
            .unwrap();
        behaviour.perform("checked_out");
        assert_eq!(recorder.text(), "");
        assert!(!behaviour.narration_enabled());
    }
}
