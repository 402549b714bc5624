// Copyright 2025 Cowboy AI, LLC.

//! # CIM Narrative
//!
//! Narrative Given/When/Then scenarios over domain entities, performed by
//! personas.
//!
//! A scenario is written as a fluent chain of small domain commands. Each
//! step is resolved at run time to the persona implementation of whoever is
//! currently acting, the entity is handed to that implementation, the step
//! body runs, and a readable transcript is printed:
//!
//! ```text
//! I Want To Log In
//!   So that users can access their account
//!        As Customer
//!     Given submit Credentials credentials
//!      When sign Credentials in
//! ```
//!
//! ## Building blocks
//!
//! - **Persona**: a role marker (`Customer`) selecting who performs steps
//! - **PersonaRegistry**: explicit registration of persona implementations,
//!   their entity setters and step bodies
//! - **DomainCommand**: an operation bound to the entity it acts on
//! - **Behaviour**: the fluent `as_persona`/`given`/`when`/`then` surface
//! - **Scenario**: opens the transcript and creates the `Behaviour`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use cim_narrative::{DomainCommand, DomainEntity, Persona, PersonaRegistry, Scenario, TranscriptRecorder};
//!
//! struct Credentials;
//! impl DomainEntity for Credentials {}
//!
//! #[derive(Default)]
//! struct Customer {
//!     credentials: Option<Credentials>,
//! }
//! impl Persona for Customer {}
//!
//! let mut registry = PersonaRegistry::new();
//! registry
//!     .persona::<Customer>()
//!     .default_constructor()
//!     .entity(|customer: &mut Customer, credentials: Credentials| customer.credentials = Some(credentials))
//!     .step("submit_credentials", |customer| {
//!         assert!(customer.credentials.is_some());
//!         Ok(())
//!     });
//!
//! let transcript = TranscriptRecorder::new();
//! let mut behaviour = Scenario::new(Arc::new(registry))
//!     .narrator(transcript.clone())
//!     .titled("should_log_in")
//!     .so_that("users can access their account")?;
//!
//! behaviour
//!     .as_persona(&Customer::default())?
//!     .given(DomainCommand::new(Credentials, "submit_credentials"))?;
//!
//! assert_eq!(transcript.lines()[3], "    Given submit Credentials credentials");
//! # Ok::<(), cim_narrative::NarrativeError>(())
//! ```
//!
//! ## Constraints
//!
//! Scenarios are single-threaded and synchronous: every step, including the
//! steps of a setter block, completes before the next begins. The layer
//! qualifier is fixed per session when it is created.

#![warn(missing_docs)]

mod behaviour;
mod commands;
mod config;
mod dispatch;
mod entity;
mod errors;
mod narration;
mod persona;
mod persona_type;
mod readable;
mod registry;
mod step;
pub mod scenario;
pub mod state_machine;

pub use behaviour::{Behaviour, StepLabel};
pub use commands::{DomainCommand, VERB_OBJECT_SEPARATOR};
pub use config::{ScenarioConfig, ENV_NARRATE, ENV_TARGET_LAYER};
pub use dispatch::{Dispatcher, TRANSCRIPT_TARGET};
pub use entity::{short_type_name, DomainEntity};
pub use errors::{NarrativeError, NarrativeResult};
pub use narration::{ConsoleNarrator, Narrator, TranscriptRecorder};
pub use persona::{Persona, PersonaResolver};
pub use persona_type::PersonaType;
pub use readable::{expand_to_readable, lower_first, pad_label, to_pascal_case, upper_first, LABEL_WIDTH};
pub use registry::{PersonaBuilder, PersonaRegistry, StepVisibility};
pub use scenario::{
    scenario_title, ExplicitTestName, Scenario, TestContext, ThreadTestContext,
    DISALLOWED_PREFIXES, INTENT_PREFIXES, TEST_MARKERS,
};
pub use state_machine::{BehaviourState, State};
pub use step::{pending, StepError, StepResult};
