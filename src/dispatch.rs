// Copyright 2025 Cowboy AI, LLC.

//! Step dispatch
//!
//! Runs one narrated step against a persona implementation:
//!
//! 1. narrate the step (optional),
//! 2. construct a fresh persona instance,
//! 3. hand it the command's entity,
//! 4. find the step body (plain name, then `<Entity>.<operation>`),
//! 5. invoke it.
//!
//! Each stage fails with its own error so the transcript reader knows which
//! piece of persona wiring is missing. Instances are never reused across
//! steps.

use tracing::{debug, trace, warn};

use crate::commands::DomainCommand;
use crate::errors::{NarrativeError, NarrativeResult};
use crate::narration::Narrator;
use crate::persona_type::PersonaType;
use crate::readable::{expand_to_readable, pad_label};
use crate::registry::PersonaRegistry;
use crate::step::StepError;

/// Tracing target of narrated transcript lines
pub const TRANSCRIPT_TARGET: &str = "cim_narrative::transcript";

/// Dispatches domain commands to persona implementations
#[derive(Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a PersonaRegistry,
    narrator: &'a dyn Narrator,
}

impl<'a> Dispatcher<'a> {
    /// Dispatcher over `registry`, narrating to `narrator`
    pub fn new(registry: &'a PersonaRegistry, narrator: &'a dyn Narrator) -> Self {
        Self { registry, narrator }
    }

    /// Transcript line for `command` under `label`
    pub fn narration_line(label: &str, command: &DomainCommand) -> String {
        expand_to_readable(&format!("{}{}", pad_label(label), command.narration()))
    }

    /// Run `command` as `persona`
    pub fn dispatch(
        &self,
        label: &str,
        command: DomainCommand,
        persona: &PersonaType,
        narrate: bool,
    ) -> NarrativeResult<()> {
        if narrate {
            let line = Self::narration_line(label, &command);
            trace!(target: TRANSCRIPT_TARGET, "{line}");
            self.narrator.write_line(&line);
        }

        let operation = command.operation().to_string();
        let entity_type = command.entity_type();
        let declared_type = command.declared_type().to_string();
        debug!(
            persona = %persona.qualified_name(),
            entity = entity_type,
            operation = %operation,
            "Dispatching step"
        );

        let construction_failure = |source: anyhow::Error| NarrativeError::PersonaConstruction {
            persona: persona.name().to_string(),
            source,
        };
        let implementation = self.registry.implementation(persona).ok_or_else(|| {
            construction_failure(anyhow::anyhow!(
                "{} is not a registered persona type",
                persona.qualified_name()
            ))
        })?;
        let mut instance = implementation.instantiate().map_err(construction_failure)?;

        if !implementation.inject(instance.as_mut(), entity_type, command.into_entity()) {
            warn!(persona = %persona.qualified_name(), entity = entity_type, "No entity setter");
            return Err(NarrativeError::EntityInjection {
                entity: entity_type.to_string(),
                persona: persona.name().to_string(),
            });
        }

        let step = implementation
            .find_step(&operation, &declared_type)
            .ok_or_else(|| NarrativeError::StepNotImplemented {
                operation: operation.clone(),
                persona: persona.name().to_string(),
                entity: declared_type.clone(),
            })?;
        debug!(step = step.name(), "Invoking step");

        match step.invoke(instance.as_mut()) {
            Ok(()) => Ok(()),
            Err(StepError::Pending) => {
                warn!(persona = %persona.qualified_name(), operation = %operation, "Pending step");
                Err(NarrativeError::PendingImplementation {
                    entity: entity_type.to_string(),
                    operation,
                    persona: persona.qualified_name(),
                })
            }
            Err(StepError::Failed(err)) => Err(NarrativeError::StepFailed(err)),
        }
    }
}
