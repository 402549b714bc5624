// Copyright 2025 Cowboy AI, LLC.

//! Domain commands for narrated steps
//!
//! A command pairs an intended zero-argument operation with the entity it
//! acts on. It is built right before a step call and consumed by the
//! dispatcher; nothing retains it afterwards.

use std::any::Any;
use std::fmt;

use crate::entity::DomainEntity;

/// Separator marking the `verb_object` form of an operation name
pub const VERB_OBJECT_SEPARATOR: char = '_';

/// An operation bound to the entity instance it acts on
pub struct DomainCommand {
    operation: String,
    entity: Box<dyn Any>,
    entity_type: &'static str,
    declared_type: String,
    display_name: String,
}

impl DomainCommand {
    /// Bind `operation` to `entity`
    ///
    /// ```rust
    /// use cim_narrative::{DomainCommand, DomainEntity};
    ///
    /// struct Credentials;
    /// impl DomainEntity for Credentials {}
    ///
    /// let command = DomainCommand::new(Credentials, "submit_credentials");
    /// assert_eq!(command.entity_type(), "Credentials");
    /// assert_eq!(command.narration(), "submit Credentials credentials");
    /// ```
    pub fn new<E: DomainEntity>(entity: E, operation: impl Into<String>) -> Self {
        let display_name = entity.display_name();
        Self {
            operation: operation.into(),
            entity_type: E::type_name(),
            declared_type: E::type_name().to_string(),
            display_name,
            entity: Box::new(entity),
        }
    }

    /// Qualify step lookups with a declared type other than the runtime type,
    /// e.g. the interface-style name a persona implements the step under
    pub fn declared_as(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = declared_type.into();
        self
    }

    /// Intended operation name
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Runtime type name of the entity
    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    /// Type name used for qualified step lookups
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Entity name shown in the transcript
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Unformatted narration text for this command
    ///
    /// In `verb_object` form every separator is replaced by the entity's
    /// display name; otherwise the display name follows the operation.
    pub fn narration(&self) -> String {
        if self.operation.contains(VERB_OBJECT_SEPARATOR) {
            self.operation
                .replace(VERB_OBJECT_SEPARATOR, &format!(" {} ", self.display_name))
        } else {
            format!("{} {}", self.operation, self.display_name)
        }
    }

    /// Hand the entity over to the dispatcher
    pub(crate) fn into_entity(self) -> Box<dyn Any> {
        self.entity
    }
}

impl fmt::Debug for DomainCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainCommand")
            .field("operation", &self.operation)
            .field("entity_type", &self.entity_type)
            .field("declared_type", &self.declared_type)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}
