// Copyright 2025 Cowboy AI, LLC.

//! Error types for narrative scenarios
//!
//! Every variant is fatal to the running scenario. Setup and authoring
//! defects (missing personas, missing entity setters, missing steps) carry the
//! names needed to fix them without reading the dispatch code.

use thiserror::Error;

/// Errors that can occur while narrating and dispatching a scenario
#[derive(Debug, Error)]
pub enum NarrativeError {
    /// No persona implementation is registered under the resolved type name
    #[error("Could not create instance of Persona with namespace {attempted}")]
    PersonaNotFound {
        /// Fully qualified type name that was looked up
        attempted: String,
    },

    /// The persona type could not be constructed
    #[error("Make sure the '{persona}' class has a parameterless constructor.")]
    PersonaConstruction {
        /// Simple name of the persona type
        persona: String,
        /// Why construction failed
        #[source]
        source: anyhow::Error,
    },

    /// The entity could not be handed to the persona implementation
    #[error(
        "Could not set the '{entity}' entity for the '{persona}' persona implementation. \
         Check you have a public property 'public {entity} {entity} {{ get; set; }}' in the '{persona}' class."
    )]
    EntityInjection {
        /// Runtime type name of the entity
        entity: String,
        /// Simple name of the persona type
        persona: String,
    },

    /// No step method exists for the operation
    #[error(
        "There was a problem calling '{operation}' in the '{persona}' persona implementation of the '{entity}' entity. \
         Make sure the '{persona}' persona implementation implements the '{entity}' entity interface including the '{operation}' method."
    )]
    StepNotImplemented {
        /// Operation that was looked up
        operation: String,
        /// Simple name of the persona type
        persona: String,
        /// Type name the step is qualified with
        entity: String,
    },

    /// The step method exists but signalled that it is unfinished
    #[error("Pending implementation I{entity}.{operation} in the {persona} class.")]
    PendingImplementation {
        /// Runtime type name of the entity
        entity: String,
        /// Operation that was invoked
        operation: String,
        /// Fully qualified persona type name
        persona: String,
    },

    /// The scenario title could not be discovered from the calling test
    #[error(
        "When trying to render test behaviour to console, could not find test method (by marker named {markers})"
    )]
    NoTestContextFound {
        /// Marker names that were searched for
        markers: String,
    },

    /// A step was issued before `as_persona`
    #[error("No persona designated before '{step}' step; call as_persona first")]
    NoPersonaDesignated {
        /// Label of the offending step
        step: String,
    },

    /// A persona type name could not be parsed
    #[error("Invalid persona type name: {0}")]
    InvalidPersonaType(String),

    /// Configuration could not be read
    #[error("Configuration error: {0}")]
    Config(String),

    /// The step body failed; the failure is passed through untouched
    #[error(transparent)]
    StepFailed(anyhow::Error),
}

/// Result type for narrative operations
pub type NarrativeResult<T> = Result<T, NarrativeError>;

impl From<serde_json::Error> for NarrativeError {
    fn from(err: serde_json::Error) -> Self {
        NarrativeError::Config(err.to_string())
    }
}

impl NarrativeError {
    /// Check if the step exists but is not finished yet
    pub fn is_pending(&self) -> bool {
        matches!(self, NarrativeError::PendingImplementation { .. })
    }

    /// Check if the step has never been written
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, NarrativeError::StepNotImplemented { .. })
    }

    /// Check if this error reflects persona wiring rather than the scenario itself
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            NarrativeError::PersonaNotFound { .. }
                | NarrativeError::PersonaConstruction { .. }
                | NarrativeError::EntityInjection { .. }
                | NarrativeError::NoTestContextFound { .. }
                | NarrativeError::NoPersonaDesignated { .. }
                | NarrativeError::InvalidPersonaType(_)
                | NarrativeError::Config(_)
        )
    }

    /// Recover the step body's own error, if this is a pass-through failure
    pub fn into_step_failure(self) -> Option<anyhow::Error> {
        match self {
            NarrativeError::StepFailed(err) => Some(err),
            _ => None,
        }
    }
}
