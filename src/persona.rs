// Copyright 2025 Cowboy AI, LLC.

//! Personas and persona resolution
//!
//! A persona role (`Customer`, `Administrator`, ...) selects who performs the
//! following steps. The resolver turns the role into the concrete
//! implementation type for the session's layer qualifier.

use tracing::debug;

use crate::errors::{NarrativeError, NarrativeResult};
use crate::persona_type::PersonaType;
use crate::readable::expand_to_readable;
use crate::registry::PersonaRegistry;

/// A named role marker
///
/// The role's own type is the persona implementation when no layer qualifier
/// is in use.
///
/// ```rust
/// use cim_narrative::{Persona, PersonaType};
///
/// #[derive(Default)]
/// struct SalesManager;
/// impl Persona for SalesManager {}
///
/// assert_eq!(SalesManager.name(), "Sales Manager");
/// assert_eq!(SalesManager.persona_type(), PersonaType::of::<SalesManager>());
/// ```
pub trait Persona: 'static {
    /// Name shown after `As` in the transcript
    fn name(&self) -> String
    where
        Self: Sized,
    {
        expand_to_readable(PersonaType::of::<Self>().name())
    }

    /// The role's own implementation type
    fn persona_type(&self) -> PersonaType
    where
        Self: Sized,
    {
        PersonaType::of::<Self>()
    }
}

/// Resolves persona roles against a registry
#[derive(Debug, Clone, Copy)]
pub struct PersonaResolver<'r> {
    registry: &'r PersonaRegistry,
}

impl<'r> PersonaResolver<'r> {
    /// Resolver over the given type universe
    pub fn new(registry: &'r PersonaRegistry) -> Self {
        Self { registry }
    }

    /// Concrete implementation type of `role` in `layer`
    ///
    /// Without a layer the role's own type is returned as-is, even when it
    /// is not registered; instantiation reports that case. With a layer the
    /// substituted type must be registered, else `PersonaNotFound` carries
    /// the attempted name.
    pub fn resolve<P: Persona>(&self, role: &P, layer: Option<&str>) -> NarrativeResult<PersonaType> {
        self.resolve_type(role.persona_type(), layer)
    }

    /// As [`resolve`](Self::resolve), starting from a role's type
    pub fn resolve_type(&self, role_type: PersonaType, layer: Option<&str>) -> NarrativeResult<PersonaType> {
        let Some(layer) = layer else {
            return Ok(role_type);
        };

        let target = role_type.in_layer(layer);
        match self.registry.find_type(&target) {
            Some(found) => {
                debug!(role = %role_type.qualified_name(), layer, persona = %found.qualified_name(), "Resolved persona layer");
                Ok(found.clone())
            }
            None => Err(NarrativeError::PersonaNotFound {
                attempted: target.to_string(),
            }),
        }
    }
}
