// Copyright 2025 Cowboy AI, LLC.

//! Persona registry
//!
//! The registry is the type universe the dispatcher works against. Each
//! persona implementation is registered explicitly with:
//!
//! - a constructor (the parameterless way to get a fresh instance),
//! - one typed setter per entity type it accepts,
//! - its step bodies, keyed by operation name.
//!
//! Step names are plain (`submit_credentials`) or qualified with the entity
//! type they belong to (`Credentials.submit`), which lets one persona
//! implement same-named operations for different entities.
//!
//! ```rust
//! use cim_narrative::{DomainEntity, PersonaRegistry};
//!
//! struct Credentials;
//! impl DomainEntity for Credentials {}
//!
//! #[derive(Default)]
//! struct Visitor {
//!     credentials: Option<Credentials>,
//! }
//!
//! let mut registry = PersonaRegistry::new();
//! registry
//!     .persona::<Visitor>()
//!     .default_constructor()
//!     .entity(|visitor: &mut Visitor, credentials: Credentials| visitor.credentials = Some(credentials))
//!     .step("submit_credentials", |_visitor| Ok(()));
//!
//! assert_eq!(registry.len(), 1);
//! ```

use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::entity::DomainEntity;
use crate::persona_type::PersonaType;
use crate::step::{StepError, StepResult};

type Constructor = Arc<dyn Fn() -> anyhow::Result<Box<dyn Any>> + Send + Sync>;
type Injector = Arc<dyn Fn(&mut dyn Any, Box<dyn Any>) -> bool + Send + Sync>;
type StepBody = Arc<dyn Fn(&mut dyn Any) -> StepResult + Send + Sync>;

/// Who may find a step by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepVisibility {
    /// Found by its plain operation name
    Public,
    /// Only found by the qualified `<Entity>.<operation>` search
    Private,
}

pub(crate) struct StepMethod {
    name: String,
    visibility: StepVisibility,
    body: StepBody,
}

impl StepMethod {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn invoke(&self, persona: &mut dyn Any) -> StepResult {
        (self.body)(persona)
    }
}

/// Everything registered for one persona type
pub(crate) struct PersonaImplementation {
    persona_type: PersonaType,
    constructor: Option<Constructor>,
    injectors: IndexMap<String, Injector>,
    steps: IndexMap<String, StepMethod>,
}

impl PersonaImplementation {
    fn new(persona_type: PersonaType) -> Self {
        Self {
            persona_type,
            constructor: None,
            injectors: IndexMap::new(),
            steps: IndexMap::new(),
        }
    }

    /// Fresh instance through the registered constructor
    pub(crate) fn instantiate(&self) -> anyhow::Result<Box<dyn Any>> {
        match &self.constructor {
            Some(construct) => construct(),
            None => Err(anyhow::anyhow!(
                "no parameterless constructor registered for {}",
                self.persona_type.qualified_name()
            )),
        }
    }

    /// Hand `entity` to the setter declared for `entity_type`
    pub(crate) fn inject(&self, persona: &mut dyn Any, entity_type: &str, entity: Box<dyn Any>) -> bool {
        match self.injectors.get(entity_type) {
            Some(inject) => inject(persona, entity),
            None => false,
        }
    }

    /// Public step named exactly `operation`, else any step whose name ends
    /// with `<declared_type>.<operation>`, in registration order
    pub(crate) fn find_step(&self, operation: &str, declared_type: &str) -> Option<&StepMethod> {
        if let Some(step) = self
            .steps
            .get(operation)
            .filter(|step| step.visibility == StepVisibility::Public)
        {
            return Some(step);
        }
        let qualified = format!("{declared_type}.{operation}");
        self.steps.values().find(|step| step.name.ends_with(&qualified))
    }
}

/// Registry of persona implementations
#[derive(Default)]
pub struct PersonaRegistry {
    implementations: IndexMap<PersonaType, PersonaImplementation>,
}

impl PersonaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or extend) the persona implemented by the Rust type `P`
    pub fn persona<P: 'static>(&mut self) -> PersonaBuilder<'_, P> {
        self.persona_as(PersonaType::of::<P>())
    }

    /// Register (or extend) `P` under an explicit persona type name
    pub fn persona_as<P: 'static>(&mut self, persona_type: PersonaType) -> PersonaBuilder<'_, P> {
        let entry = self
            .implementations
            .entry(persona_type.clone())
            .or_insert_with(|| PersonaImplementation::new(persona_type));
        PersonaBuilder {
            entry,
            _persona: PhantomData,
        }
    }

    /// Look up a persona type in the type universe
    pub fn find_type(&self, persona_type: &PersonaType) -> Option<&PersonaType> {
        self.implementations
            .get(persona_type)
            .map(|implementation| &implementation.persona_type)
    }

    /// Check if a persona type is registered
    pub fn contains(&self, persona_type: &PersonaType) -> bool {
        self.implementations.contains_key(persona_type)
    }

    /// Registered persona types, in registration order
    pub fn persona_types(&self) -> impl Iterator<Item = &PersonaType> {
        self.implementations.keys()
    }

    /// Number of registered persona types
    pub fn len(&self) -> usize {
        self.implementations.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.implementations.is_empty()
    }

    pub(crate) fn implementation(&self, persona_type: &PersonaType) -> Option<&PersonaImplementation> {
        self.implementations.get(persona_type)
    }
}

impl fmt::Debug for PersonaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (persona_type, implementation) in &self.implementations {
            let steps: Vec<&str> = implementation.steps.keys().map(String::as_str).collect();
            map.entry(&persona_type.qualified_name(), &steps);
        }
        map.finish()
    }
}

/// Fluent registration of one persona implementation
pub struct PersonaBuilder<'r, P> {
    entry: &'r mut PersonaImplementation,
    _persona: PhantomData<fn() -> P>,
}

impl<'r, P: 'static> PersonaBuilder<'r, P> {
    /// Construct instances with `construct`
    pub fn constructor<F>(self, construct: F) -> Self
    where
        F: Fn() -> P + Send + Sync + 'static,
    {
        let constructor: Constructor =
            Arc::new(move || Ok::<_, anyhow::Error>(Box::new(construct()) as Box<dyn Any>));
        self.entry.constructor = Some(constructor);
        self
    }

    /// Construct instances with a constructor that may fail
    pub fn try_constructor<F, E>(self, construct: F) -> Self
    where
        F: Fn() -> Result<P, E> + Send + Sync + 'static,
        E: Into<anyhow::Error>,
    {
        let constructor: Constructor = Arc::new(move || {
            construct()
                .map(|persona| Box::new(persona) as Box<dyn Any>)
                .map_err(Into::<anyhow::Error>::into)
        });
        self.entry.constructor = Some(constructor);
        self
    }

    /// Construct instances with `P::default()`
    pub fn default_constructor(self) -> Self
    where
        P: Default,
    {
        self.constructor(P::default)
    }

    /// Declare the setter that receives entities of type `E`
    pub fn entity<E, F>(self, set: F) -> Self
    where
        E: DomainEntity,
        F: Fn(&mut P, E) + Send + Sync + 'static,
    {
        let inject: Injector = Arc::new(move |persona: &mut dyn Any, entity: Box<dyn Any>| {
            match (persona.downcast_mut::<P>(), entity.downcast::<E>()) {
                (Some(persona), Ok(entity)) => {
                    set(persona, *entity);
                    true
                }
                _ => false,
            }
        });
        self.entry.injectors.insert(E::type_name().to_string(), inject);
        self
    }

    /// Public step found by its plain name
    pub fn step<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut P) -> StepResult + Send + Sync + 'static,
    {
        self.add_step(name.into(), StepVisibility::Public, body)
    }

    /// Non-public step, only reachable through the qualified search
    pub fn private_step<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut P) -> StepResult + Send + Sync + 'static,
    {
        self.add_step(name.into(), StepVisibility::Private, body)
    }

    /// Step implemented for entity `E` specifically, named `<E>.<operation>`
    pub fn qualified_step<E: DomainEntity>(
        self,
        operation: &str,
        body: impl Fn(&mut P) -> StepResult + Send + Sync + 'static,
    ) -> Self {
        let name = format!("{}.{operation}", E::type_name());
        self.add_step(name, StepVisibility::Private, body)
    }

    fn add_step<F>(self, name: String, visibility: StepVisibility, body: F) -> Self
    where
        F: Fn(&mut P) -> StepResult + Send + Sync + 'static,
    {
        let body: StepBody = Arc::new(move |persona: &mut dyn Any| match persona.downcast_mut::<P>() {
            Some(persona) => body(persona),
            None => Err(StepError::failed(anyhow::anyhow!(
                "persona instance is not a {}",
                type_name::<P>()
            ))),
        });
        self.entry.steps.insert(
            name.clone(),
            StepMethod {
                name,
                visibility,
                body,
            },
        );
        self
    }
}
