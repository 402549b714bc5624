// Copyright 2025 Cowboy AI, LLC.

//! Persona type names
//!
//! A [`PersonaType`] identifies one concrete persona implementation by the path
//! of the Rust type that implements it: the defining crate (`module`), the
//! namespace segments leading to the type, and the simple type name.
//!
//! ```text
//! shop::ui::Customer
//! ^^^^  ^^  ^^^^^^^^
//!  |     |   simple name
//!  |     implementation layer (last namespace segment)
//!  module
//! ```
//!
//! Switching implementation layer is a structural substitution of the last
//! namespace segment, so `shop::ui::Customer` in layer `service` is
//! `shop::service::Customer`.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{NarrativeError, NarrativeResult};

/// Fully qualified identity of a persona implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonaType {
    namespace: Vec<String>,
    name: String,
}

impl PersonaType {
    /// Identity of the Rust type `T`
    ///
    /// Generic arguments are dropped from the simple name; `Customer<Web>`
    /// is keyed as `Customer`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full = std::any::type_name::<T>();
        let base = full.split('<').next().unwrap_or(full);
        let mut segments: Vec<String> = base.split("::").map(str::to_string).collect();
        let name = segments.pop().unwrap_or_default();
        Self {
            namespace: segments,
            name,
        }
    }

    /// Parse a `::`-separated path such as `shop::service::Customer`
    pub fn parse(path: &str) -> NarrativeResult<Self> {
        let segments: Vec<&str> = path.split("::").map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(NarrativeError::InvalidPersonaType(path.to_string()));
        }
        if segments
            .iter()
            .any(|s| !s.chars().all(|ch| ch.is_alphanumeric() || ch == '_'))
        {
            return Err(NarrativeError::InvalidPersonaType(path.to_string()));
        }
        let (name, namespace) = match segments.split_last() {
            Some((name, namespace)) => (name.to_string(), namespace),
            None => return Err(NarrativeError::InvalidPersonaType(path.to_string())),
        };
        Ok(Self {
            namespace: namespace.iter().map(|s| s.to_string()).collect(),
            name,
        })
    }

    /// Simple type name, e.g. `Customer`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace segments leading to the type
    pub fn namespace(&self) -> &[String] {
        &self.namespace
    }

    /// Defining crate, i.e. the first namespace segment
    pub fn module(&self) -> &str {
        self.namespace.first().map(String::as_str).unwrap_or("")
    }

    /// Trailing namespace segment that names the implementation layer
    pub fn layer(&self) -> Option<&str> {
        self.namespace.last().map(String::as_str)
    }

    /// Path without the module identity, e.g. `shop::ui::Customer`
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            return self.name.clone();
        }
        format!("{}::{}", self.namespace.join("::"), self.name)
    }

    /// The same persona in another implementation layer
    ///
    /// The module segment is never replaced; a type directly under its module
    /// gains the layer as a new segment.
    pub fn in_layer(&self, layer: &str) -> Self {
        let mut namespace = self.namespace.clone();
        let deep = namespace.len() > 1;
        match namespace.last_mut() {
            Some(last) if deep => *last = layer.to_string(),
            _ => namespace.push(layer.to_string()),
        }
        Self {
            namespace,
            name: self.name.clone(),
        }
    }
}

impl Display for PersonaType {
    /// `<qualified name>, <module>`, matching the diagnostics users see for missing personas
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            return f.write_str(&self.name);
        }
        write!(f, "{}, {}", self.qualified_name(), self.module())
    }
}

impl FromStr for PersonaType {
    type Err = NarrativeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
