// Copyright 2025 Cowboy AI, LLC.

//! Domain entities acted on by scenario steps

use std::any::Any;

/// A business object a step operates on
///
/// The runtime type name keys the setter a persona declares for the entity;
/// the display name is what the transcript shows.
///
/// # Examples
///
/// ```rust
/// use cim_narrative::DomainEntity;
///
/// struct Credentials {
///     user: String,
/// }
///
/// impl DomainEntity for Credentials {}
///
/// let credentials = Credentials { user: "ada".into() };
/// assert_eq!(Credentials::type_name(), "Credentials");
/// assert_eq!(credentials.display_name(), "Credentials");
/// ```
pub trait DomainEntity: Any {
    /// Runtime type name used to find the persona's entity setter
    fn type_name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }

    /// Name shown in narrated steps
    fn display_name(&self) -> String
    where
        Self: Sized,
    {
        Self::type_name().to_string()
    }
}

/// Last path segment of a Rust type name, without generic arguments
pub fn short_type_name<T: ?Sized + 'static>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
