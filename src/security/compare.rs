//! Protocol-keyed equivalence rules for auth contexts.
//!
//! Whether two contexts describe "the same peer" depends on the protocol
//! that produced them: TLS may compare certificate identities, a token
//! scheme may compare subjects. This module holds those rules:
//!
//! - [`AuthContextComparator`]: a shared predicate over two contexts.
//! - [`ComparatorRegistryBuilder`]: collects `(protocol, comparator)` pairs
//!   during configuration. Registering a protocol twice keeps the last
//!   comparator and logs a warning.
//! - [`ComparatorRegistry`]: the immutable table consulted at call time.
//!   Cloning shares the table; lookups never lock.
//! - [`ComparisonOutcome`]: the three-valued answer. `Undetermined` is a
//!   first-class result, distinct from `NotEqual`.

use super::context::AuthContext;
use crate::tracing_compat::{debug, warn};
use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Result of comparing two auth contexts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOutcome {
    /// The registered comparator judged the contexts equivalent.
    Equal,
    /// The registered comparator judged the contexts different.
    NotEqual,
    /// No rule applies: a protocol is missing, the protocols differ, or no
    /// comparator is registered for the protocol.
    Undetermined,
}

impl ComparisonOutcome {
    /// Maps a comparator verdict to a definite outcome.
    #[must_use]
    pub const fn from_bool(equal: bool) -> Self {
        if equal { Self::Equal } else { Self::NotEqual }
    }

    /// `Some(verdict)` for a definite outcome, `None` when undetermined.
    #[must_use]
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Equal => Some(true),
            Self::NotEqual => Some(false),
            Self::Undetermined => None,
        }
    }

    /// Returns `true` unless the outcome is `Undetermined`.
    #[must_use]
    pub const fn is_determined(self) -> bool {
        !matches!(self, Self::Undetermined)
    }

    /// Returns `true` only for `Equal`.
    #[must_use]
    pub const fn is_equal(self) -> bool {
        matches!(self, Self::Equal)
    }
}

impl From<Option<bool>> for ComparisonOutcome {
    fn from(value: Option<bool>) -> Self {
        value.map_or(Self::Undetermined, Self::from_bool)
    }
}

impl From<ComparisonOutcome> for Option<bool> {
    fn from(value: ComparisonOutcome) -> Self {
        value.as_option()
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equal => "equal",
            Self::NotEqual => "not equal",
            Self::Undetermined => "undetermined",
        };
        f.write_str(s)
    }
}

/// Predicate signature held by an [`AuthContextComparator`].
pub type CompareFn = dyn Fn(&AuthContext, &AuthContext) -> bool + Send + Sync;

/// Shared equivalence predicate for one protocol.
///
/// Cloning is cheap (Arc-based).
#[derive(Clone)]
pub struct AuthContextComparator {
    inner: Arc<CompareFn>,
}

impl AuthContextComparator {
    /// Wraps a predicate.
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&AuthContext, &AuthContext) -> bool + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Runs the predicate.
    #[must_use]
    pub fn compare(&self, one: &AuthContext, two: &AuthContext) -> bool {
        (self.inner)(one, two)
    }
}

impl<F> From<F> for AuthContextComparator
where
    F: Fn(&AuthContext, &AuthContext) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for AuthContextComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContextComparator")
            .field("inner", &format_args!("Arc<dyn Fn>(..)"))
            .finish()
    }
}

/// Collects comparators during configuration.
///
/// # Example
///
/// ```
/// use asupersync_authctx::security::{AuthContext, ComparatorRegistryBuilder};
///
/// let mut builder = ComparatorRegistryBuilder::new();
/// builder.register_comparator("ssl", |a: &AuthContext, b: &AuthContext| {
///     a.peer_identity_values() == b.peer_identity_values()
/// });
/// let registry = builder.build();
/// assert!(registry.contains("ssl"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ComparatorRegistryBuilder {
    comparators: BTreeMap<String, AuthContextComparator>,
}

impl ComparatorRegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `comparator` with `protocol`.
    ///
    /// A later registration for the same protocol replaces the earlier one.
    pub fn register_comparator(
        &mut self,
        protocol: impl Into<String>,
        comparator: impl Into<AuthContextComparator>,
    ) -> &mut Self {
        let protocol = protocol.into();
        if self
            .comparators
            .insert(protocol.clone(), comparator.into())
            .is_some()
        {
            warn!(
                protocol = %protocol,
                "auth context comparator re-registered; previous comparator replaced"
            );
        } else {
            debug!(protocol = %protocol, "auth context comparator registered");
        }
        self
    }

    /// Returns `true` if `protocol` has a comparator.
    #[must_use]
    pub fn is_registered(&self, protocol: &str) -> bool {
        self.comparators.contains_key(protocol)
    }

    /// Number of registered protocols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Freezes the current registrations into a registry.
    #[must_use]
    pub fn build(&self) -> ComparatorRegistry {
        debug!(
            comparators = self.comparators.len(),
            "auth context comparator registry built"
        );
        ComparatorRegistry {
            comparators: Arc::new(self.comparators.clone()),
        }
    }
}

/// Immutable protocol → comparator table.
///
/// Built once per configuration epoch and shared by every call path that
/// compares contexts. Cloning is cheap (Arc-based).
#[derive(Clone, Default)]
pub struct ComparatorRegistry {
    comparators: Arc<BTreeMap<String, AuthContextComparator>>,
}

impl ComparatorRegistry {
    /// A registry with no comparators: every comparison is undetermined.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Starts a new builder.
    #[must_use]
    pub fn builder() -> ComparatorRegistryBuilder {
        ComparatorRegistryBuilder::new()
    }

    /// The comparator registered for `protocol`.
    #[must_use]
    pub fn lookup(&self, protocol: &str) -> Option<&AuthContextComparator> {
        self.comparators.get(protocol)
    }

    /// Returns `true` if `protocol` has a comparator.
    #[must_use]
    pub fn contains(&self, protocol: &str) -> bool {
        self.comparators.contains_key(protocol)
    }

    /// Number of registered protocols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Registered protocol identifiers, sorted.
    pub fn protocols(&self) -> impl Iterator<Item = &str> {
        self.comparators.keys().map(String::as_str)
    }

    /// Shorthand for [`AuthContext::compare_auth_context`].
    #[must_use]
    pub fn compare(&self, one: &AuthContext, two: &AuthContext) -> ComparisonOutcome {
        one.compare_auth_context(two, self)
    }

    /// A builder seeded with this registry's comparators, for layering
    /// further registrations on top.
    #[must_use]
    pub fn to_builder(&self) -> ComparatorRegistryBuilder {
        ComparatorRegistryBuilder {
            comparators: (*self.comparators).clone(),
        }
    }
}

impl fmt::Debug for ComparatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparatorRegistry")
            .field("protocols", &self.comparators.keys().collect::<Vec<_>>())
            .finish()
    }
}
