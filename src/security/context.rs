//! The per-connection / per-call authentication context.
//!
//! # Lifecycle
//!
//! ```text
//! AuthContext::new() / with_parent(shared)     populate (single owner, &mut)
//!        │                                        add_property
//!        │                                        set_peer_identity_property_name
//!        │                                        set_protocol / set_extension
//!        ▼
//! into_shared() ──► SharedAuthContext ──clone──► transport, call, application
//!                         │                      (read-only: iterate, compare)
//!                         ▼
//!                   last handle dropped ──► context, extension and the
//!                                           reference to the parent released
//! ```
//!
//! Mutation requires `&mut AuthContext`, which a [`SharedAuthContext`] only
//! hands out while it is the sole holder. Once a context is shared it is
//! read-only, so concurrent readers need no locking. The parent link is
//! fixed at construction, which keeps every chain finite and acyclic.

use super::compare::{ComparatorRegistry, ComparisonOutcome};
use super::extension::Extension;
use super::iter::PropertyIterator;
use super::property::{Property, PropertyStore};
use crate::tracing_compat::{debug, trace};
use core::any::Any;
use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

/// Facts established while authenticating a peer.
///
/// A context owns an append-only [`PropertyStore`], optionally wraps a parent
/// context produced by a lower authentication layer, designates which
/// property name carries the peer identity, names the protocol whose
/// comparator applies, and may own one opaque [`Extension`].
///
/// # Example
///
/// ```
/// use asupersync_authctx::security::AuthContext;
///
/// let mut ctx = AuthContext::new();
/// ctx.add_property("name", "chapi");
/// ctx.add_property("name", "chapo");
/// ctx.add_property("foo", "bar");
/// assert!(ctx.set_peer_identity_property_name("name"));
///
/// let ids: Vec<_> = ctx.peer_identity().filter_map(|p| p.value_str()).collect();
/// assert_eq!(ids, ["chapi", "chapo"]);
/// ```
#[derive(Default)]
pub struct AuthContext {
    parent: Option<SharedAuthContext>,
    properties: PropertyStore,
    peer_identity_property_name: Option<Box<[u8]>>,
    protocol: Option<String>,
    extension: Option<Extension>,
}

impl AuthContext {
    /// Creates an empty root context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty context layered on top of `parent`.
    ///
    /// Iteration over the new context continues into `parent` once the
    /// context's own properties are exhausted.
    #[must_use]
    pub fn with_parent(parent: SharedAuthContext) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Creates a context with an optional parent.
    #[must_use]
    pub fn from_parent(parent: Option<SharedAuthContext>) -> Self {
        Self {
            parent,
            ..Self::default()
        }
    }

    /// Moves the context behind a reference-counted handle.
    #[must_use]
    pub fn into_shared(self) -> SharedAuthContext {
        SharedAuthContext::new(self)
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    /// Appends a property to this context's own store.
    pub fn add_property(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) {
        self.properties.add(Property::new(name, value));
    }

    /// Appends a property whose value is a UTF-8 string.
    pub fn add_cstring_property(&mut self, name: impl Into<Vec<u8>>, value: &str) {
        self.add_property(name, value);
    }

    /// Designates `name` as the peer identity property.
    ///
    /// Succeeds only if this context's own store already holds a property
    /// with exactly that name; ancestors are not consulted. On failure the
    /// previous designation, if any, is left in place.
    pub fn set_peer_identity_property_name(&mut self, name: impl AsRef<[u8]>) -> bool {
        let name = name.as_ref();
        if !self.properties.contains_name(name) {
            trace!(
                name = %String::from_utf8_lossy(name),
                "peer identity name rejected: no such own property"
            );
            return false;
        }
        self.peer_identity_property_name = Some(name.into());
        true
    }

    /// Sets the protocol whose comparator decides equivalence.
    pub fn set_protocol(&mut self, protocol: impl Into<String>) {
        self.protocol = Some(protocol.into());
    }

    /// Attaches an extension, dropping any previous one.
    #[cfg_attr(not(feature = "tracing-integration"), allow(unused_variables))]
    pub fn set_extension(&mut self, extension: Extension) {
        if let Some(previous) = self.extension.replace(extension) {
            debug!(replaced = previous.type_name(), "auth context extension replaced");
        }
    }

    /// Attaches `value` as the extension, dropping any previous one.
    pub fn set_extension_value<T: Any + Send + Sync>(&mut self, value: T) {
        self.set_extension(Extension::new(value));
    }

    /// Removes and returns the extension.
    pub fn take_extension(&mut self) -> Option<Extension> {
        self.extension.take()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// This context's own properties; ancestors are not included.
    #[must_use]
    pub fn properties(&self) -> &PropertyStore {
        &self.properties
    }

    /// The parent context, if this one is layered.
    #[must_use]
    pub fn parent(&self) -> Option<&SharedAuthContext> {
        self.parent.as_ref()
    }

    /// Number of contexts in the chain, counting this one.
    #[must_use]
    pub fn chain_depth(&self) -> usize {
        let mut depth = 1;
        let mut cur = self.parent();
        while let Some(parent) = cur {
            depth += 1;
            cur = parent.parent();
        }
        depth
    }

    /// The designated peer identity property name.
    #[must_use]
    pub fn peer_identity_property_name(&self) -> Option<&[u8]> {
        self.peer_identity_property_name.as_deref()
    }

    /// Returns `true` once a peer identity property name has been designated.
    #[must_use]
    pub fn is_peer_authenticated(&self) -> bool {
        self.peer_identity_property_name.is_some()
    }

    /// The protocol identifier.
    #[must_use]
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// The extension, if one is attached.
    #[must_use]
    pub fn extension(&self) -> Option<&Extension> {
        self.extension.as_ref()
    }

    /// The extension payload, if one is attached and it is a `T`.
    #[must_use]
    pub fn extension_ref<T: Any>(&self) -> Option<&T> {
        self.extension.as_ref()?.downcast_ref::<T>()
    }

    /// Mutable access to the extension payload, if it is a `T`.
    pub fn extension_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.extension.as_mut()?.downcast_mut::<T>()
    }

    // ------------------------------------------------------------------
    // Iteration
    // ------------------------------------------------------------------

    /// Every property of this context, then of its ancestors.
    #[must_use]
    pub fn property_iterator(&self) -> PropertyIterator<'_> {
        PropertyIterator::all(self)
    }

    /// Properties named `name` in this context, then in its ancestors.
    #[must_use]
    pub fn find_properties_by_name<'a, N>(&'a self, name: &'a N) -> PropertyIterator<'a>
    where
        N: AsRef<[u8]> + ?Sized,
    {
        PropertyIterator::by_name(self, name.as_ref())
    }

    /// Properties named by the peer identity designation, chain included.
    ///
    /// Yields nothing when no designation has been made.
    #[must_use]
    pub fn peer_identity(&self) -> PropertyIterator<'_> {
        match self.peer_identity_property_name.as_deref() {
            Some(name) => PropertyIterator::by_name(self, name),
            None => PropertyIterator::empty(),
        }
    }

    /// Values of the peer identity properties, chain included.
    #[must_use]
    pub fn peer_identity_values(&self) -> Vec<&[u8]> {
        self.peer_identity().map(Property::value).collect()
    }

    /// Values of the properties named `name`, chain included.
    #[must_use]
    pub fn find_property_values<'a, N>(&'a self, name: &'a N) -> Vec<&'a [u8]>
    where
        N: AsRef<[u8]> + ?Sized,
    {
        self.find_properties_by_name(name)
            .map(Property::value)
            .collect()
    }

    // ------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------

    /// Compares two contexts under the comparator registered for their protocol.
    ///
    /// Returns [`ComparisonOutcome::Undetermined`] when either side has no
    /// protocol, the protocols differ, or `registry` has no comparator for
    /// the shared protocol.
    #[must_use]
    pub fn compare_auth_context(
        &self,
        other: &Self,
        registry: &ComparatorRegistry,
    ) -> ComparisonOutcome {
        let (Some(mine), Some(theirs)) = (self.protocol(), other.protocol()) else {
            trace!("auth context comparison undetermined: protocol unset");
            return ComparisonOutcome::Undetermined;
        };
        if mine != theirs {
            trace!(
                left = mine,
                right = theirs,
                "auth context comparison undetermined: protocol mismatch"
            );
            return ComparisonOutcome::Undetermined;
        }
        let Some(comparator) = registry.lookup(mine) else {
            trace!(
                protocol = mine,
                "auth context comparison undetermined: no comparator"
            );
            return ComparisonOutcome::Undetermined;
        };
        let outcome = ComparisonOutcome::from_bool(comparator.compare(self, other));
        trace!(protocol = mine, ?outcome, "auth context compared");
        outcome
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext")
            .field("properties", &self.properties.count())
            .field("protocol", &self.protocol)
            .field(
                "peer_identity_property_name",
                &self
                    .peer_identity_property_name
                    .as_deref()
                    .map(String::from_utf8_lossy),
            )
            .field("extension", &self.extension.as_ref().map(Extension::type_name))
            .field("chain_depth", &self.chain_depth())
            .finish()
    }
}

/// Reference-counted handle to an [`AuthContext`].
///
/// Cloning adds a holder; the context is dropped when the last handle goes,
/// which in turn releases its handle on the parent. Reads go through
/// [`Deref`]. Writes are only possible through [`get_mut`](Self::get_mut)
/// while this handle is the sole holder.
///
/// # Example
///
/// ```
/// use asupersync_authctx::security::AuthContext;
///
/// let mut shared = AuthContext::new().into_shared();
/// shared.get_mut().expect("sole holder").add_property("foo", "bar");
///
/// let call_ref = shared.clone();
/// assert!(shared.get_mut().is_none());
/// assert_eq!(call_ref.properties().count(), 1);
/// ```
#[derive(Clone)]
pub struct SharedAuthContext {
    inner: Arc<AuthContext>,
}

impl SharedAuthContext {
    /// Moves `ctx` behind a new handle.
    #[must_use]
    pub fn new(ctx: AuthContext) -> Self {
        Self {
            inner: Arc::new(ctx),
        }
    }

    /// Mutable access while this is the only handle.
    pub fn get_mut(&mut self) -> Option<&mut AuthContext> {
        Arc::get_mut(&mut self.inner)
    }

    /// Unwraps the context if this is the only handle.
    pub fn try_unwrap(self) -> Result<AuthContext, Self> {
        Arc::try_unwrap(self.inner).map_err(|inner| Self { inner })
    }

    /// Number of live handles to this context.
    #[must_use]
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.inner)
    }

    /// Returns `true` if both handles point at the same context.
    #[must_use]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

impl Deref for SharedAuthContext {
    type Target = AuthContext;

    fn deref(&self) -> &AuthContext {
        &self.inner
    }
}

impl AsRef<AuthContext> for SharedAuthContext {
    fn as_ref(&self) -> &AuthContext {
        &self.inner
    }
}

impl From<AuthContext> for SharedAuthContext {
    fn from(ctx: AuthContext) -> Self {
        Self::new(ctx)
    }
}

impl fmt::Debug for SharedAuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedAuthContext")
            .field("holders", &Arc::strong_count(&self.inner))
            .field("context", &*self.inner)
            .finish()
    }
}
