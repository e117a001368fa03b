//! Type-erased, single-owner payload attached to an [`AuthContext`](super::AuthContext).
//!
//! Credential layers sometimes need to carry data that is not a property:
//! a parsed certificate, a token introspection result, a handle back into a
//! session cache. The context stores it as an [`Extension`] without knowing
//! its concrete type; consumers recover it with a checked downcast.

use core::any::{Any, TypeId};
use core::fmt;

/// An owned, dynamically-typed value.
///
/// The payload is dropped exactly once: when it is replaced, taken out, or
/// when the owning context is dropped.
///
/// # Example
///
/// ```
/// use asupersync_authctx::security::Extension;
///
/// struct SessionTicket(u64);
///
/// let ext = Extension::new(SessionTicket(7));
/// assert!(ext.is::<SessionTicket>());
/// assert_eq!(ext.downcast_ref::<SessionTicket>().map(|t| t.0), Some(7));
/// assert!(ext.downcast_ref::<String>().is_none());
/// ```
pub struct Extension {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl Extension {
    /// Wraps `value` as an extension.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: core::any::type_name::<T>(),
        }
    }

    /// Returns `true` if the payload is a `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        (*self.value).type_id() == TypeId::of::<T>()
    }

    /// Returns a reference to the payload if it is a `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns a mutable reference to the payload if it is a `T`.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.value.downcast_mut::<T>()
    }

    /// Takes the payload out as a `T`, or hands the extension back unchanged.
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Self> {
        let type_name = self.type_name;
        self.value
            .downcast::<T>()
            .map_err(|value| Self { value, type_name })
    }

    /// Returns the Rust type name of the payload, for diagnostics only.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}
