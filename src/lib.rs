//! Asupersync auth context: the per-connection / per-call security context.
//!
//! # Overview
//!
//! An [`AuthContext`](security::AuthContext) records the facts established
//! while authenticating a peer: identity claims, transport-security
//! attributes, and whatever layer-specific payload a credential stack wants
//! to attach. Contexts can be stacked: a higher authentication layer wraps
//! the context produced by a lower one, and readers see the whole chain as a
//! single ordered sequence of properties.
//!
//! Two contexts can be compared for equivalence under a protocol-specific
//! rule held in a [`ComparatorRegistry`](security::ComparatorRegistry). When
//! no rule applies the answer is [`Undetermined`](security::ComparisonOutcome::Undetermined),
//! never a silent `false`.
//!
//! # Module Structure
//!
//! - [`security`]: properties, iterators, extensions, contexts and comparators
//! - [`config`]: configuration epochs that own the comparator registry
//! - [`error`](mod@error): error types for configuration loading
//! - [`tracing_compat`]: optional tracing integration (requires `tracing-integration` feature)
//!
//! # Example
//!
//! ```
//! use asupersync_authctx::security::{AuthContext, ComparatorRegistry, ComparisonOutcome};
//!
//! let mut transport = AuthContext::new();
//! transport.add_property("x509_common_name", "svc.example");
//! assert!(transport.set_peer_identity_property_name("x509_common_name"));
//!
//! let mut app = AuthContext::with_parent(transport.into_shared());
//! app.add_property("token_subject", "alice");
//!
//! let names: Vec<_> = app.property_iterator().map(|p| p.name()).collect();
//! assert_eq!(names, [&b"token_subject"[..], &b"x509_common_name"[..]]);
//!
//! let registry = ComparatorRegistry::empty();
//! let other = AuthContext::new();
//! assert_eq!(app.compare_auth_context(&other, &registry), ComparisonOutcome::Undetermined);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_inception)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod error;
pub mod security;
pub mod tracing_compat;

#[cfg(any(test, feature = "test-internals"))]
pub mod test_utils;

pub use config::{ConfigurationLifecycle, CoreConfiguration, CoreConfigurationBuilder};
pub use error::ConfigError;
pub use security::{
    AuthContext, AuthContextComparator, ComparatorRegistry, ComparisonOutcome, Extension,
    Property, PropertyIterator, PropertyStore, SharedAuthContext,
};
