//! Configuration epochs owning the comparator registry.
//!
//! A [`ConfigurationLifecycle`] is the explicit, injectable replacement for
//! process-global configuration. Code that sets up the process registers
//! builder callbacks; the first call to [`get`](ConfigurationLifecycle::get)
//! runs them in order and caches the resulting [`CoreConfiguration`] until
//! the next [`reset`](ConfigurationLifecycle::reset).
//!
//! ```text
//! register_builder(f)            persistent, survives reset()
//! register_ephemeral_builder(f)  dropped by reset()
//!            │
//!            ▼
//! get() ── persistent builders, then ephemeral builders ──► Arc<CoreConfiguration>
//!            │                                              (cached for the epoch)
//!            ▼
//! reset() ── new epoch: cache and ephemeral builders cleared
//! ```
//!
//! Ephemeral builders run after persistent ones, so a test that registers a
//! comparator for a protocol the process already covers overrides it for
//! the duration of its epoch. [`scoped_ephemeral`](ConfigurationLifecycle::scoped_ephemeral)
//! ties such an override to a guard.
//!
//! Configurations already handed out stay valid after a reset; readers keep
//! the `Arc` they were given.

use crate::security::comparators::BuiltinComparator;
use crate::security::compare::{ComparatorRegistry, ComparatorRegistryBuilder};
use crate::security::property::SSL_TRANSPORT_SECURITY_TYPE;
use crate::tracing_compat::{debug, info, warn};
use core::fmt;
use parking_lot::Mutex;
use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "config-file")]
use crate::error::{ConfigError, ConfigResult};
#[cfg(feature = "config-file")]
use std::collections::BTreeMap;
#[cfg(feature = "config-file")]
use std::path::Path;

/// Mutable configuration under construction.
#[derive(Debug, Default)]
pub struct CoreConfigurationBuilder {
    comparators: ComparatorRegistryBuilder,
}

impl CoreConfigurationBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The comparator registry under construction.
    pub fn auth_context_comparator_registry(&mut self) -> &mut ComparatorRegistryBuilder {
        &mut self.comparators
    }

    /// Freezes the builder.
    #[must_use]
    pub fn build(&self) -> CoreConfiguration {
        CoreConfiguration {
            comparators: self.comparators.build(),
        }
    }
}

/// Immutable configuration for one epoch.
#[derive(Debug, Clone, Default)]
pub struct CoreConfiguration {
    comparators: ComparatorRegistry,
}

impl CoreConfiguration {
    /// The comparator registry for this epoch.
    #[must_use]
    pub fn auth_context_comparator_registry(&self) -> &ComparatorRegistry {
        &self.comparators
    }
}

/// A registered configuration callback.
pub type BuilderFn = Arc<dyn Fn(&mut CoreConfigurationBuilder) + Send + Sync>;

/// Registers the comparators shipped with the built-in transports.
///
/// TLS contexts (`"ssl"` protocol) compare by peer identity.
pub fn register_builtin_comparators(builder: &mut CoreConfigurationBuilder) {
    builder.auth_context_comparator_registry().register_comparator(
        SSL_TRANSPORT_SECURITY_TYPE,
        BuiltinComparator::PeerIdentity.comparator(),
    );
}

thread_local! {
    // Lifecycles whose builders are running on this thread.
    static BUILDING: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

static NEXT_LIFECYCLE_ID: AtomicU64 = AtomicU64::new(1);

struct BuildMarker {
    id: u64,
}

impl BuildMarker {
    fn enter(id: u64) -> Self {
        BUILDING.with(|building| building.borrow_mut().push(id));
        Self { id }
    }

    fn is_active(id: u64) -> bool {
        BUILDING.with(|building| building.borrow().contains(&id))
    }
}

impl Drop for BuildMarker {
    fn drop(&mut self) {
        BUILDING.with(|building| {
            let mut building = building.borrow_mut();
            if let Some(pos) = building.iter().rposition(|&id| id == self.id) {
                building.remove(pos);
            }
        });
    }
}

#[derive(Default)]
struct LifecycleState {
    persistent: Vec<BuilderFn>,
    ephemeral: Vec<BuilderFn>,
    current: Option<Arc<CoreConfiguration>>,
    // Bumped by every registration and reset; a build started under an older
    // generation is returned to its caller but not cached.
    generation: u64,
    epoch: u64,
}

/// Owner of the configuration epochs for one process (or one test).
///
/// Thread-safe: registration, [`get`](Self::get) and [`reset`](Self::reset)
/// may be called from any thread. Builder callbacks run without the
/// internal lock held but must not call back into the lifecycle that is
/// running them: registrations, resets and clears issued from a builder are
/// ignored with a warning, and a nested [`get`](Self::get) returns an empty
/// configuration that is not cached.
pub struct ConfigurationLifecycle {
    id: u64,
    state: Mutex<LifecycleState>,
}

impl Default for ConfigurationLifecycle {
    fn default() -> Self {
        Self {
            id: NEXT_LIFECYCLE_ID.fetch_add(1, Ordering::Relaxed),
            state: Mutex::new(LifecycleState::default()),
        }
    }
}

impl ConfigurationLifecycle {
    /// Creates a lifecycle with no builders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lifecycle with the built-in comparators registered.
    #[must_use]
    pub fn with_builtin_comparators() -> Self {
        let lifecycle = Self::new();
        lifecycle.register_builder(register_builtin_comparators);
        lifecycle
    }

    /// Registers a builder that runs in every epoch.
    pub fn register_builder<F>(&self, f: F)
    where
        F: Fn(&mut CoreConfigurationBuilder) + Send + Sync + 'static,
    {
        if self.refuse_while_building("register_builder") {
            return;
        }
        let mut state = self.state.lock();
        state.persistent.push(Arc::new(f));
        Self::invalidate(&mut state);
        debug!(
            persistent = state.persistent.len(),
            "configuration builder registered"
        );
    }

    /// Registers a builder that runs until the next [`reset`](Self::reset).
    pub fn register_ephemeral_builder<F>(&self, f: F)
    where
        F: Fn(&mut CoreConfigurationBuilder) + Send + Sync + 'static,
    {
        if self.refuse_while_building("register_ephemeral_builder") {
            return;
        }
        let mut state = self.state.lock();
        state.ephemeral.push(Arc::new(f));
        Self::invalidate(&mut state);
        debug!(
            ephemeral = state.ephemeral.len(),
            "ephemeral configuration builder registered"
        );
    }

    /// Registers an ephemeral builder and resets the epoch when the returned
    /// guard is dropped.
    #[must_use = "the ephemeral registration is undone when the guard drops"]
    pub fn scoped_ephemeral<F>(&self, f: F) -> ScopedConfiguration<'_>
    where
        F: Fn(&mut CoreConfigurationBuilder) + Send + Sync + 'static,
    {
        self.register_ephemeral_builder(f);
        ScopedConfiguration { lifecycle: self }
    }

    /// The configuration for the current epoch, built on first use.
    pub fn get(&self) -> Arc<CoreConfiguration> {
        if self.refuse_while_building("get") {
            return Arc::new(CoreConfiguration::default());
        }
        let (builders, generation) = {
            let state = self.state.lock();
            if let Some(current) = &state.current {
                return Arc::clone(current);
            }
            let builders: Vec<BuilderFn> = state
                .persistent
                .iter()
                .chain(state.ephemeral.iter())
                .cloned()
                .collect();
            (builders, state.generation)
        };

        let mut builder = CoreConfigurationBuilder::new();
        {
            let _marker = BuildMarker::enter(self.id);
            for f in &builders {
                f(&mut builder);
            }
        }
        let built = Arc::new(builder.build());

        let mut state = self.state.lock();
        if state.generation == generation {
            if let Some(current) = &state.current {
                // Another thread finished first for the same generation.
                return Arc::clone(current);
            }
            state.current = Some(Arc::clone(&built));
            debug!(
                epoch = state.epoch,
                builders = builders.len(),
                "core configuration built"
            );
        }
        built
    }

    /// Shorthand for the current epoch's comparator registry.
    pub fn comparator_registry(&self) -> ComparatorRegistry {
        self.get().auth_context_comparator_registry().clone()
    }

    /// Starts a new epoch: drops the cached configuration and every
    /// ephemeral builder. Persistent builders are kept.
    pub fn reset(&self) {
        if self.refuse_while_building("reset") {
            return;
        }
        let mut state = self.state.lock();
        Self::invalidate(&mut state);
        state.epoch += 1;
        info!(
            epoch = state.epoch,
            ephemeral_dropped = state.ephemeral.len(),
            "configuration epoch reset"
        );
        state.ephemeral.clear();
    }

    /// Starts a new epoch with no builders at all.
    pub fn clear(&self) {
        if self.refuse_while_building("clear") {
            return;
        }
        let mut state = self.state.lock();
        state.persistent.clear();
        state.ephemeral.clear();
        Self::invalidate(&mut state);
        state.epoch += 1;
        info!(epoch = state.epoch, "configuration cleared");
    }

    /// Number of resets since creation.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.state.lock().epoch
    }

    /// Returns `true` if the current epoch's configuration has been built.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.state.lock().current.is_some()
    }

    #[cfg_attr(not(feature = "tracing-integration"), allow(unused_variables))]
    fn refuse_while_building(&self, operation: &'static str) -> bool {
        let building = BuildMarker::is_active(self.id);
        if building {
            warn!(operation, "configuration call from a running builder ignored");
        }
        building
    }

    fn invalidate(state: &mut LifecycleState) {
        state.current = None;
        state.generation += 1;
    }
}

impl fmt::Debug for ConfigurationLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ConfigurationLifecycle")
            .field("persistent", &state.persistent.len())
            .field("ephemeral", &state.ephemeral.len())
            .field("built", &state.current.is_some())
            .field("epoch", &state.epoch)
            .finish()
    }
}

/// Guard returned by [`ConfigurationLifecycle::scoped_ephemeral`].
///
/// Dropping it resets the lifecycle, discarding the ephemeral registration.
pub struct ScopedConfiguration<'a> {
    lifecycle: &'a ConfigurationLifecycle,
}

impl ScopedConfiguration<'_> {
    /// The configuration for the scoped epoch.
    pub fn get(&self) -> Arc<CoreConfiguration> {
        self.lifecycle.get()
    }

    /// The comparator registry for the scoped epoch.
    pub fn comparator_registry(&self) -> ComparatorRegistry {
        self.lifecycle.comparator_registry()
    }
}

impl Drop for ScopedConfiguration<'_> {
    fn drop(&mut self) {
        self.lifecycle.reset();
    }
}

impl fmt::Debug for ScopedConfiguration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedConfiguration")
            .field("lifecycle", self.lifecycle)
            .finish()
    }
}

/// Comparator assignments read from a TOML file.
///
/// ```toml
/// [comparators]
/// ssl = "peer-identity"
/// "token/v1" = "all-properties"
/// ```
#[cfg(feature = "config-file")]
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparatorConfig {
    /// Protocol identifier → built-in comparator.
    #[serde(default)]
    pub comparators: BTreeMap<String, BuiltinComparator>,
}

// Comparator names stay strings until after parsing so unknown names are
// reported as such rather than as a TOML error.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawComparatorConfig {
    #[serde(default)]
    comparators: BTreeMap<String, String>,
}

#[cfg(feature = "config-file")]
impl ComparatorConfig {
    /// Parses configuration text.
    ///
    /// Malformed TOML and unexpected tables are [`ConfigError::Parse`]; an
    /// unrecognised comparator name is [`ConfigError::UnknownComparator`].
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let raw: RawComparatorConfig =
            toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let comparators = raw
            .comparators
            .into_iter()
            .map(|(protocol, name)| {
                if protocol.is_empty() {
                    return Err(ConfigError::EmptyProtocol);
                }
                Ok((protocol, name.parse()?))
            })
            .collect::<ConfigResult<_>>()?;
        Ok(Self { comparators })
    }

    /// Reads and parses a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Registers every configured comparator on `builder`.
    pub fn apply(&self, builder: &mut CoreConfigurationBuilder) {
        let registry = builder.auth_context_comparator_registry();
        for (protocol, comparator) in &self.comparators {
            registry.register_comparator(protocol.as_str(), comparator.comparator());
        }
    }
}

#[cfg(feature = "config-file")]
impl ConfigurationLifecycle {
    /// Registers `config` as a persistent builder.
    pub fn register_comparator_config(&self, config: ComparatorConfig) {
        self.register_builder(move |builder| config.apply(builder));
    }
}
