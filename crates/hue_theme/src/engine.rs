//! Theme engine facade
//!
//! [`ThemeEngine`] owns the token store, theme catalog, configuration,
//! applied state, and resolution cache. It is constructed and owned by the
//! application; there is no global instance.
//!
//! - Writers (`initialize`, `update_configuration`, `reload_sources`) are
//!   serialized by a writer lock. Source I/O and resolution happen before the
//!   state lock is taken for writing, so readers are only blocked while the
//!   new state is swapped in.
//! - Readers get cloned snapshots and never observe a half-applied state.
//! - Changes are published on a bounded broadcast channel. Slow subscribers
//!   lose the oldest notifications instead of blocking the engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::cache::{CacheKey, ResolutionCache};
use crate::config::{SourceLocations, ThemingConfiguration};
use crate::error::{EngineError, LoadError, Result};
use crate::loader::{load_themes, load_tokens, SourceReader};
use crate::resolve::resolve;
use crate::state::AppliedThemeState;
use crate::theme::{ColorScheme, ThemeCatalog, ThemeSummary};
use crate::themes::{fallback, FALLBACK_THEME_ID};
use crate::tokens::TokenSet;

/// Default capacity of the change notification channel
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 16;

/// Engine lifecycle phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    /// Constructed, `initialize` not called yet
    Uninitialized,
    /// Serving a consistent applied state
    Ready,
    /// A configuration update or reload is in flight
    Updating,
}

/// Construction options for [`ThemeEngine`]
pub struct EngineBuilder {
    reader: Arc<dyn SourceReader>,
    notification_capacity: usize,
    resolution_counter: Option<Arc<AtomicUsize>>,
}

impl EngineBuilder {
    /// Capacity of the change notification channel (minimum 1)
    pub fn notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        self
    }

    /// Counter incremented once per pipeline execution (cache misses only)
    pub fn resolution_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.resolution_counter = Some(counter);
        self
    }

    pub fn build(self) -> ThemeEngine {
        let (notifier, _) = broadcast::channel(self.notification_capacity);
        ThemeEngine {
            reader: self.reader,
            state: RwLock::new(EngineState::uninitialized()),
            writer: Mutex::new(()),
            notifier,
            resolutions: self.resolution_counter.unwrap_or_default(),
        }
    }
}

struct EngineState {
    phase: EnginePhase,
    sources: SourceLocations,
    store: TokenSet,
    catalog: ThemeCatalog,
    config: Option<ThemingConfiguration>,
    applied: AppliedThemeState,
    cache: ResolutionCache,
}

impl EngineState {
    fn uninitialized() -> Self {
        Self {
            phase: EnginePhase::Uninitialized,
            sources: SourceLocations::default(),
            store: TokenSet::new(),
            catalog: ThemeCatalog::new(),
            config: None,
            applied: fallback::applied_state(ColorScheme::default(), None),
            cache: ResolutionCache::new(),
        }
    }
}

/// Design token resolution engine
pub struct ThemeEngine {
    reader: Arc<dyn SourceReader>,
    state: RwLock<EngineState>,
    writer: Mutex<()>,
    notifier: broadcast::Sender<AppliedThemeState>,
    resolutions: Arc<AtomicUsize>,
}

impl ThemeEngine {
    pub fn new(reader: impl SourceReader + 'static) -> Self {
        Self::builder(reader).build()
    }

    pub fn builder(reader: impl SourceReader + 'static) -> EngineBuilder {
        Self::builder_shared(Arc::new(reader))
    }

    /// Builder over an already shared reader
    pub fn builder_shared(reader: Arc<dyn SourceReader>) -> EngineBuilder {
        EngineBuilder {
            reader,
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            resolution_counter: None,
        }
    }

    // ========== Mutations ==========

    /// Load sources and resolve `config`.
    ///
    /// Never fails: if loading or resolution fails, the failure is logged and
    /// the built-in fallback theme becomes the applied state.
    pub fn initialize(
        &self,
        config: ThemingConfiguration,
        sources: SourceLocations,
    ) -> AppliedThemeState {
        let _writer = self.lock_writer();

        let (store, catalog) = match load_sources(self.reader.as_ref(), &sources) {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!("theme sources failed to load, using fallback theme: {err}");
                let catalog = [fallback::theme()].into_iter().collect();
                (fallback::tokens(), catalog)
            }
        };

        let mut cache = ResolutionCache::new();
        let key = CacheKey::for_config(&config);
        let applied = match self.run_pipeline(&store, &catalog, &config) {
            Ok(state) => {
                cache.put(key, state.clone());
                state
            }
            Err(err) => {
                warn!(
                    "initial resolution of theme `{}` failed, using fallback theme: {err}",
                    config.selected_theme
                );
                fallback::applied_state(config.preferred_scheme, config.accent.as_ref())
            }
        };

        let changed = {
            let mut state = self.write_state();
            let changed = applied.values_differ(&state.applied);
            *state = EngineState {
                phase: EnginePhase::Ready,
                sources,
                store,
                catalog,
                config: Some(config),
                applied: applied.clone(),
                cache,
            };
            changed
        };

        info!(
            "theme engine ready with theme `{}` ({}, {} tokens)",
            applied.theme_id,
            applied.scheme,
            applied.len()
        );
        if changed {
            self.notify(&applied);
        }
        applied
    }

    /// Apply a new configuration, consulting the cache first.
    ///
    /// On failure the previous configuration and applied state stay in place.
    /// Subscribers are notified only if the resolved values change.
    pub fn update_configuration(
        &self,
        new_config: ThemingConfiguration,
    ) -> Result<AppliedThemeState> {
        let _writer = self.lock_writer();
        self.begin_update()?;

        let key = CacheKey::for_config(&new_config);
        let computed = {
            let state = self.read_state();
            match state.cache.get(&key) {
                Some(mut hit) => {
                    debug!("resolution cache hit for theme `{}`", key.theme);
                    hit.accent = new_config.accent.clone();
                    Ok((hit, true))
                }
                None => {
                    debug!("resolution cache miss for theme `{}`", key.theme);
                    self.run_pipeline(&state.store, &state.catalog, &new_config)
                        .map(|resolved| (resolved, false))
                }
            }
        };

        let mut state = self.write_state();
        state.phase = EnginePhase::Ready;
        let (applied, cached) = computed?;

        if !cached {
            state.cache.put(key, applied.clone());
        }
        let changed = applied.values_differ(&state.applied);
        state.applied = applied.clone();
        state.config = Some(new_config);
        drop(state);

        if changed {
            self.notify(&applied);
        } else {
            debug!("configuration update left resolved tokens unchanged");
        }
        Ok(applied)
    }

    /// Reload all sources, clear the cache, and re-resolve the current
    /// configuration.
    ///
    /// The reload is all-or-nothing: if loading or resolution fails, the
    /// previous store, catalog, cache, and applied state are kept.
    pub fn reload_sources(&self) -> Result<AppliedThemeState> {
        let _writer = self.lock_writer();
        self.begin_update()?;

        let (sources, config) = {
            let state = self.read_state();
            (state.sources.clone(), state.config.clone())
        };

        let reloaded = match config {
            Some(config) => load_sources(self.reader.as_ref(), &sources)
                .map_err(EngineError::from)
                .and_then(|(store, catalog)| {
                    let applied = self.run_pipeline(&store, &catalog, &config)?;
                    Ok((store, catalog, config, applied))
                }),
            None => Err(EngineError::NotInitialized),
        };

        if let Err(err) = &reloaded {
            warn!("theme source reload failed, keeping previous state: {err}");
        }
        let mut state = self.write_state();
        state.phase = EnginePhase::Ready;
        let (store, catalog, config, applied) = reloaded?;

        state.store = store;
        state.catalog = catalog;
        state.cache.clear_all();
        state.cache.put(CacheKey::for_config(&config), applied.clone());
        let changed = applied.values_differ(&state.applied);
        state.applied = applied.clone();
        drop(state);

        info!("theme sources reloaded ({} themes)", self.get_available_themes().len());
        if changed {
            self.notify(&applied);
        }
        Ok(applied)
    }

    // ========== Snapshots ==========

    /// Current applied state (the fallback before `initialize`)
    pub fn get_applied_state(&self) -> AppliedThemeState {
        self.read_state().applied.clone()
    }

    /// Configuration behind the applied state, `None` before `initialize`
    pub fn get_configuration(&self) -> Option<ThemingConfiguration> {
        self.read_state().config.clone()
    }

    /// Loaded themes in load order
    pub fn get_available_themes(&self) -> Vec<ThemeSummary> {
        self.read_state().catalog.summaries()
    }

    pub fn phase(&self) -> EnginePhase {
        self.read_state().phase
    }

    /// Whether the applied state comes from the built-in fallback theme
    pub fn is_fallback_active(&self) -> bool {
        self.read_state().applied.theme_id.as_str() == FALLBACK_THEME_ID
    }

    pub fn source_locations(&self) -> SourceLocations {
        self.read_state().sources.clone()
    }

    /// Number of cached resolution results
    pub fn cache_len(&self) -> usize {
        self.read_state().cache.len()
    }

    /// Number of pipeline executions so far
    pub fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::Relaxed)
    }

    // ========== Notifications ==========

    /// Subscribe to applied state changes.
    ///
    /// A receiver that falls behind by more than the channel capacity gets
    /// `RecvError::Lagged` and skips to the oldest retained notification.
    pub fn subscribe(&self) -> broadcast::Receiver<AppliedThemeState> {
        self.notifier.subscribe()
    }

    fn notify(&self, applied: &AppliedThemeState) {
        match self.notifier.send(applied.clone()) {
            Ok(receivers) => debug!("theme change delivered to {receivers} subscribers"),
            Err(_) => debug!("theme changed with no subscribers"),
        }
    }

    // ========== Internals ==========

    fn run_pipeline(
        &self,
        store: &TokenSet,
        catalog: &ThemeCatalog,
        config: &ThemingConfiguration,
    ) -> std::result::Result<AppliedThemeState, crate::error::ResolveError> {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
        resolve(store, catalog, config)
    }

    fn begin_update(&self) -> Result<()> {
        let mut state = self.write_state();
        if state.phase == EnginePhase::Uninitialized {
            return Err(EngineError::NotInitialized);
        }
        state.phase = EnginePhase::Updating;
        Ok(())
    }

    fn lock_writer(&self) -> std::sync::MutexGuard<'_, ()> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_sources(
    reader: &dyn SourceReader,
    sources: &SourceLocations,
) -> std::result::Result<(TokenSet, ThemeCatalog), LoadError> {
    let store = load_tokens(reader, &sources.tokens)?;
    let themes = load_themes(reader, &sources.themes, &store)?;
    Ok((store, themes.into_iter().collect()))
}
