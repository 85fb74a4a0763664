//! The active locale and catalog, shared across threads.
//!
//! A [`LocaleStore`] holds one immutable [`LocaleState`] snapshot behind an
//! `Arc`. Readers clone the `Arc` and resolve against it without further
//! locking, so a locale is never observed alongside another locale's
//! catalog. Activations are serialised by a separate mutex that also covers
//! loading and subscriber notification; the last activation wins.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use glossa_common::{DEFAULT_LOCALE, PluralVariations, normalise_locale};
use log::debug;

use crate::catalog::Catalog;
use crate::descriptor::MessageDescriptor;
use crate::error::{LoadError, ResolveError};
use crate::loader::CatalogLoader;
use crate::plural::PluralRuleSet;
use crate::resolver::Resolver;

const LOG_TARGET: &str = "glossa::runtime";

/// One locale paired with its catalog and plural rules.
#[derive(Debug)]
pub struct LocaleState {
    locale: String,
    catalog: Catalog,
    rules: PluralRuleSet,
}

impl LocaleState {
    /// Pair `locale` with `catalog`, resolving the locale's plural rules.
    #[must_use]
    pub fn new(locale: impl Into<String>, catalog: Catalog) -> Self {
        let locale = locale.into();
        let rules = PluralRuleSet::for_locale(&locale);
        Self {
            locale,
            catalog,
            rules,
        }
    }

    /// Locale tag.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Translations for this locale.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cardinal plural rules for this locale.
    #[must_use]
    pub const fn plural_rules(&self) -> &PluralRuleSet {
        &self.rules
    }

    /// Resolver bound to this snapshot.
    #[must_use]
    pub const fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self)
    }
}

impl Default for LocaleState {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE, Catalog::new())
    }
}

/// Handle returned by [`LocaleStore::subscribe`].
#[must_use = "the id is needed to unsubscribe"]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&str) + Send + Sync>;

/// Owner of the active locale snapshot.
///
/// # Examples
///
/// ```
/// use glossa_runtime::{Catalog, LocaleStore};
///
/// let store = LocaleStore::new();
/// assert_eq!(store.t("hello").as_deref(), Ok("hello"));
///
/// store.activate("ja", Catalog::from_messages([("hello", None, "こんにちは")]));
/// assert_eq!(store.t("hello").as_deref(), Ok("こんにちは"));
/// ```
pub struct LocaleStore {
    state: RwLock<Arc<LocaleState>>,
    activation: Mutex<()>,
    subscribers: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
}

impl LocaleStore {
    /// A store on the default locale with an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_state(LocaleState::default())
    }

    /// A store starting on `locale` with `catalog`.
    #[must_use]
    pub fn with_locale(locale: &str, catalog: Catalog) -> Self {
        Self::with_state(LocaleState::new(
            normalise_locale(Some(locale)).unwrap_or(DEFAULT_LOCALE),
            catalog,
        ))
    }

    fn with_state(state: LocaleState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
            activation: Mutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<LocaleState> {
        Arc::clone(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Make `catalog` the active catalog for `locale` and notify subscribers.
    ///
    /// A blank `locale` activates the default locale.
    pub fn activate(&self, locale: &str, catalog: Catalog) {
        let _queue = self.lock_activation();
        self.swap(locale, catalog);
    }

    /// Load the catalog for `locale` with `loader` and activate it.
    ///
    /// Loading happens inside the activation queue, so concurrent calls
    /// apply in the order they acquire it.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; the active snapshot is then unchanged.
    pub fn activate_with(&self, locale: &str, loader: &dyn CatalogLoader) -> Result<(), LoadError> {
        let _queue = self.lock_activation();
        let locale = normalise_locale(Some(locale)).unwrap_or(DEFAULT_LOCALE);
        let catalog = loader.load(locale)?;
        self.swap(locale, catalog);
        Ok(())
    }

    /// Register `callback` to receive the locale after every activation.
    ///
    /// The callback runs once immediately with the current locale. It runs
    /// inside the activation queue, so it must not activate a locale on this
    /// store itself.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let _queue = self.lock_activation();
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let callback: Callback = Arc::new(callback);
        self.lock_subscribers().push((id, Arc::clone(&callback)));
        callback(self.current().locale());
        id
    }

    /// Stop notifying `id`. Returns whether it was subscribed.
    #[must_use]
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock_subscribers();
        let before = subscribers.len();
        subscribers.retain(|(candidate, _)| *candidate != id);
        subscribers.len() != before
    }

    /// Resolve `descriptor` against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn t(&self, descriptor: impl Into<MessageDescriptor>) -> Result<String, ResolveError> {
        self.current().resolver().resolve(&descriptor.into())
    }

    /// Resolve plural `variations` for `count` against the current snapshot.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_plural`].
    pub fn plural(&self, count: f64, variations: &PluralVariations) -> Result<String, ResolveError> {
        self.current().resolver().resolve_plural(count, variations)
    }

    /// A translator pinned to the current snapshot.
    #[must_use]
    pub fn translator(&self) -> Translator {
        Translator {
            state: self.current(),
        }
    }

    fn swap(&self, locale: &str, catalog: Catalog) {
        let locale = normalise_locale(Some(locale)).unwrap_or(DEFAULT_LOCALE);
        let entries = catalog.len();
        let state = Arc::new(LocaleState::new(locale, catalog));
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
        debug!(target: LOG_TARGET, "activated locale {locale} with {entries} messages");

        let callbacks: Vec<Callback> = self
            .lock_subscribers()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(locale);
        }
    }

    fn lock_activation(&self) -> MutexGuard<'_, ()> {
        self.activation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_subscribers(&self) -> MutexGuard<'_, Vec<(SubscriptionId, Callback)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LocaleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LocaleStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleStore")
            .field("state", &self.current())
            .field("subscribers", &self.lock_subscribers().len())
            .finish_non_exhaustive()
    }
}

/// Resolves against one snapshot, unaffected by later activations.
#[derive(Clone, Debug)]
pub struct Translator {
    state: Arc<LocaleState>,
}

impl Translator {
    /// Locale of the pinned snapshot.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.state.locale()
    }

    /// Resolve `descriptor`.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve`].
    pub fn t(&self, descriptor: impl Into<MessageDescriptor>) -> Result<String, ResolveError> {
        self.state.resolver().resolve(&descriptor.into())
    }

    /// Resolve plural `variations` for `count`.
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve_plural`].
    pub fn plural(&self, count: f64, variations: &PluralVariations) -> Result<String, ResolveError> {
        self.state.resolver().resolve_plural(count, variations)
    }
}
