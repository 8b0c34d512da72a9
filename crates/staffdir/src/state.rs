//! Application-wide UI preferences and change notification.
//!
//! [`AppState`] is a cloneable handle handed to every component at
//! construction. It reads the persisted preferences once, writes each change
//! straight back to the store, and announces it as an [`AppEvent`] to every
//! subscriber.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::i18n::Lang;
use crate::storage::{KeyValueStore, LANG_KEY, PAGE_INDEX_KEY, VIEW_KEY};

/// Capacity of the event channel; slow subscribers lose the oldest events.
const EVENT_CAPACITY: usize = 64;

/// How the list renders its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Table rows.
    #[default]
    List,
    /// Card grid.
    Cards,
}

impl ViewMode {
    /// Persisted name of the mode.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Cards => "cards",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "cards" => Ok(Self::Cards),
            _ => Err(Error::parse("view mode", s)),
        }
    }
}

/// Persisted UI preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// List rendering mode.
    pub view: ViewMode,
    /// One-based page index of the list.
    pub page_index: usize,
    /// UI language.
    pub lang: Lang,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            view: ViewMode::List,
            page_index: 1,
            lang: Lang::En,
        }
    }
}

/// Something observers of the application state may care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The list view mode changed.
    ViewChanged(ViewMode),
    /// The list page index changed.
    PageChanged(usize),
    /// The UI language changed.
    LangChanged(Lang),
    /// A transient notification appeared.
    NotificationShown {
        /// Sequence number of the notification.
        seq: u64,
        /// Message text.
        message: String,
    },
    /// A transient notification was dismissed.
    NotificationDismissed {
        /// Sequence number of the notification.
        seq: u64,
    },
}

#[derive(Debug)]
struct Inner {
    prefs: Mutex<Preferences>,
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<AppEvent>,
}

/// Shared handle to the application state.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// Load preferences from `store`.
    ///
    /// Missing or unreadable values fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let defaults = Preferences::default();
        let view = read_or(&*store, VIEW_KEY, defaults.view)?;
        let page_index = read_or(&*store, PAGE_INDEX_KEY, defaults.page_index)?.max(1);
        let lang = read_or(&*store, LANG_KEY, defaults.lang)?;

        let prefs = Preferences {
            view,
            page_index,
            lang,
        };
        debug!(?prefs, "Loaded preferences");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            inner: Arc::new(Inner {
                prefs: Mutex::new(prefs),
                store,
                events,
            }),
        })
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.inner.events.subscribe()
    }

    /// Publish an event to every subscriber.
    pub fn publish(&self, event: AppEvent) {
        if let Err(e) = self.inner.events.send(event) {
            trace!(event = ?e.0, "No subscribers for event");
        }
    }

    /// A snapshot of the current preferences.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn preferences(&self) -> Result<Preferences> {
        Ok(*self.lock()?)
    }

    /// Current view mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn view(&self) -> Result<ViewMode> {
        Ok(self.lock()?.view)
    }

    /// Current page index.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn page_index(&self) -> Result<usize> {
        Ok(self.lock()?.page_index)
    }

    /// Current language.
    ///
    /// # Errors
    ///
    /// Returns an error if the state lock is poisoned.
    pub fn lang(&self) -> Result<Lang> {
        Ok(self.lock()?.lang)
    }

    /// Set and persist the view mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    pub fn set_view(&self, view: ViewMode) -> Result<()> {
        self.inner.store.set(VIEW_KEY, view.as_str())?;
        self.lock()?.view = view;
        self.publish(AppEvent::ViewChanged(view));
        Ok(())
    }

    /// Set and persist the page index. Zero is stored as one.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    pub fn set_page_index(&self, page_index: usize) -> Result<()> {
        let page_index = page_index.max(1);
        self.inner
            .store
            .set(PAGE_INDEX_KEY, &page_index.to_string())?;
        self.lock()?.page_index = page_index;
        self.publish(AppEvent::PageChanged(page_index));
        Ok(())
    }

    /// Set and persist the language.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    pub fn set_lang(&self, lang: Lang) -> Result<()> {
        self.inner.store.set(LANG_KEY, lang.code())?;
        self.lock()?.lang = lang;
        self.publish(AppEvent::LangChanged(lang));
        Ok(())
    }

    /// Switch to the other language and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    pub fn toggle_lang(&self) -> Result<Lang> {
        let next = self.lang()?.toggled();
        self.set_lang(next)?;
        Ok(next)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Preferences>> {
        self.inner.prefs.lock().map_err(|_| Error::StoreLock)
    }
}

/// Read and parse `key`, using `default` when it is missing or unparsable.
fn read_or<T>(store: &dyn KeyValueStore, key: &str, default: T) -> Result<T>
where
    T: FromStr + Copy,
{
    let Some(raw) = store.get(key)? else {
        return Ok(default);
    };
    Ok(raw.parse().unwrap_or_else(|_| {
        warn!(key, value = %raw, "Ignoring unreadable preference");
        default
    }))
}
