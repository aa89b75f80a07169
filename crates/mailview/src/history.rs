//! Browser history synchronization
//!
//! The active query lives in the page URL as `?q=<percent-encoded query>`
//! and in each history entry's state. Only explicit searches push entries;
//! the initial load and back/forward restoration never do.

use log::debug;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// URL parameter carrying the query
pub const QUERY_PARAM: &str = "q";

/// State attached to a history entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    #[serde(default)]
    pub query: Option<String>,
}

impl HistoryState {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
        }
    }
}

/// Session history operations the controller depends on
pub trait Navigator {
    /// Query-string part of the current location, e.g. `?q=tag%3Ainbox`
    fn location_search(&self) -> String;

    /// Push a new entry with `state` and visible `url`
    fn push_state(&self, state: HistoryState, url: &str);
}

/// Visible URL for a query
pub fn url_for_query(query: &str) -> String {
    format!("/?{}={}", QUERY_PARAM, urlencoding::encode(query))
}

/// Read the query parameter from a location's search string
///
/// An empty parameter counts as absent.
pub fn query_from_search(search: &str) -> Option<String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    url::form_urlencoded::parse(search.as_bytes())
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|query| !query.is_empty())
}

/// Keeps the navigable URL in step with the active query
pub struct HistorySync {
    navigator: Rc<dyn Navigator>,
}

impl HistorySync {
    pub fn new(navigator: Rc<dyn Navigator>) -> Self {
        Self { navigator }
    }

    /// Query named by the current URL, or `default` when it names none
    pub fn initial_query(&self, default: &str) -> String {
        query_from_search(&self.navigator.location_search()).unwrap_or_else(|| default.to_string())
    }

    /// Push an entry for an explicit search
    pub fn record(&self, query: &str) {
        let url = url_for_query(query);
        debug!("history push {}", url);
        self.navigator.push_state(HistoryState::for_query(query), &url);
    }

    /// Query to restore from a popped entry, if it carries a non-empty one
    pub fn restored_query(state: Option<&HistoryState>) -> Option<&str> {
        state
            .and_then(|s| s.query.as_deref())
            .filter(|query| !query.is_empty())
    }
}

#[derive(Debug, Clone)]
struct Entry {
    state: Option<HistoryState>,
    url: String,
}

/// In-memory session history with a cursor
///
/// [`MemoryHistory::back`] and [`MemoryHistory::forward`] move the cursor
/// and return the state a popstate event would carry.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: RefCell<Vec<Entry>>,
    index: Cell<usize>,
}

impl MemoryHistory {
    /// Start a session at `url` (e.g. `/?q=tag%3Aunread`)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            entries: RefCell::new(vec![Entry {
                state: None,
                url: url.into(),
            }]),
            index: Cell::new(0),
        }
    }

    pub fn current_url(&self) -> String {
        self.entries.borrow()[self.index.get()].url.clone()
    }

    pub fn current_state(&self) -> Option<HistoryState> {
        self.entries.borrow()[self.index.get()].state.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Step back; `None` when already at the first entry
    pub fn back(&self) -> Option<Option<HistoryState>> {
        let index = self.index.get().checked_sub(1)?;
        self.index.set(index);
        Some(self.current_state())
    }

    /// Step forward; `None` when already at the last entry
    pub fn forward(&self) -> Option<Option<HistoryState>> {
        let index = self.index.get() + 1;
        if index >= self.len() {
            return None;
        }
        self.index.set(index);
        Some(self.current_state())
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryHistory {
    fn location_search(&self) -> String {
        let url = self.current_url();
        url.find('?')
            .map(|start| url[start..].to_string())
            .unwrap_or_default()
    }

    fn push_state(&self, state: HistoryState, url: &str) {
        let mut entries = self.entries.borrow_mut();
        entries.truncate(self.index.get() + 1);
        entries.push(Entry {
            state: Some(state),
            url: url.to_string(),
        });
        self.index.set(entries.len() - 1);
    }
}
