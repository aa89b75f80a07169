//! Query controller - owns the active query and drives the views
//!
//! All state lives on one controller instance and is only touched from the
//! event loop thread. Loads are futures the host polls; they interleave at
//! network awaits.

use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::api::{ApiClient, Transport};
use crate::config::ViewerConfig;
use crate::dispatch::{Action, DispatchTable};
use crate::history::{HistoryState, HistorySync, Navigator};
use crate::models::{MessageId, ThreadId};
use crate::ordering::{RequestTokens, ResponseOrdering};
use crate::page::{ElementKey, Page};
use crate::status::{Status, StatusIndicator};
use crate::views::{LoadOutcome, MessageContentView, ThreadListView, ThreadView, ViewContext};

/// Coordinates search, drill-down and history for one page
pub struct QueryController {
    cx: Rc<ViewContext>,
    history: HistorySync,
    default_query: String,
    active_query: RefCell<String>,
    /// Set while a thread-list load runs; only `search` consults it
    loading: Cell<bool>,
    thread_list: ThreadListView,
    thread: ThreadView,
    content: MessageContentView,
}

/// Clears the loading flag when the thread-list load ends, however it ends
struct LoadingGuard<'a> {
    controller: &'a QueryController,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.controller.set_loading(false);
    }
}

impl QueryController {
    pub fn new(
        transport: Rc<dyn Transport>,
        page: Rc<dyn Page>,
        navigator: Rc<dyn Navigator>,
        config: &ViewerConfig,
    ) -> Self {
        let cx = Rc::new(ViewContext {
            api: ApiClient::new(transport),
            status: StatusIndicator::new(page.clone()),
            page,
            dispatch: DispatchTable::new(),
            tokens: RequestTokens::new(config.response_ordering),
            date_format: config.date_format.clone(),
        });

        Self {
            thread_list: ThreadListView::new(cx.clone()),
            thread: ThreadView::new(cx.clone()),
            content: MessageContentView::new(cx.clone()),
            history: HistorySync::new(navigator),
            default_query: config.default_query.clone(),
            active_query: RefCell::new(config.default_query.clone()),
            loading: Cell::new(false),
            cx,
        }
    }

    /// Initial page load: query from the URL (or the default), no history push
    pub async fn start(&self) -> LoadOutcome {
        let query = self.history.initial_query(&self.default_query);
        info!("Controller initialized with query {:?}", query);
        self.cx.page.set_search_input(&query);
        self.set_active_query(&query);
        self.load_threads(&query).await
    }

    /// Search for whatever the search input holds
    pub async fn submit(&self) -> Option<LoadOutcome> {
        let query = self.cx.page.search_input();
        self.search(&query).await
    }

    /// Run a top-level search and record it in history
    ///
    /// Returns `None` without doing anything if a thread-list load is
    /// already running; the call is dropped, not queued.
    pub async fn search(&self, query: &str) -> Option<LoadOutcome> {
        if self.loading.get() {
            debug!("Ignoring search for {:?}: thread list is loading", query);
            return None;
        }
        self.set_active_query(query);
        self.history.record(query);
        Some(self.load_threads(query).await)
    }

    /// Handle a back/forward navigation carrying `state`
    ///
    /// Reloads the thread list for the restored query without pushing an
    /// entry and without checking the loading flag, so rapid navigation can
    /// overlap loads.
    pub async fn restore(&self, state: Option<&HistoryState>) -> Option<LoadOutcome> {
        let Some(query) = HistorySync::restored_query(state) else {
            debug!("Popped history entry carries no query");
            return None;
        };
        let query = query.to_string();
        self.cx.page.set_search_input(&query);
        self.set_active_query(&query);
        Some(self.load_threads(&query).await)
    }

    /// Run the action bound to a rendered element
    pub async fn activate(&self, key: &ElementKey) -> Option<LoadOutcome> {
        let Some(action) = self.cx.dispatch.resolve(key) else {
            debug!("No action bound to element {}", key);
            return None;
        };
        Some(self.perform(action).await)
    }

    pub async fn perform(&self, action: Action) -> LoadOutcome {
        match action {
            Action::OpenThread(thread_id) => self.open_thread(&thread_id).await,
            Action::ShowContent(message_id) => self.show_content(&message_id).await,
        }
    }

    /// Drill into a thread; independent of the search loading flag
    pub async fn open_thread(&self, thread_id: &ThreadId) -> LoadOutcome {
        self.thread.load(thread_id).await
    }

    /// Reveal one message's content inside the open thread
    pub async fn show_content(&self, message_id: &MessageId) -> LoadOutcome {
        self.content.load(message_id).await
    }

    async fn load_threads(&self, query: &str) -> LoadOutcome {
        self.set_loading(true);
        let _guard = LoadingGuard { controller: self };
        self.thread_list.load(query).await
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
        self.cx.page.set_search_busy(loading);
    }

    fn set_active_query(&self, query: &str) {
        *self.active_query.borrow_mut() = query.to_string();
    }

    pub fn active_query(&self) -> String {
        self.active_query.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn status(&self) -> Option<Status> {
        self.cx.status.current()
    }

    pub fn response_ordering(&self) -> ResponseOrdering {
        self.cx.tokens.ordering()
    }

    /// Elements that currently respond to activation, in render order
    pub fn bindings(&self) -> Vec<(ElementKey, Action)> {
        self.cx.dispatch.bindings()
    }
}
