//! Mailview crate - controller for a mail search page
//!
//! This crate provides the view-state logic behind a three-level mail UI:
//! - Search results for a query (thread list)
//! - Messages of one thread
//! - Rendered content of one message
//!
//! It also keeps the activity indicator and browser history in step with
//! the active query. The document, the history stack and HTTP are reached
//! through the [`Page`], [`Navigator`] and [`Transport`] traits, so the
//! crate has no UI dependencies and runs on a single-threaded event loop.

pub mod api;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod history;
pub mod models;
pub mod ordering;
pub mod page;
pub mod status;
pub mod templates;
pub mod views;

pub use api::{ApiClient, ApiError, RawResponse, StaticTransport, Transport, UreqTransport};
pub use self::config::ViewerConfig;
pub use controller::QueryController;
pub use dispatch::{Action, DispatchTable};
pub use history::{HistoryState, HistorySync, MemoryHistory, Navigator};
pub use models::{Attachment, Message, MessageContent, MessageId, Thread, ThreadId};
pub use ordering::ResponseOrdering;
pub use page::{ElementKey, InMemoryPage, Page, Region};
pub use status::{Status, StatusIndicator};
pub use views::{LoadOutcome, ViewError};
