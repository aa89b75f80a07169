//! Views for the three drill-down levels
//!
//! Each view owns one kind of region and runs the same load contract:
//! status `loading`, placeholder, fetch, then either render + `ok` or an
//! escaped error message + `error`. Failures never escape a view.

mod message_content;
mod thread;
mod thread_list;

pub use message_content::MessageContentView;
pub use thread::ThreadView;
pub use thread_list::ThreadListView;

use log::{debug, error};
use serde::de::DeserializeOwned;
use std::rc::Rc;

use crate::api::{ApiClient, ApiError};
use crate::dispatch::DispatchTable;
use crate::ordering::RequestTokens;
use crate::page::{Page, Region};
use crate::status::{Status, StatusIndicator};
use crate::templates;

/// Failure of a view load
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The JSON did not have the shape the view renders
    #[error("Unexpected response shape")]
    UnexpectedShape(#[source] serde_json::Error),
    /// The message view no longer holds a placeholder for this message
    #[error("No content placeholder for message {0}")]
    MissingSlot(String),
}

/// Result of one view load
#[derive(Debug)]
pub enum LoadOutcome {
    /// Data was rendered into the region
    Rendered,
    /// An error message was rendered instead
    Failed(ViewError),
    /// A newer request for the region was issued; nothing was rendered
    Stale,
    /// The region was removed from the page while the request ran; the
    /// status still reflects the result
    Detached,
}

impl LoadOutcome {
    pub fn is_rendered(&self) -> bool {
        matches!(self, LoadOutcome::Rendered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }
}

/// Collaborators shared by every view
pub struct ViewContext {
    pub api: ApiClient,
    pub page: Rc<dyn Page>,
    pub status: StatusIndicator,
    pub dispatch: DispatchTable,
    pub tokens: RequestTokens,
    pub date_format: String,
}

impl ViewContext {
    /// Replace `region`, dropping the bindings and nested regions its
    /// previous markup owned
    fn render(&self, region: &Region, build: impl FnOnce(&DispatchTable) -> String) {
        for key in self.dispatch.release(region) {
            let nested = Region::Content(key);
            self.page.remove(&nested);
            self.tokens.forget(&nested);
        }
        let html = build(&self.dispatch);
        self.page.replace(region, &html);
    }

    fn is_attached(&self, region: &Region) -> bool {
        match region {
            Region::ThreadList | Region::MessageView => true,
            Region::Content(key) => self.dispatch.is_slot(key),
        }
    }

    fn show(&self, region: &Region, html: String) {
        self.render(region, |_| html);
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ViewError> {
        let value = self.api.call(endpoint).await?;
        serde_json::from_value(value).map_err(|e| {
            error!("Unexpected response shape from {}: {}", endpoint, e);
            ViewError::UnexpectedShape(e)
        })
    }

    /// Run the load contract for one region
    async fn load<T, F>(&self, request: LoadRequest<'_>, build: F) -> LoadOutcome
    where
        T: DeserializeOwned,
        F: FnOnce(&DispatchTable, T) -> String,
    {
        let LoadRequest {
            region,
            endpoint,
            placeholder,
            error_prefix,
        } = request;

        self.status.set(Status::Loading);
        self.show(&region, templates::loading_html(placeholder));
        let ticket = self.tokens.issue(&region);

        let result = self.fetch::<T>(&endpoint).await;

        if !self.tokens.accepts(&ticket) {
            debug!("Discarding stale response for {}", endpoint);
            return LoadOutcome::Stale;
        }

        if !self.is_attached(&region) {
            debug!("{} is gone, dropping response for {}", region, endpoint);
            self.status.set(if result.is_ok() { Status::Ok } else { Status::Error });
            return LoadOutcome::Detached;
        }

        match result {
            Ok(data) => {
                self.render(&region, |dispatch| build(dispatch, data));
                self.status.set(Status::Ok);
                LoadOutcome::Rendered
            }
            Err(e) => {
                error!("{} ({}): {}", error_prefix, endpoint, e);
                self.show(&region, templates::error_html(error_prefix, &e.to_string()));
                self.status.set(Status::Error);
                LoadOutcome::Failed(e)
            }
        }
    }
}

struct LoadRequest<'a> {
    region: Region,
    endpoint: String,
    placeholder: &'a str,
    error_prefix: &'a str,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::api::{StaticTransport, Transport};
    use crate::ordering::ResponseOrdering;
    use crate::page::InMemoryPage;

    pub fn context(transport: impl Transport + 'static) -> (Rc<ViewContext>, Rc<InMemoryPage>) {
        let page = Rc::new(InMemoryPage::new());
        let cx = ViewContext {
            api: ApiClient::new(Rc::new(transport)),
            page: page.clone(),
            status: StatusIndicator::new(page.clone()),
            dispatch: DispatchTable::new(),
            tokens: RequestTokens::new(ResponseOrdering::default()),
            date_format: "%Y-%m-%d".to_string(),
        };
        (Rc::new(cx), page)
    }

    pub fn static_context(
        fill: impl FnOnce(&mut StaticTransport),
    ) -> (Rc<ViewContext>, Rc<InMemoryPage>) {
        let mut transport = StaticTransport::new();
        fill(&mut transport);
        context(transport)
    }
}
