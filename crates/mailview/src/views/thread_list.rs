//! Thread list view - search results for the active query

use std::rc::Rc;

use super::{LoadOutcome, LoadRequest, ViewContext};
use crate::dispatch::Action;
use crate::models::Thread;
use crate::page::Region;
use crate::templates;

/// Renders search results into [`Region::ThreadList`]
pub struct ThreadListView {
    cx: Rc<ViewContext>,
}

impl ThreadListView {
    pub fn new(cx: Rc<ViewContext>) -> Self {
        Self { cx }
    }

    /// Fetch `query/{query}` and render one clickable row per thread
    ///
    /// A `null` or empty result renders the "No threads found" placeholder.
    pub async fn load(&self, query: &str) -> LoadOutcome {
        let region = Region::ThreadList;
        let request = LoadRequest {
            endpoint: format!("query/{}", urlencoding::encode(query)),
            region: region.clone(),
            placeholder: "Loading threads...",
            error_prefix: "Error loading threads",
        };
        let date_format = self.cx.date_format.clone();

        self.cx
            .load(request, |dispatch, threads: Option<Vec<Thread>>| {
                let threads = threads.unwrap_or_default();
                templates::thread_list(threads.iter().map(|thread| {
                    let key = dispatch.bind(&region, Action::OpenThread(thread.thread_id.clone()));
                    templates::thread_row(thread, &key, &date_format)
                }))
            })
            .await
    }
}
