//! Thread view - headers of every message in one thread

use std::rc::Rc;

use super::{LoadOutcome, LoadRequest, ViewContext};
use crate::dispatch::Action;
use crate::models::{Message, ThreadId};
use crate::page::Region;
use crate::templates;

/// Renders a thread's messages into [`Region::MessageView`]
///
/// Not guarded: it may run while a search is in flight, and two clicks
/// produce two independent loads.
pub struct ThreadView {
    cx: Rc<ViewContext>,
}

impl ThreadView {
    pub fn new(cx: Rc<ViewContext>) -> Self {
        Self { cx }
    }

    pub async fn load(&self, thread_id: &ThreadId) -> LoadOutcome {
        let region = Region::MessageView;
        let request = LoadRequest {
            endpoint: format!("thread/{}", urlencoding::encode(thread_id.as_str())),
            region: region.clone(),
            placeholder: "Loading messages...",
            error_prefix: "Error loading thread",
        };

        self.cx
            .load(request, |dispatch, messages: Vec<Message>| {
                messages
                    .iter()
                    .map(|message| {
                        let id = &message.message_id;
                        let button = dispatch.bind(&region, Action::ShowContent(id.clone()));
                        let slot = dispatch.reserve_slot(&region, id);
                        templates::message_block(message, &button, &slot)
                    })
                    .collect()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RawResponse;
    use crate::models::MessageId;
    use crate::status::Status;
    use crate::views::test_support::static_context;
    use serde_json::json;

    #[test]
    fn test_renders_headers_and_slots() {
        let (cx, page) = static_context(|t| {
            t.insert_json(
                "thread/t1",
                json!([
                    {"message_id": "m1", "from": "Alice <alice@example.com>", "subject": "Hi"},
                    {"message_id": "m2", "from": null, "to": "bob@example.com"}
                ]),
            )
        });
        let view = ThreadView::new(cx.clone());

        let outcome = tokio_test::block_on(view.load(&ThreadId::new("t1")));

        assert!(outcome.is_rendered());
        let html = page.region(&Region::MessageView).unwrap();
        assert!(html.contains("Alice &lt;alice@example.com&gt;"));
        assert!(html.contains("<strong>From:</strong> <br>"));
        assert!(!html.contains("undefined"));
        assert!(!html.contains("null"));

        let slot = cx.dispatch.slot(&MessageId::new("m2")).unwrap();
        assert!(html.contains(&format!(r#"<div data-key="{}" class="message-content">"#, slot)));
        let actions: Vec<Action> = cx.dispatch.bindings().into_iter().map(|(_, a)| a).collect();
        assert_eq!(
            actions,
            vec![
                Action::ShowContent(MessageId::new("m1")),
                Action::ShowContent(MessageId::new("m2")),
            ]
        );
        assert_eq!(cx.status.current(), Some(Status::Ok));
    }

    #[test]
    fn test_server_error_leaves_thread_list_alone() {
        let (cx, page) = static_context(|t| {
            t.insert_json("query/tag%3Ainbox", json!([{"thread_id": "abc123", "subject": "Kept"}]));
            t.insert("thread/abc123", RawResponse::new(500, "Internal Server Error"));
        });
        let list = crate::views::ThreadListView::new(cx.clone());
        tokio_test::block_on(list.load("tag:inbox"));
        let list_before = page.region(&Region::ThreadList).unwrap();
        let row_bindings = cx.dispatch.bindings();

        let view = ThreadView::new(cx.clone());
        let outcome = tokio_test::block_on(view.load(&ThreadId::new("abc123")));

        assert!(outcome.is_failed());
        let detail = page.region(&Region::MessageView).unwrap();
        assert!(detail.contains("Error loading thread"));
        assert!(detail.contains("500"));
        assert_eq!(cx.status.current(), Some(Status::Error));
        assert_eq!(page.region(&Region::ThreadList).unwrap(), list_before);
        assert_eq!(cx.dispatch.bindings(), row_bindings);
    }

    #[test]
    fn test_thread_id_is_percent_encoded() {
        let (cx, page) = static_context(|t| t.insert_json("thread/a%2Fb", json!([])));
        let view = ThreadView::new(cx);

        let outcome = tokio_test::block_on(view.load(&ThreadId::new("a/b")));

        assert!(outcome.is_rendered());
        assert_eq!(page.region(&Region::MessageView).unwrap(), "");
    }
}
