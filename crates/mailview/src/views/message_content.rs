//! Message content view - the body of one message inside the thread view

use log::warn;
use std::rc::Rc;

use super::{LoadOutcome, LoadRequest, ViewContext, ViewError};
use crate::models::{MessageContent, MessageId};
use crate::page::Region;
use crate::status::Status;
use crate::templates;

/// Renders message bodies into their [`Region::Content`] placeholders
///
/// Only the placeholder of the requested message is touched, so several
/// bodies can load at once.
pub struct MessageContentView {
    cx: Rc<ViewContext>,
}

impl MessageContentView {
    pub fn new(cx: Rc<ViewContext>) -> Self {
        Self { cx }
    }

    pub async fn load(&self, message_id: &MessageId) -> LoadOutcome {
        let Some(slot) = self.cx.dispatch.slot(message_id) else {
            warn!("No content placeholder rendered for message {}", message_id.as_str());
            self.cx.status.set(Status::Error);
            return LoadOutcome::Failed(ViewError::MissingSlot(message_id.as_str().to_string()));
        };

        let request = LoadRequest {
            endpoint: format!("message/{}", urlencoding::encode(message_id.as_str())),
            region: Region::Content(slot),
            placeholder: "Loading content...",
            error_prefix: "Error loading message",
        };

        self.cx
            .load(request, |_, content: MessageContent| {
                templates::message_content(&content)
            })
            .await
    }
}
