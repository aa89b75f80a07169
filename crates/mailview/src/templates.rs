//! HTML fragments for the three panels
//!
//! This module consolidates all markup generation so escaping is applied in
//! one place. Every backend string is escaped except message content whose
//! type is exactly `text/html`.

use chrono::{DateTime, Local};
use std::fmt::Write;

use crate::models::{Message, MessageContent, Thread};
use crate::page::ElementKey;

/// Placeholder shown when a search matches nothing
pub const NO_THREADS: &str = "No threads found";

/// Simple HTML escape for untrusted content
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format epoch seconds as a local date/time string
///
/// Out-of-range timestamps and invalid format strings yield an empty string.
pub fn format_timestamp(epoch_secs: i64, format: &str) -> String {
    let Some(utc) = DateTime::from_timestamp(epoch_secs, 0) else {
        return String::new();
    };
    let mut out = String::new();
    match write!(out, "{}", utc.with_timezone(&Local).format(format)) {
        Ok(()) => out,
        Err(_) => String::new(),
    }
}

/// Placeholder shown while a region loads
pub fn loading_html(text: &str) -> String {
    format!(r#"<div class="loading">{}</div>"#, html_escape(text))
}

/// Error box for a failed load; `message` is escaped
pub fn error_html(prefix: &str, message: &str) -> String {
    format!(
        r#"<div class="error">{}: {}</div>"#,
        html_escape(prefix),
        html_escape(message)
    )
}

/// Generate HTML for one search result row
pub fn thread_row(thread: &Thread, key: &ElementKey, date_format: &str) -> String {
    let date = thread
        .newest_date_secs()
        .map(|secs| format_timestamp(secs, date_format))
        .unwrap_or_default();

    format!(
        r#"<div class="thread" data-key="{}">
<div class="thread-subject">{}</div>
<div class="thread-authors">{}</div>
<div class="thread-date">{}</div>
</div>
"#,
        key,
        html_escape(thread.subject()),
        html_escape(thread.authors()),
        html_escape(&date)
    )
}

/// Generate HTML for the search result list
pub fn thread_list(rows: impl Iterator<Item = String>) -> String {
    let html: String = rows.collect();
    if html.is_empty() {
        loading_html(NO_THREADS)
    } else {
        html
    }
}

/// Generate HTML for one message's headers, its reveal button and the
/// placeholder its content will be rendered into
pub fn message_block(message: &Message, button: &ElementKey, slot: &ElementKey) -> String {
    format!(
        r#"<div class="message">
<div class="message-header">
<strong>From:</strong> {}<br>
<strong>To:</strong> {}<br>
<strong>Date:</strong> {}<br>
<strong>Subject:</strong> {}
</div>
<button data-key="{}">Show Content</button>
<div data-key="{}" class="message-content"></div>
</div>
"#,
        html_escape(message.from()),
        html_escape(message.to()),
        html_escape(message.date()),
        html_escape(message.subject()),
        button,
        slot
    )
}

/// Generate HTML for a message body
///
/// `text/html` content is trusted and inserted verbatim; anything else is
/// escaped inside `<pre>` to keep line breaks.
pub fn message_content(content: &MessageContent) -> String {
    let body = if content.is_html() {
        content.content.clone()
    } else {
        format!("<pre>{}</pre>", html_escape(&content.content))
    };

    let mut html = format!(
        r#"<div class="content-type">{}</div>
<div class="content">{}</div>
"#,
        html_escape(&content.content_type),
        body
    );

    if !content.attachments.is_empty() {
        let names: Vec<String> = content
            .attachments
            .iter()
            .map(|a| html_escape(&a.filename))
            .collect();
        html.push_str(&format!(
            r#"<div class="attachments">Attachments: {}</div>
"#,
            names.join(", ")
        ));
    }

    html
}
