//! Domain models for backend responses

mod message;
mod thread;

pub use message::{Attachment, Message, MessageContent, MessageId};
pub use thread::{Thread, ThreadId};
