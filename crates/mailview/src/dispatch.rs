//! Event dispatch for rendered elements
//!
//! Markup never embeds entity identifiers in handlers. Each clickable element
//! gets an opaque [`ElementKey`] and the table maps it to a typed [`Action`].
//! Bindings belong to the region that rendered them and are dropped when
//! that region is replaced.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::models::{MessageId, ThreadId};
use crate::page::{ElementKey, Region};

/// What activating an element does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Drill into a thread's messages
    OpenThread(ThreadId),
    /// Reveal one message's content
    ShowContent(MessageId),
}

#[derive(Debug)]
struct Binding {
    owner: Region,
    action: Action,
}

#[derive(Debug)]
struct Slot {
    owner: Region,
    key: ElementKey,
}

#[derive(Debug, Default)]
pub struct DispatchTable {
    next_key: Cell<u64>,
    bindings: RefCell<HashMap<ElementKey, Binding>>,
    slots: RefCell<HashMap<MessageId, Slot>>,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> ElementKey {
        let next = self.next_key.get() + 1;
        self.next_key.set(next);
        ElementKey::new(format!("mv-{}", next))
    }

    /// Bind a fresh element key to `action`, owned by `owner`
    pub fn bind(&self, owner: &Region, action: Action) -> ElementKey {
        let key = self.allocate();
        self.bindings.borrow_mut().insert(
            key.clone(),
            Binding {
                owner: owner.clone(),
                action,
            },
        );
        key
    }

    /// Reserve the content placeholder for `message_id`
    ///
    /// The first reservation for a message wins. A duplicate still gets a
    /// key for its markup, but content is never routed to it.
    pub fn reserve_slot(&self, owner: &Region, message_id: &MessageId) -> ElementKey {
        let key = self.allocate();
        self.slots
            .borrow_mut()
            .entry(message_id.clone())
            .or_insert_with(|| Slot {
                owner: owner.clone(),
                key: key.clone(),
            });
        key
    }

    pub fn resolve(&self, key: &ElementKey) -> Option<Action> {
        self.bindings.borrow().get(key).map(|b| b.action.clone())
    }

    /// Content placeholder currently rendered for `message_id`
    pub fn slot(&self, message_id: &MessageId) -> Option<ElementKey> {
        self.slots.borrow().get(message_id).map(|s| s.key.clone())
    }

    /// Whether `key` is still a live content placeholder
    pub fn is_slot(&self, key: &ElementKey) -> bool {
        self.slots.borrow().values().any(|s| &s.key == key)
    }

    /// Drop every binding and slot rendered by `owner`
    ///
    /// Returns the keys of the dropped slots; their regions went away with
    /// the owner's markup.
    pub fn release(&self, owner: &Region) -> Vec<ElementKey> {
        self.bindings.borrow_mut().retain(|_, b| &b.owner != owner);
        let mut dropped = Vec::new();
        self.slots.borrow_mut().retain(|_, s| {
            if &s.owner == owner {
                dropped.push(s.key.clone());
                false
            } else {
                true
            }
        });
        dropped
    }

    /// Live bindings in render order
    pub fn bindings(&self) -> Vec<(ElementKey, Action)> {
        let mut bound: Vec<(ElementKey, Action)> = self
            .bindings
            .borrow()
            .iter()
            .map(|(key, b)| (key.clone(), b.action.clone()))
            .collect();
        bound.sort_by(|(a, _), (b, _)| {
            (a.as_str().len(), a.as_str()).cmp(&(b.as_str().len(), b.as_str()))
        });
        bound
    }
}
