//! Host page abstraction
//!
//! The controller never touches a document directly. It replaces the markup
//! of named regions and flips a few bits of chrome through [`Page`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

/// Opaque identity of a rendered element, emitted as its `data-key` attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(String);

impl ElementKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A replaceable area of the page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Region {
    /// Search results
    ThreadList,
    /// Messages of the open thread
    MessageView,
    /// Content placeholder of one message inside the message view
    Content(ElementKey),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::ThreadList => f.write_str("thread-list"),
            Region::MessageView => f.write_str("message-view"),
            Region::Content(key) => write!(f, "content {}", key),
        }
    }
}

/// Document operations the controller depends on
pub trait Page {
    /// Replace the inner markup of `region`
    fn replace(&self, region: &Region, html: &str);

    /// Forget a nested region whose container markup was replaced
    fn remove(&self, region: &Region);

    /// Apply the status indicator's visual class
    fn set_status_class(&self, class: &str);

    /// Disable the search control while a top-level load runs
    fn set_search_busy(&self, busy: bool);

    /// Current text of the search input
    fn search_input(&self) -> String;

    fn set_search_input(&self, query: &str);
}

/// Page that keeps region markup in memory
///
/// Records every status class applied, in order, so transitions can be
/// inspected after the fact.
#[derive(Debug, Default)]
pub struct InMemoryPage {
    regions: RefCell<HashMap<Region, String>>,
    status_classes: RefCell<Vec<String>>,
    search_input: RefCell<String>,
    search_busy: RefCell<bool>,
}

impl InMemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup of `region`, if it was ever rendered
    pub fn region(&self, region: &Region) -> Option<String> {
        self.regions.borrow().get(region).cloned()
    }

    /// Every status class applied so far, oldest first
    pub fn status_classes(&self) -> Vec<String> {
        self.status_classes.borrow().clone()
    }

    /// Every rendered region: thread list, message view, then content panels
    pub fn regions(&self) -> Vec<(Region, String)> {
        let mut regions: Vec<(Region, String)> = self
            .regions
            .borrow()
            .iter()
            .map(|(region, html)| (region.clone(), html.clone()))
            .collect();
        regions.sort_by_key(|(region, _)| match region {
            Region::ThreadList => (0, 0, String::new()),
            Region::MessageView => (1, 0, String::new()),
            Region::Content(key) => (2, key.as_str().len(), key.as_str().to_string()),
        });
        regions
    }

    pub fn clear_status_classes(&self) {
        self.status_classes.borrow_mut().clear();
    }

    pub fn is_search_busy(&self) -> bool {
        *self.search_busy.borrow()
    }
}

impl Page for InMemoryPage {
    fn replace(&self, region: &Region, html: &str) {
        self.regions
            .borrow_mut()
            .insert(region.clone(), html.to_string());
    }

    fn remove(&self, region: &Region) {
        self.regions.borrow_mut().remove(region);
    }

    fn set_status_class(&self, class: &str) {
        self.status_classes.borrow_mut().push(class.to_string());
    }

    fn set_search_busy(&self, busy: bool) {
        *self.search_busy.borrow_mut() = busy;
    }

    fn search_input(&self) -> String {
        self.search_input.borrow().clone()
    }

    fn set_search_input(&self, query: &str) {
        *self.search_input.borrow_mut() = query.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_in_page_order() {
        let page = InMemoryPage::new();
        page.replace(&Region::Content(ElementKey::new("mv-10")), "ten");
        page.replace(&Region::Content(ElementKey::new("mv-2")), "two");
        page.replace(&Region::MessageView, "detail");
        page.replace(&Region::ThreadList, "list");

        let names: Vec<String> = page.regions().iter().map(|(r, _)| r.to_string()).collect();
        assert_eq!(
            names,
            vec!["thread-list", "message-view", "content mv-2", "content mv-10"]
        );
    }
}
