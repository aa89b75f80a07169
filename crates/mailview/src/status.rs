//! Global activity indicator

use log::trace;
use std::cell::Cell;
use std::rc::Rc;

use crate::page::Page;

/// Activity state shown by the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ok,
    Error,
}

impl Status {
    /// CSS class applied to the indicator element
    pub fn css_class(self) -> &'static str {
        match self {
            Status::Loading => "status-loading",
            Status::Ok => "status-ok",
            Status::Error => "status-error",
        }
    }
}

/// Holds the latest status and mirrors it onto the page
///
/// No queue and no history: each call overwrites the previous value.
pub struct StatusIndicator {
    current: Cell<Option<Status>>,
    page: Rc<dyn Page>,
}

impl StatusIndicator {
    pub fn new(page: Rc<dyn Page>) -> Self {
        Self {
            current: Cell::new(None),
            page,
        }
    }

    pub fn set(&self, status: Status) {
        trace!("status -> {:?}", status);
        self.current.set(Some(status));
        self.page.set_status_class(status.css_class());
    }

    /// Latest status, `None` before the first load
    pub fn current(&self) -> Option<Status> {
        self.current.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::InMemoryPage;

    #[test]
    fn test_latest_call_wins() {
        let page = Rc::new(InMemoryPage::new());
        let status = StatusIndicator::new(page.clone());
        assert_eq!(status.current(), None);

        status.set(Status::Loading);
        status.set(Status::Error);
        status.set(Status::Ok);

        assert_eq!(status.current(), Some(Status::Ok));
        assert_eq!(
            page.status_classes(),
            vec!["status-loading", "status-error", "status-ok"]
        );
    }
}
