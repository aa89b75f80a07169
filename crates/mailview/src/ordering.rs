//! Ordering of responses within a region
//!
//! Requests are not serialized per region. By default whichever response
//! settles last is rendered, even if it belongs to an older request. The
//! `LatestRequestWins` policy tags each request with a per-region token and
//! drops responses that were overtaken.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

use crate::page::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Render every response as it arrives; a stale one can overwrite a newer one
    #[default]
    LastArrivalWins,
    /// Discard a response if a newer request for the same region was issued
    LatestRequestWins,
}

/// Token identifying one request against one region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    region: Region,
    token: u64,
}

#[derive(Debug)]
pub struct RequestTokens {
    ordering: ResponseOrdering,
    issued: RefCell<HashMap<Region, u64>>,
}

impl RequestTokens {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            ordering,
            issued: RefCell::new(HashMap::new()),
        }
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    pub fn issue(&self, region: &Region) -> Ticket {
        let mut issued = self.issued.borrow_mut();
        let token = issued.entry(region.clone()).or_insert(0);
        *token += 1;
        Ticket {
            region: region.clone(),
            token: *token,
        }
    }

    /// Drop the counter of a region that no longer exists
    ///
    /// Tickets issued for it are never accepted again.
    pub fn forget(&self, region: &Region) {
        self.issued.borrow_mut().remove(region);
    }

    /// Whether the response for `ticket` may be rendered
    pub fn accepts(&self, ticket: &Ticket) -> bool {
        match self.ordering {
            ResponseOrdering::LastArrivalWins => true,
            ResponseOrdering::LatestRequestWins => {
                self.issued.borrow().get(&ticket.region) == Some(&ticket.token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_arrival_accepts_everything() {
        let tokens = RequestTokens::new(ResponseOrdering::LastArrivalWins);
        let first = tokens.issue(&Region::ThreadList);
        let _second = tokens.issue(&Region::ThreadList);
        assert!(tokens.accepts(&first));
    }

    #[test]
    fn test_latest_request_rejects_overtaken_ticket() {
        let tokens = RequestTokens::new(ResponseOrdering::LatestRequestWins);
        let first = tokens.issue(&Region::ThreadList);
        let second = tokens.issue(&Region::ThreadList);
        let detail = tokens.issue(&Region::MessageView);

        assert!(!tokens.accepts(&first));
        assert!(tokens.accepts(&second));
        assert!(tokens.accepts(&detail));
    }

    #[test]
    fn test_forgotten_region_rejects_its_tickets() {
        let tokens = RequestTokens::new(ResponseOrdering::LatestRequestWins);
        let region = Region::Content(crate::page::ElementKey::new("mv-3"));
        let ticket = tokens.issue(&region);

        tokens.forget(&region);

        assert!(!tokens.accepts(&ticket));
        assert!(tokens.issued.borrow().is_empty());
    }

    #[test]
    fn test_policy_names() {
        let policy: ResponseOrdering = serde_json::from_str(r#""latest_request_wins""#).unwrap();
        assert_eq!(policy, ResponseOrdering::LatestRequestWins);
    }
}
