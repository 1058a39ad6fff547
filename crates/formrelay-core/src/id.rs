//! Operation identifiers
//!
//! A request id names the server-side operation a submission element
//! targets ("ORDER_CONFIRM"). Display control and hidden-state encryption
//! policy are keyed by request id, not by URI.

use std::fmt;

/// Target-operation identifier extracted from a submission URI
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        RequestId(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestId({})", self.0)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::new(s)
    }
}

/// Maps a submission target URI to the operation it addresses.
///
/// Injected collaborator: routing schemes differ per application, the
/// engine only needs `Option<RequestId>`.
pub trait RequestIdExtractor: Send + Sync {
    /// Extract the request id from a target URI, `None` if the URI does
    /// not address a routed operation.
    fn extract(&self, uri: &str) -> Option<RequestId>;
}

/// Default extractor for path-routed operations.
///
/// Takes the final path segment, stripping query string, fragment and
/// file extension: `/app/order/ORDER_CONFIRM.do?p=1` -> `ORDER_CONFIRM`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathRequestIdExtractor;

impl RequestIdExtractor for PathRequestIdExtractor {
    fn extract(&self, uri: &str) -> Option<RequestId> {
        let uri = uri.split(['?', '#']).next().unwrap_or("");
        let segment = uri.rsplit('/').next().unwrap_or("");
        let id = match segment.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => segment,
        };
        if id.is_empty() {
            None
        } else {
            Some(RequestId::new(id))
        }
    }
}
