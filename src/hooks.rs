//! Listener registration and dispatch.
//!
//! A client carries one ordered list of listeners, each attached to one of
//! three events in a query's life:
//!
//! - `request` — fires after the request is built and before it is sent;
//!   may mutate the request, and a `Some` return value short-circuits the
//!   network call entirely.
//! - `response` — fires with the raw response snapshot of a real network
//!   exchange; a `Some` return value replaces the response that gets
//!   JSON-decoded. Never fires for short-circuited queries.
//! - `data` — fires with the decoded payload (network or synthetic,
//!   distinguished by [`DataOrigin`]); a `Some` return value replaces the
//!   final result.
//!
//! Dispatch runs every listener registered for the event, in registration
//! order, and keeps the last non-`None` result. A listener returning `Err`
//! aborts the query with that error.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::Result;
use crate::request::QueryRequest;
use crate::response::Response;

/// Whether a `data` payload came off the wire or was injected by a hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrigin {
    /// Decoded from a real network response.
    Network,
    /// Supplied by a pre-request hook or a `request` listener instead of
    /// a network call.
    Synthetic,
}

impl DataOrigin {
    /// Check if the payload bypassed the network.
    pub fn is_synthetic(self) -> bool {
        matches!(self, Self::Synthetic)
    }
}

/// Type alias for `request` listeners.
pub type RequestListener = Arc<dyn Fn(&mut QueryRequest) -> Result<Option<Value>> + Send + Sync>;

/// Type alias for `response` listeners.
pub type ResponseListener = Arc<dyn Fn(&Response) -> Result<Option<Response>> + Send + Sync>;

/// Type alias for `data` listeners.
pub type DataListener = Arc<dyn Fn(&Value, DataOrigin) -> Result<Option<Value>> + Send + Sync>;

/// A registered listener, typed by the event it fires on.
pub(crate) enum Listener {
    Request(RequestListener),
    Response(ResponseListener),
    Data(DataListener),
}

/// Insertion-ordered listener storage shared by all queries on a client.
///
/// Dispatch snapshots the matching callbacks under the read lock and
/// invokes them after releasing it, so a listener may register further
/// listeners; those apply only to dispatches that have not yet
/// snapshotted.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: RwLock<Vec<Listener>>,
}

impl ListenerRegistry {
    pub(crate) fn push(&self, listener: Listener) {
        self.entries.write().push(listener);
    }

    /// Invoke all `request` listeners; last non-`None` result wins.
    pub(crate) fn emit_request(&self, request: &mut QueryRequest) -> Result<Option<Value>> {
        let listeners: Vec<RequestListener> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter_map(|l| match l {
                    Listener::Request(f) => Some(Arc::clone(f)),
                    _ => None,
                })
                .collect()
        };

        let mut result = None;
        for listener in listeners {
            if let Some(value) = listener(request)? {
                result = Some(value);
            }
        }
        Ok(result)
    }

    /// Invoke all `response` listeners; last non-`None` result wins.
    pub(crate) fn emit_response(&self, response: &Response) -> Result<Option<Response>> {
        let listeners: Vec<ResponseListener> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter_map(|l| match l {
                    Listener::Response(f) => Some(Arc::clone(f)),
                    _ => None,
                })
                .collect()
        };

        let mut result = None;
        for listener in listeners {
            if let Some(value) = listener(response)? {
                result = Some(value);
            }
        }
        Ok(result)
    }

    /// Invoke all `data` listeners with the payload and its origin; last
    /// non-`None` result wins.
    pub(crate) fn emit_data(&self, data: &Value, origin: DataOrigin) -> Result<Option<Value>> {
        let listeners: Vec<DataListener> = {
            let entries = self.entries.read();
            entries
                .iter()
                .filter_map(|l| match l {
                    Listener::Data(f) => Some(Arc::clone(f)),
                    _ => None,
                })
                .collect()
        };

        let mut result = None;
        for listener in listeners {
            if let Some(value) = listener(data, origin)? {
                result = Some(value);
            }
        }
        Ok(result)
    }
}
