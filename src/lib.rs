//! Minimal GraphQL transport client with interception hooks.
//!
//! This crate sends `{query, variables}` payloads to an HTTP endpoint and
//! returns the decoded JSON response, while letting external code
//! intercept and override each step of the exchange. It is deliberately a
//! pass-through: no retries, no caching, no schema awareness.
//!
//! # Querying
//!
//! ```ignore
//! use graphql_tap::Client;
//!
//! let client = Client::new("https://api.example.com/graphql")?;
//!
//! let data = client
//!     .query_with_variables(
//!         "query($id: ID!) { user(id: $id) { name } }",
//!         serde_json::json!({ "id": "123" }),
//!     )
//!     .await?;
//! ```
//!
//! # Interception
//!
//! Three extension points observe or override a query's life cycle:
//!
//! ```ignore
//! // Rewrite every outgoing request.
//! client.on_request(|request| {
//!     request.headers.insert(
//!         http::HeaderName::from_static("x-trace"),
//!         http::HeaderValue::from_static("1"),
//!     );
//!     Ok(None)
//! });
//!
//! // Patch every decoded payload.
//! client.on_data(|data, origin| {
//!     if origin.is_synthetic() {
//!         return Ok(None); // leave injected test data alone
//!     }
//!     Ok(Some(serde_json::json!({ "data": data })))
//! });
//!
//! // Short-circuit a single call with a canned result; the network is
//! // never touched.
//! let fake = client
//!     .query_with_hook("{ x }", serde_json::json!({}), |_req| {
//!         Ok(Some(serde_json::json!({ "x": 1 })))
//!     })
//!     .await?;
//! ```
//!
//! A `Some` return value from a hook or listener is an override; `None`
//! means "no opinion". The per-call hook always wins over `request`
//! listeners; among listeners of one event, the last registered non-`None`
//! result wins. See [`Client`] for the full rules.

mod client;
mod error;
mod hooks;
mod request;
mod response;

pub use client::{Client, ClientBuilder};
pub use error::{ClientError, Result};
pub use hooks::{DataListener, DataOrigin, RequestListener, ResponseListener};
pub use request::{HttpMethod, QueryRequest, RequestTemplate};
pub use response::Response;
