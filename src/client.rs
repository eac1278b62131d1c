//! Query transport client and pipeline.

use std::sync::Arc;
use std::time::Duration;

use http::HeaderValue;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, Result};
use crate::hooks::{DataOrigin, Listener, ListenerRegistry};
use crate::request::{HttpMethod, QueryRequest, RequestTemplate};
use crate::response::Response;

/// Builder for creating a query transport client.
pub struct ClientBuilder {
    url: Option<String>,
    template: RequestTemplate,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            url: None,
            template: RequestTemplate::new(),
            http_client: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the endpoint URL. Required.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Use a pre-built request template instead of the default one.
    pub fn template(mut self, template: RequestTemplate) -> Self {
        self.template = template;
        self
    }

    /// Set the HTTP method for all queries (default POST).
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.template = self.template.method(method);
        self
    }

    /// Add a default header sent with every query. Invalid header names
    /// or values are skipped.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        self.template = self.template.header(name, value);
        self
    }

    /// Use an existing transport client instead of building one.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set the request timeout for the built-in transport client.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent for the built-in transport client.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    ///
    /// Fails with [`ClientError::MissingEndpoint`] when no URL was set and
    /// [`ClientError::InvalidUrl`] when it does not parse; no partial
    /// client is produced.
    pub fn build(self) -> Result<Client> {
        let url = Url::parse(&self.url.ok_or(ClientError::MissingEndpoint)?)?;

        let http = match self.http_client {
            Some(client) => client,
            None => {
                let user_agent = self.user_agent.unwrap_or_else(|| {
                    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                });
                let mut builder = reqwest::Client::builder().user_agent(user_agent);
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                builder.build()?
            }
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                http,
                url,
                template: self.template,
                listeners: ListenerRegistry::default(),
            }),
        })
    }
}

struct ClientInner {
    http: reqwest::Client,
    url: Url,
    template: RequestTemplate,
    listeners: ListenerRegistry,
}

/// A query transport client with interception hooks.
///
/// The client builds an HTTP request carrying `{query, variables}`, sends
/// it to the configured endpoint, and returns the decoded JSON response.
/// Three extension points can observe or override each step:
///
/// - a per-call pre-request hook ([`query_with_hook`](Self::query_with_hook),
///   [`execute_with_hook`](Self::execute_with_hook)), whose `Some` return
///   value wins over everything else and skips the network call;
/// - `request` listeners, which may rewrite the outgoing request or
///   short-circuit it the same way;
/// - `response` and `data` listeners, which may substitute the response
///   snapshot and the decoded payload.
///
/// Cloning is cheap; clones share the endpoint, transport, and listeners.
///
/// # Example
///
/// ```ignore
/// use graphql_tap::Client;
///
/// let client = Client::new("https://api.example.com/graphql")?;
/// client.on_data(|data, _| {
///     Ok(Some(serde_json::json!({ "wrapped": data })))
/// });
///
/// let data = client.query("{ users { id name } }").await?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Create a client for the given endpoint with default settings.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().url(url).build()
    }

    /// Create a new builder for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the endpoint URL.
    pub fn url(&self) -> &str {
        self.inner.url.as_str()
    }

    /// Register a `request` listener.
    ///
    /// Fires after the request is built, in registration order. The
    /// listener may mutate the request; returning `Ok(Some(value))`
    /// short-circuits the network call and makes `value` the synthetic
    /// response payload (last non-`None` listener wins).
    pub fn on_request<F>(&self, listener: F) -> &Self
    where
        F: Fn(&mut QueryRequest) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.inner.listeners.push(Listener::Request(Arc::new(listener)));
        self
    }

    /// Register a `response` listener.
    ///
    /// Fires with the raw response snapshot of every real network
    /// exchange; returning `Ok(Some(response))` substitutes the snapshot
    /// that gets JSON-decoded. Never fires for short-circuited queries.
    pub fn on_response<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Response) -> Result<Option<Response>> + Send + Sync + 'static,
    {
        self.inner.listeners.push(Listener::Response(Arc::new(listener)));
        self
    }

    /// Register a `data` listener.
    ///
    /// Fires with every decoded payload — from the network or injected by
    /// a hook, distinguished by the [`DataOrigin`] argument. Returning
    /// `Ok(Some(value))` substitutes the final result.
    pub fn on_data<F>(&self, listener: F) -> &Self
    where
        F: Fn(&Value, DataOrigin) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        self.inner.listeners.push(Listener::Data(Arc::new(listener)));
        self
    }

    /// Build a request for the given query from the client's template.
    ///
    /// Useful for customizing a request before [`execute`](Self::execute).
    pub fn request(&self, query: impl Into<String>) -> QueryRequest {
        self.inner.template.build(query)
    }

    /// Send a query and return the decoded JSON payload.
    pub async fn query(&self, query: impl Into<String>) -> Result<Value> {
        self.execute(self.request(query)).await
    }

    /// Send a query with variables and return the decoded JSON payload.
    pub async fn query_with_variables(
        &self,
        query: impl Into<String>,
        variables: impl Serialize,
    ) -> Result<Value> {
        self.execute(self.request(query).variables(variables)).await
    }

    /// Send a query with variables and a one-shot pre-request hook.
    ///
    /// The hook runs before any `request` listener and may mutate the
    /// request. If it returns `Ok(Some(value))`, the value is the final
    /// result (after `data` listeners see it as synthetic), the network is
    /// never touched, and `request` listeners are not consulted.
    pub async fn query_with_hook<F>(
        &self,
        query: impl Into<String>,
        variables: impl Serialize,
        hook: F,
    ) -> Result<Value>
    where
        F: FnOnce(&mut QueryRequest) -> Result<Option<Value>>,
    {
        self.execute_with_hook(self.request(query).variables(variables), hook)
            .await
    }

    /// Send a query and deserialize the payload into `T`.
    pub async fn query_as<T: DeserializeOwned>(&self, query: impl Into<String>) -> Result<T> {
        let data = self.query(query).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Run the full pipeline on a caller-built request.
    pub async fn execute(&self, mut request: QueryRequest) -> Result<Value> {
        request.ensure_content_type();
        let overridden = self.inner.listeners.emit_request(&mut request)?;
        self.finish(request, overridden).await
    }

    /// Run the full pipeline on a caller-built request with a one-shot
    /// pre-request hook. See [`query_with_hook`](Self::query_with_hook).
    pub async fn execute_with_hook<F>(&self, mut request: QueryRequest, hook: F) -> Result<Value>
    where
        F: FnOnce(&mut QueryRequest) -> Result<Option<Value>>,
    {
        request.ensure_content_type();
        let overridden = match hook(&mut request)? {
            // The hook wins outright; request listeners are not consulted.
            Some(value) => Some(value),
            None => self.inner.listeners.emit_request(&mut request)?,
        };
        self.finish(request, overridden).await
    }

    /// Resolve an override into the final result, or fall through to the
    /// network exchange.
    async fn finish(&self, request: QueryRequest, overridden: Option<Value>) -> Result<Value> {
        match overridden {
            Some(value) => {
                tracing::debug!(
                    target: "graphql_tap::client",
                    "query short-circuited, skipping network call"
                );
                match self.inner.listeners.emit_data(&value, DataOrigin::Synthetic)? {
                    Some(rewritten) => Ok(rewritten),
                    None => Ok(value),
                }
            }
            None => self.perform(request).await,
        }
    }

    /// Perform the real network exchange and run the response/data
    /// listeners over the result.
    async fn perform(&self, request: QueryRequest) -> Result<Value> {
        let body = serde_json::to_string(&request)?;

        tracing::debug!(
            target: "graphql_tap::client",
            method = %request.method,
            url = %self.inner.url,
            "sending query"
        );

        let mut builder = self
            .inner
            .http
            .request(request.method.to_reqwest(), self.inner.url.clone());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let raw = builder.body(body).send().await?;
        let mut response = Response::read(raw).await?;

        if let Some(substitute) = self.inner.listeners.emit_response(&response)? {
            response = substitute;
        }

        // The body is decoded whatever the status; a response listener is
        // the place to enforce status policy.
        let data: Value = response.json()?;

        match self.inner.listeners.emit_data(&data, DataOrigin::Network)? {
            Some(rewritten) => Ok(rewritten),
            None => Ok(data),
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.inner.url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_fails_construction() {
        let err = Client::builder().build().unwrap_err();
        assert!(matches!(err, ClientError::MissingEndpoint));
    }

    #[test]
    fn test_invalid_url_fails_construction() {
        let err = Client::builder().url("not a url").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_builder_defaults() {
        let client = Client::new("https://api.example.com/graphql").unwrap();
        assert_eq!(client.url(), "https://api.example.com/graphql");
    }

    #[test]
    fn test_template_flows_into_requests() {
        let client = Client::builder()
            .url("https://api.example.com/graphql")
            .method(HttpMethod::Put)
            .header("x-api-key", "secret")
            .build()
            .unwrap();

        let request = client.request("{ x }");
        assert_eq!(request.method, HttpMethod::Put);
        assert!(request.headers.contains_key("x-api-key"));
    }
}
