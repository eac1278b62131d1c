//! Query request types.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue};
use serde::Serialize;
use serde_json::Value;

/// HTTP methods a query can be sent with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP POST method (the default for query transport).
    #[default]
    Post,
    /// HTTP GET method.
    Get,
    /// HTTP PUT method.
    Put,
    /// HTTP PATCH method.
    Patch,
    /// HTTP DELETE method.
    Delete,
}

impl HttpMethod {
    /// The method name as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Post => reqwest::Method::POST,
            Self::Get => reqwest::Method::GET,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single query request, ready for the pipeline.
///
/// Serializing a `QueryRequest` yields exactly the wire body:
/// `{"query": …, "variables": …, "operationName": …}` with the optional
/// fields omitted when unset. The transport fields (`method`, `headers`)
/// are not part of the body.
///
/// Hooks and `request` listeners receive `&mut QueryRequest` and may
/// rewrite any of it before the request is sent.
///
/// # Example
///
/// ```ignore
/// let request = QueryRequest::new("query($id: ID!) { user(id: $id) { name } }")
///     .variable("id", "123")
///     .header("x-request-id", "abc");
/// let data = client.execute(request).await?;
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    /// The query string.
    pub query: String,

    /// Optional variables for the query.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,

    /// Optional operation name (for documents with multiple operations).
    #[serde(skip_serializing_if = "Option::is_none", rename = "operationName")]
    pub operation_name: Option<String>,

    /// The HTTP method used to send the request.
    #[serde(skip)]
    pub method: HttpMethod,

    /// Headers sent with the request.
    #[serde(skip)]
    pub headers: HeaderMap,
}

impl QueryRequest {
    /// Create a request for the given query, with default transport
    /// settings (POST, no headers).
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
            method: HttpMethod::default(),
            headers: HeaderMap::new(),
        }
    }

    /// Set a single variable value.
    pub fn variable(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let variables = self
            .variables
            .get_or_insert_with(|| Value::Object(Default::default()));
        if let Value::Object(map) = variables
            && let Ok(value) = serde_json::to_value(value)
        {
            map.insert(name.into(), value);
        }
        self
    }

    /// Set all variables from a serializable value.
    pub fn variables(mut self, variables: impl Serialize) -> Self {
        self.variables = serde_json::to_value(variables).ok();
        self
    }

    /// Set the operation name.
    pub fn operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Set the HTTP method.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a header. Invalid header names or values are skipped.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Insert `content-type: application/json` unless a content-type
    /// header is already present.
    pub(crate) fn ensure_content_type(&mut self) {
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
    }
}

/// Per-client base request configuration.
///
/// The template is fixed once the client is built; every query clones it
/// into a fresh [`QueryRequest`], so concurrent in-flight queries never
/// share request state.
#[derive(Debug, Clone, Default)]
pub struct RequestTemplate {
    method: HttpMethod,
    headers: HeaderMap,
}

impl RequestTemplate {
    /// Create a template with default settings (POST, no headers).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP method for all requests built from this template.
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Add a default header. Invalid header names or values are skipped.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Build a fresh request for the given query.
    pub fn build(&self, query: impl Into<String>) -> QueryRequest {
        QueryRequest {
            query: query.into(),
            variables: None,
            operation_name: None,
            method: self.method,
            headers: self.headers.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let request = QueryRequest::new("{ users { id } }");
        assert_eq!(request.method, HttpMethod::Post);
        assert!(request.variables.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_variables() {
        let request = QueryRequest::new("query($id: ID!) { user(id: $id) { name } }")
            .variable("id", "123")
            .variable("limit", 10);

        let vars = request.variables.unwrap();
        assert_eq!(vars["id"], "123");
        assert_eq!(vars["limit"], 10);
    }

    #[test]
    fn test_wire_body_shape() {
        let body = serde_json::to_value(QueryRequest::new("{ x }")).unwrap();
        assert_eq!(body, json!({"query": "{ x }"}));

        let body =
            serde_json::to_value(QueryRequest::new("{ x }").variables(json!({"a": 1}))).unwrap();
        assert_eq!(body, json!({"query": "{ x }", "variables": {"a": 1}}));
    }

    #[test]
    fn test_explicit_null_variables_serialize() {
        let body =
            serde_json::to_value(QueryRequest::new("{ x }").variables(Value::Null)).unwrap();
        assert_eq!(body, json!({"query": "{ x }", "variables": null}));
    }

    #[test]
    fn test_ensure_content_type() {
        let mut request = QueryRequest::new("{ x }");
        request.ensure_content_type();
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );

        // An existing content-type is left alone.
        let mut request = QueryRequest::new("{ x }").header("content-type", "application/graphql");
        request.ensure_content_type();
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/graphql"
        );
    }

    #[test]
    fn test_template_builds_fresh_requests() {
        let template = RequestTemplate::new()
            .method(HttpMethod::Put)
            .header("x-api-key", "secret");

        let first = template.build("{ a }").header("x-extra", "1");
        let second = template.build("{ b }");

        assert_eq!(first.method, HttpMethod::Put);
        assert!(first.headers.contains_key("x-extra"));
        // Mutating one request never leaks into the template or siblings.
        assert!(!second.headers.contains_key("x-extra"));
        assert!(second.headers.contains_key("x-api-key"));
    }
}
