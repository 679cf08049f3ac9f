//! Request shapes for the Featureflow API
//!
//! An [`ApiRequest`] is plain data: method, path, query parameters and an
//! optional JSON body. Query parameters and bodies are assembled with
//! [`Params`], which only ever contains keys that were explicitly inserted,
//! so absent optional fields are never serialized as `null`.

use std::fmt;

use serde_json::{Map, Value};

/// HTTP methods used by the Featureflow API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Sparse parameter set used for query strings and bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value unconditionally (builder pattern).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Insert a value only when it is `Some` (builder pattern).
    ///
    /// `Some(false)` is inserted; only `None` is skipped.
    pub fn with_opt<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Render as query-string pairs. Booleans become `true`/`false`.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| {
                let rendered = match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                (k.clone(), rendered)
            })
            .collect()
    }

    /// Convert into a JSON object body.
    pub fn into_body(self) -> Value {
        Value::Object(self.0)
    }
}

/// A single outbound API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, always starting with `/v1`
    pub path: String,
    pub query: Params,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Params::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach query parameters (builder pattern).
    pub fn query(mut self, params: Params) -> Self {
        self.query = params;
        self
    }

    /// Attach a JSON object body (builder pattern).
    pub fn body(mut self, params: Params) -> Self {
        self.body = Some(params.into_body());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn with_opt_skips_none_but_keeps_false() {
        let params = Params::new()
            .with_opt::<bool>("missing", None)
            .with_opt("enabled", Some(false));

        assert!(!params.contains_key("missing"));
        assert_eq!(params.get("enabled"), Some(&json!(false)));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn query_renders_scalars() {
        let params = Params::new()
            .with("projectKey", "acme")
            .with("archived", false);

        let query = params.to_query();
        assert_eq!(query.len(), 2);
        assert!(query.contains(&("projectKey".to_string(), "acme".to_string())));
        assert!(query.contains(&("archived".to_string(), "false".to_string())));
    }

    #[test]
    fn body_is_object_with_only_inserted_keys() {
        let request = ApiRequest::put("/v1/features/acme:flag")
            .body(Params::new().with("name", "Flag"));

        assert_eq!(request.method, Method::Put);
        assert_eq!(request.body, Some(json!({"name": "Flag"})));
        assert!(request.query.is_empty());
    }

    #[test]
    fn get_has_no_body() {
        let request = ApiRequest::get("/v1/projects");
        assert_eq!(request.method.as_str(), "GET");
        assert!(request.body.is_none());
    }

    #[test]
    fn method_converts_to_reqwest() {
        assert_eq!(reqwest::Method::from(Method::Delete), reqwest::Method::DELETE);
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
