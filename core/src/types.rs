//! Caller-facing description of one call.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::http::HttpMethod;

/// Query parameters, encoded in key order.
pub type Query = BTreeMap<String, String>;

/// One call as the caller describes it. Only GET carries a query and only
/// POST/PUT carry a body; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: HttpMethod,
    path: String,
    query: Option<Query>,
    body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>, query: Option<Query>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: None,
            body,
        }
    }

    pub fn put(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: HttpMethod::Put,
            path: path.into(),
            query: None,
            body,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
