//! # Shared API Types
//!
//! The response envelope and query parameters common to all endpoints.
//! Every handler returns its payload under `result`; the `debug` block is
//! populated only when the client asks for it with `?debug=true`, and for
//! image batches it carries the batch size and the provider that served it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}
