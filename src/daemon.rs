//! Daemon IPC wire types (spec §6, C17).
//!
//! Only the request/response JSON shapes are defined here — no socket or
//! process lifecycle, per the design note that the daemon itself is out of
//! scope. `calls`, `warm`, and `extract` are documented as semantically
//! equivalent to the corresponding library calls in [`crate::pipeline`].

use crate::search::SearchHit;
use serde::{Deserialize, Serialize};

/// The recognized request `type` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Status,
    Search,
    Extract,
    Context,
    Calls,
    Warm,
    Stop,
}

/// Per-type request payload, carried under the wire envelope's `params` key.
/// Distinguished on deserialize by which field names are present, since the
/// envelope itself already carries `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestParams {
    Search {
        query: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    Extract {
        path: String,
    },
    UnitId {
        unit_id: String,
    },
}

/// `{type, id, params?}` (spec §6 Daemon IPC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

/// `{id, result?, error?}` (spec §6 Daemon IPC). Exactly one of `result`/
/// `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response<T> {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Response<T> {
    pub fn ok(id: impl Into<String>, result: T) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult {
    pub root_dir: String,
    pub indexed_files: usize,
    pub dirty_files: usize,
    pub record_count: usize,
}

/// One search hit in the daemon's wire shape, distinct from [`SearchHit`]'s
/// internal field names (spec §6: `{file, line, name, signature, docstring,
/// type, score}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultEntry {
    pub file: String,
    pub line: u32,
    pub name: String,
    pub signature: String,
    pub docstring: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub score: f32,
}

impl From<&SearchHit> for SearchResultEntry {
    fn from(hit: &SearchHit) -> Self {
        Self {
            file: hit.payload.file.clone(),
            line: hit.payload.line,
            name: hit.payload.qualified_name.clone(),
            signature: hit.payload.signature.clone(),
            docstring: hit.payload.docstring.clone(),
            kind: hit.payload.kind.clone(),
            score: hit.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub results: Vec<SearchResultEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResult {
    pub path: String,
    pub unit_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextResult {
    pub unit_id: String,
    pub calls: Vec<String>,
    pub called_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallsResult {
    pub unit_id: String,
    pub calls: Vec<String>,
    pub called_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarmResult {
    pub embedded_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResult {
    pub stopped: bool,
}

/// Default Unix-domain socket path (spec §6).
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/gcq.sock";
/// Default loopback TCP port used on platforms without Unix sockets (spec §6).
pub const DEFAULT_TCP_PORT: u16 = 9847;

/// Exit codes used by the CLI binary's human-readable renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Ok = 0,
    InvalidInput = 2,
    NotFound = 3,
    ProviderError = 4,
    Corruption = 5,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_search_round_trips_through_json() {
        let req = Request {
            request_type: RequestType::Search,
            id: "1".into(),
            params: Some(RequestParams::Search {
                query: "parse config".into(),
                limit: Some(5),
                threshold: None,
            }),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"type\":\"search\""));
        assert!(json.contains("\"id\":\"1\""));
        let back: Request = serde_json::from_str(&json).unwrap();
        assert_eq!(back.request_type, RequestType::Search);
        match back.params {
            Some(RequestParams::Search { query, limit, .. }) => {
                assert_eq!(query, "parse config");
                assert_eq!(limit, Some(5));
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn request_stop_has_no_params() {
        let req = Request {
            request_type: RequestType::Stop,
            id: "1".into(),
            params: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"type":"stop","id":"1"}"#);
    }

    #[test]
    fn response_serializes_result_without_error_field() {
        let resp = Response::ok("1", StopResult { stopped: true });
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"result\""));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn response_serializes_error_without_result_field() {
        let resp: Response<StopResult> = Response::err("1", "not found");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"error\":\"not found\""));
        assert!(!json.contains("\"result\""));
    }

    #[test]
    fn search_result_entry_uses_wire_field_names() {
        let hit = SearchHit {
            unit_id: "a.py:f".into(),
            score: 0.9,
            payload: crate::search::UnitPayload {
                qualified_name: "f".into(),
                kind: "function".into(),
                file: "a.py".into(),
                line: 3,
                signature: "def f()".into(),
                docstring: String::new(),
            },
        };
        let entry = SearchResultEntry::from(&hit);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"name\":\"f\""));
        assert!(json.contains("\"type\":\"function\""));
        assert!(!json.contains("qualified_name"));
    }
}
