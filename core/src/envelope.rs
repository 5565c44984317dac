//! The RPC envelope and its wire encoding.
//!
//! # Design
//! Every vendor operation goes through one endpoint with one envelope shape:
//!
//! ```text
//! requestobj   = {"inpObj": {operation, sessionid, ...fields, ...common flags}}
//! functionname = executerequest
//! macurl       = <endpoint>
//! sessionid    = <session id, or empty during login>
//! ```
//!
//! form-encoded into a POST body. `encode_request` and `decode_response` are
//! pure so the format is pinned down by unit tests; `HttpTransport` only moves
//! the bytes.

use serde_json::{Map, Value};

use crate::config::CommonOptions;
use crate::error::{MaconomyError, Result};
use crate::http::{HttpRequest, HttpResponse, FORM_CONTENT_TYPE};
use crate::types::Session;

/// Value of the `functionname` form field.
pub const FUNCTION_NAME: &str = "executerequest";

/// Vendor operation names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    GetPeriod,
    SaveTimesheetEntry,
    DeleteTimesheetEntry,
    Search,
    GetTimesheetPeriods,
    GetTimesheetTotals,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::GetPeriod => "getperiod",
            Operation::SaveTimesheetEntry => "savetimesheetentry",
            Operation::DeleteTimesheetEntry => "deletetimesheetentry",
            Operation::Search => "search",
            Operation::GetTimesheetPeriods => "gettimesheetperiods",
            Operation::GetTimesheetTotals => "gettimesheettotals",
        }
    }
}

/// One outbound request before it is put on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcEnvelope {
    pub operation: Operation,
    /// `None` only for login.
    pub session: Option<Session>,
    pub fields: Map<String, Value>,
}

impl RpcEnvelope {
    pub fn new(operation: Operation, session: Option<&Session>, fields: Map<String, Value>) -> Self {
        Self {
            operation,
            session: session.cloned(),
            fields,
        }
    }

    pub fn session_id(&self) -> &str {
        self.session.as_ref().map(Session::as_str).unwrap_or_default()
    }

    /// Build `{"inpObj": {...}}`.
    ///
    /// The common flags are merged last and win over a same-named field.
    /// Every operation except login needs a session.
    pub fn request_object(&self, options: &CommonOptions) -> Result<Value> {
        if self.session.is_none() && self.operation != Operation::Login {
            return Err(MaconomyError::MissingSession);
        }
        let mut inp = self.fields.clone();
        inp.insert("operation".to_string(), Value::from(self.operation.as_str()));
        if let Some(session) = &self.session {
            inp.insert("sessionid".to_string(), Value::from(session.as_str()));
        }
        match serde_json::to_value(options) {
            Ok(Value::Object(flags)) => inp.extend(flags),
            Ok(other) => {
                return Err(MaconomyError::Serialization(format!(
                    "common options must serialize to an object, got {other}"
                )))
            }
            Err(e) => return Err(MaconomyError::Serialization(e.to_string())),
        }

        let mut root = Map::new();
        root.insert("inpObj".to_string(), Value::Object(inp));
        Ok(Value::Object(root))
    }
}

/// Encode an envelope as the form-encoded POST the vendor expects.
pub fn encode_request(
    endpoint: &str,
    envelope: &RpcEnvelope,
    options: &CommonOptions,
) -> Result<HttpRequest> {
    let request_object = envelope.request_object(options)?;
    let json = serde_json::to_string(&request_object)
        .map_err(|e| MaconomyError::Serialization(e.to_string()))?;

    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("requestobj", &json)
        .append_pair("functionname", FUNCTION_NAME)
        .append_pair("macurl", endpoint)
        .append_pair("sessionid", envelope.session_id())
        .finish();

    Ok(HttpRequest {
        url: endpoint.to_string(),
        headers: vec![("content-type".to_string(), FORM_CONTENT_TYPE.to_string())],
        body,
    })
}

/// Parse a response body and check its `ok` flag.
///
/// The HTTP status is not consulted: the vendor reports failures in the
/// body, and a non-JSON body is a `Decode` error whatever the status.
pub fn decode_response(response: HttpResponse) -> Result<Value> {
    let json: Value = match serde_json::from_str(&response.body) {
        Ok(json) => json,
        Err(source) => {
            return Err(MaconomyError::Decode {
                body: response.body,
                source,
            })
        }
    };

    if !is_truthy(json.get("ok")) {
        return Err(MaconomyError::Rpc {
            message: vendor_message(&json),
            response: json,
        });
    }
    Ok(json)
}

/// The vendor is inconsistent about the casing of its message field.
fn vendor_message(json: &Value) -> String {
    ["Message", "message"]
        .iter()
        .filter_map(|key| json.get(*key))
        .filter(|value| is_truthy(Some(value)))
        .map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .next()
        .unwrap_or_else(|| "Unknown".to_string())
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
