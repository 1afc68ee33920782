// src/io/protocol.rs

//! The request/response contract of the decision endpoint.
//!
//! This is transport-agnostic: a caller hands over the method and the decoded
//! JSON body and gets back a status code plus a JSON body to send.

use crate::io::normalize;
use crate::model::role::RoleMap;
use crate::strategy::traits::{Mode, OrderPolicy};
use serde::Serialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::{info, warn};

pub const STATUS_OK: u16 = 200;
pub const STATUS_METHOD_NOT_ALLOWED: u16 = 405;

/// Request method, as far as the endpoint cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Handshake or weekly decision.
    Post,
    /// Liveness probe, no body needed.
    Get,
    Other,
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.trim().to_ascii_uppercase().as_str() {
            "POST" => Method::Post,
            "GET" => Method::Get,
            _ => Method::Other,
        })
    }
}

/// What the handshake says about this bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub algorithm_name: String,
    pub version: String,
    pub student_email: Option<String>,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            algorithm_name: "BullwhipBreaker".to_string(),
            version: format!("v{}", env!("CARGO_PKG_VERSION")),
            student_email: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Supports {
    pub blackbox: bool,
    pub glassbox: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HandshakeResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
    pub algorithm_name: String,
    pub version: String,
    pub supports: Supports,
    pub message: &'static str,
    pub uses_llm: bool,
    pub llm_description: &'static str,
    pub student_comment: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionResponse {
    pub orders: RoleMap<u32>,
}

/// A status code and the JSON body to send with it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn ok(body: impl Serialize) -> Self {
        Self {
            status: STATUS_OK,
            // Plain data structs: serializing them to a Value cannot fail.
            body: serde_json::to_value(body).unwrap_or(Value::Null),
        }
    }
}

/// Decodes a raw request body. Anything that is not a JSON object is treated
/// as an empty one, which decodes to a cold-start decision request.
pub fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return json!({});
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.is_object() => value,
        Ok(_) => {
            warn!("request body is not a JSON object, treating it as empty");
            json!({})
        }
        Err(err) => {
            warn!(error = %err, "request body is not valid JSON, treating it as empty");
            json!({})
        }
    }
}

/// The decision endpoint: a policy plus the identity it reports.
#[derive(Debug)]
pub struct DecisionService {
    policy: Box<dyn OrderPolicy>,
    identity: Identity,
}

impl DecisionService {
    pub fn new(policy: Box<dyn OrderPolicy>, identity: Identity) -> Self {
        Self { policy, identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Answers one request. Never fails: bad fields are coerced, and the only
    /// rejection is for an unsupported method.
    pub fn respond(&self, method: Method, body: &Value) -> Reply {
        match method {
            Method::Get => {
                info!("liveness probe");
                Reply::ok(json!({
                    "ok": true,
                    "status": "online",
                    "algorithm_name": self.identity.algorithm_name,
                    "version": self.identity.version,
                }))
            }
            Method::Other => {
                warn!("rejected request with unsupported method");
                Reply {
                    status: STATUS_METHOD_NOT_ALLOWED,
                    body: json!({ "ok": false, "message": "Method Not Allowed" }),
                }
            }
            Method::Post if body.get("handshake") == Some(&Value::Bool(true)) => {
                info!(algorithm = %self.identity.algorithm_name, "handshake");
                Reply::ok(self.handshake())
            }
            Method::Post => Reply::ok(self.decide(body)),
        }
    }

    fn handshake(&self) -> HandshakeResponse {
        HandshakeResponse {
            ok: true,
            student_email: self.identity.student_email.clone(),
            algorithm_name: self.identity.algorithm_name.clone(),
            version: self.identity.version.clone(),
            supports: Supports {
                blackbox: true,
                glassbox: true,
            },
            message: "BeerBot ready",
            uses_llm: false,
            llm_description: "offline tuning / deterministic heuristics",
            student_comment: "Deterministic PID order-up-to controller with EWMA forecast and rate limiting",
        }
    }

    fn decide(&self, body: &Value) -> DecisionResponse {
        let mode = Mode::from_wire(body.get("mode").and_then(Value::as_str));
        let history = normalize::history(body.get("weeks"));
        let orders = self.policy.decide(&history, mode);
        info!(
            mode = %mode,
            weeks = history.len(),
            policy = self.policy.label(),
            "weekly decision"
        );
        DecisionResponse { orders }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::controller::BullwhipController;

    fn service() -> DecisionService {
        DecisionService::new(Box::new(BullwhipController::default()), Identity::default())
    }

    #[test]
    fn method_parsing_is_case_insensitive() {
        assert_eq!("post".parse::<Method>(), Ok(Method::Post));
        assert_eq!("GET".parse::<Method>(), Ok(Method::Get));
        assert_eq!("DELETE".parse::<Method>(), Ok(Method::Other));
    }

    #[test]
    fn non_post_is_rejected() {
        let reply = service().respond(Method::Other, &json!({"handshake": true}));
        assert_eq!(reply.status, STATUS_METHOD_NOT_ALLOWED);
        assert_eq!(reply.body["ok"], json!(false));
    }

    #[test]
    fn get_is_a_liveness_probe() {
        let reply = service().respond(Method::Get, &Value::Null);
        assert_eq!(reply.status, STATUS_OK);
        assert_eq!(reply.body["status"], json!("online"));
    }

    #[test]
    fn handshake_ignores_other_fields() {
        let reply = service().respond(
            Method::Post,
            &json!({"handshake": true, "weeks": [{"roles": {}}], "mode": "glassbox"}),
        );
        assert_eq!(reply.body["message"], json!("BeerBot ready"));
        assert_eq!(reply.body["supports"]["glassbox"], json!(true));
        assert!(reply.body.get("orders").is_none());
        assert!(reply.body.get("student_email").is_none());
    }

    #[test]
    fn truthy_handshake_string_is_not_a_handshake() {
        let reply = service().respond(Method::Post, &json!({"handshake": "true"}));
        assert!(reply.body.get("orders").is_some());
    }

    #[test]
    fn garbage_body_parses_to_empty_object() {
        assert_eq!(parse_body("{not json"), json!({}));
        assert_eq!(parse_body("[1, 2]"), json!({}));
        assert_eq!(parse_body(""), json!({}));
        assert_eq!(parse_body(r#"{"mode": "glassbox"}"#)["mode"], json!("glassbox"));
    }
}
