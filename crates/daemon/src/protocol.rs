//! Line-delimited JSON protocol
//!
//! Each request line is one JSON [`Command`]; a blank line asks for the
//! current observation. Each response line is either
//! `{"ok":true,"observation":{...}}` or
//! `{"ok":false,"error":{"code":"...","message":"..."}}`.

use crate::state::StateManager;
use coffeecart_common::{Command, Error, Observation};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl Response {
    fn success(observation: Observation) -> Self {
        Self {
            ok: true,
            observation: Some(observation),
            error: None,
        }
    }

    fn failure(code: &str, message: String) -> Self {
        Self {
            ok: false,
            observation: None,
            error: Some(ErrorBody {
                code: code.to_string(),
                message,
            }),
        }
    }
}

impl From<Error> for Response {
    fn from(e: Error) -> Self {
        Response::failure(e.code(), e.to_string())
    }
}

/// Handle one request line
pub fn handle_line(state: &StateManager, line: &str) -> Response {
    let line = line.trim();
    if line.is_empty() {
        return state.observe().map_or_else(Response::from, Response::success);
    }

    let command: Command = match serde_json::from_str(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("Rejected malformed command: {}", e);
            return Response::failure("invalid_command", e.to_string());
        }
    };

    state.apply(command).map_or_else(Response::from, Response::success)
}
