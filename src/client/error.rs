use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ClientError {
	/// The service could not be reached or the body could not be read.
	#[error("{0}")]
	Transport(String),
	/// Non-2xx response, with the server's `detail` when it sent one.
	#[error("{}", .detail.as_deref().unwrap_or("request failed"))]
	Server { status: u16, detail: Option<String> },
	/// 2xx response whose body does not have the expected shape.
	#[error("malformed response: {0}")]
	Malformed(String),
}

impl ClientError {
	pub fn kind(&self) -> &'static str {
		match self {
			ClientError::Transport(_) => "transport_error",
			ClientError::Server { .. } => "server_error",
			ClientError::Malformed(_) => "malformed_response",
		}
	}

	/// Message shown next to the route controls.
	pub fn user_message(&self) -> String {
		match self {
			ClientError::Server {
				detail: Some(detail),
				..
			} => format!("Error: {detail}"),
			ClientError::Server {
				status,
				detail: None,
			} => format!("Error: request failed (HTTP {status})"),
			ClientError::Transport(msg) if !msg.is_empty() => format!("Error: {msg}"),
			ClientError::Transport(_) => "Error: service unreachable".to_owned(),
			ClientError::Malformed(msg) => format!("Error: unexpected response ({msg})"),
		}
	}

	/// Builds a [`ClientError::Server`] from a non-2xx body.
	///
	/// Understands `{"detail": "..."}` and the validation form
	/// `{"detail": [{"msg": "..."}, ...]}`.
	pub fn from_response(status: u16, body: &str) -> Self {
		let detail = serde_json::from_str::<Value>(body)
			.ok()
			.and_then(|v| v.get("detail").cloned())
			.and_then(|d| match d {
				Value::String(s) => Some(s),
				Value::Array(items) => {
					let msgs: Vec<String> = items
						.iter()
						.filter_map(|i| i.get("msg").and_then(Value::as_str))
						.map(str::to_owned)
						.collect();
					(!msgs.is_empty()).then(|| msgs.join("; "))
				}
				Value::Null => None,
				other => Some(other.to_string()),
			});
		ClientError::Server { status, detail }
	}
}

impl From<gloo_net::Error> for ClientError {
	fn from(e: gloo_net::Error) -> Self {
		ClientError::Transport(e.to_string())
	}
}
