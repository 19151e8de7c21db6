use serde_json::Value;

use crate::error::{Error, Result};

/// Error taxonomy of the REST protocol. Each code carries an HTTP status
/// and the camelCase label used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Expired,
    InternalError,
    NotImplemented,
    LimitExceeded,
}

impl ErrorCode {
    pub fn http(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Expired => 410,
            Self::InternalError => 500,
            Self::NotImplemented => 501,
            Self::LimitExceeded => 509,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::BadRequest => "badRequest",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "notFound",
            Self::Expired => "expired",
            Self::InternalError => "internalError",
            Self::NotImplemented => "notImplemented",
            Self::LimitExceeded => "limitExceeded",
        }
    }

    pub fn from_http(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::BadRequest),
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            404 => Some(Self::NotFound),
            410 => Some(Self::Expired),
            500 => Some(Self::InternalError),
            501 => Some(Self::NotImplemented),
            509 => Some(Self::LimitExceeded),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "badRequest" => Some(Self::BadRequest),
            "unauthorized" => Some(Self::Unauthorized),
            "forbidden" => Some(Self::Forbidden),
            "notFound" => Some(Self::NotFound),
            "expired" => Some(Self::Expired),
            "internalError" => Some(Self::InternalError),
            "notImplemented" => Some(Self::NotImplemented),
            "limitExceeded" => Some(Self::LimitExceeded),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Value),
    Error(ResponseError),
}

/// Result of processing one API request: either a payload or an error,
/// plus the correlation id the batch pipeline assigned, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseItem {
    pub id: Option<String>,
    pub outcome: Outcome,
}

impl ResponseItem {
    pub fn success(payload: Value) -> Self {
        Self {
            id: None,
            outcome: Outcome::Success(payload),
        }
    }

    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            id: None,
            outcome: Outcome::Error(ResponseError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Parses the canonical JSON representation of a response item.
    ///
    /// An object with an `error` key is an error item (code given as a
    /// number or a label), an object with a `data` key is a success item
    /// with that payload, and anything else is a success item whose payload
    /// is the whole value. An `id` key on either envelope is kept.
    pub fn from_json(value: Value) -> Result<Self> {
        let map = match value {
            Value::Object(map) => map,
            other => return Ok(Self::success(other)),
        };

        if let Some(error) = map.get("error") {
            return Ok(Self {
                id: parse_id(map.get("id"))?,
                outcome: Outcome::Error(parse_error(error)?),
            });
        }
        if let Some(data) = map.get("data") {
            return Ok(Self {
                id: parse_id(map.get("id"))?,
                outcome: Outcome::Success(data.clone()),
            });
        }

        Ok(Self::success(Value::Object(map)))
    }
}

fn parse_id(value: Option<&Value>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(Error::MalformedResponse(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

fn parse_error(value: &Value) -> Result<ResponseError> {
    let Value::Object(map) = value else {
        return Err(Error::MalformedResponse(format!(
            "error must be an object, got {value}"
        )));
    };

    let code = match map.get("code") {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|status| u16::try_from(status).ok())
            .and_then(ErrorCode::from_http)
            .ok_or_else(|| Error::MalformedResponse(format!("unknown error code: {n}")))?,
        Some(Value::String(label)) => ErrorCode::from_label(label)
            .ok_or_else(|| Error::MalformedResponse(format!("unknown error code: {label}")))?,
        _ => {
            return Err(Error::MalformedResponse(
                "error requires a numeric or label code".into(),
            ));
        }
    };

    let message = match map.get("message") {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(Error::MalformedResponse(format!(
                "error message must be a string, got {other}"
            )));
        }
    };

    Ok(ResponseError { code, message })
}
