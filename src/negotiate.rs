use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
    Atom,
}

impl Format {
    /// Picks the output format for a request.
    ///
    /// An explicit `format` parameter always wins and must name a known
    /// format. Without one, the request content type is consulted, and
    /// requests carrying neither fall back to JSON.
    pub fn negotiate(format_param: Option<&str>, content_type: Option<&str>) -> Result<Self> {
        if let Some(param) = format_param {
            return Self::from_param(param);
        }
        if let Some(content_type) = content_type
            && let Some(fmt) = Self::from_content_type(content_type)
        {
            return Ok(fmt);
        }
        Ok(Self::Json)
    }

    fn from_param(param: &str) -> Result<Self> {
        match param.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "atom" => Ok(Self::Atom),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    fn from_content_type(content_type: &str) -> Option<Self> {
        // Media type only; parameters such as charset do not matter here.
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "application/json" | "text/json" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            "application/atom+xml" => Some(Self::Atom),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Atom => "application/atom+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Atom => "atom",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Xml => write!(f, "xml"),
            Self::Atom => write!(f, "atom"),
        }
    }
}
