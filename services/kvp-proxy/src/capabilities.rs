//! GetCapabilities document generation from an operator-supplied template.
//!
//! The template is plain XML with `{{ .Protocol }}`, `{{ .Host }}` and
//! `{{ .Path }}` placeholders, filled from the proxy headers of the request
//! so that the advertised URLs point back at this proxy as the client sees it.

use std::path::{Path, PathBuf};

use axum::http::{header, HeaderMap, Uri};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Where the client reached us, as seen through any reverse proxies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostAndPath {
    pub protocol: String,
    pub host: String,
    pub path: String,
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn first_header<'a>(headers: &'a HeaderMap, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| header_value(headers, name))
}

impl HostAndPath {
    /// Derive protocol, host and path, preferring forwarded headers.
    pub fn from_request(uri: &Uri, headers: &HeaderMap) -> Self {
        let protocol = header_value(headers, "x-forwarded-proto")
            .or_else(|| uri.scheme_str())
            .unwrap_or("http");

        // Proxies may append to X-Forwarded-Host; the first entry is the client-facing one.
        let host = first_header(headers, &["x-forward-host", "x-forwarded-host"])
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .or_else(|| header_value(headers, header::HOST.as_str()))
            .or_else(|| uri.authority().map(|authority| authority.as_str()))
            .unwrap_or_default();

        let path = first_header(
            headers,
            &["x-script-name", "x-forwarded-prefix", "x-forwarded-uri"],
        )
        .unwrap_or_else(|| uri.path());

        Self {
            protocol: protocol.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to read capabilities template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown template field '{0}'")]
    UnknownField(String),

    #[error("Unterminated placeholder at byte {0}")]
    Unterminated(usize),
}

/// Produces a capabilities document for a request.
pub trait TemplateRenderer: Send + Sync {
    fn render(&self, context: &HostAndPath) -> Result<String, RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Protocol,
    Host,
    Path,
}

impl Field {
    fn parse(name: &str) -> Result<Self, RenderError> {
        match name {
            ".Protocol" => Ok(Field::Protocol),
            ".Host" => Ok(Field::Host),
            ".Path" => Ok(Field::Path),
            other => Err(RenderError::UnknownField(other.to_string())),
        }
    }

    fn value(self, context: &HostAndPath) -> &str {
        match self {
            Field::Protocol => &context.protocol,
            Field::Host => &context.host,
            Field::Path => &context.path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A capabilities template, parsed once at startup.
#[derive(Debug, Clone)]
pub struct CapabilitiesTemplate {
    segments: Vec<Segment>,
}

impl CapabilitiesTemplate {
    /// Read and parse a template file.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let template = Self::parse(&source)?;
        info!(path = %path.display(), "Loaded capabilities template");
        Ok(template)
    }

    pub fn parse(source: &str) -> Result<Self, RenderError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or(RenderError::Unterminated(offset + start))?;
            segments.push(Segment::Field(Field::parse(after[..end].trim())?));

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }
}

impl TemplateRenderer for CapabilitiesTemplate {
    fn render(&self, context: &HostAndPath) -> Result<String, RenderError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(field.value(context)),
            }
        }
        Ok(out)
    }
}
