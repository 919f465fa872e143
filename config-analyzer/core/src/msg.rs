//! The diagnostic message catalog.

use crate::Collection;
use mesh_config_analyzer_k8s_api::ResourceId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The severity of a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Level {
    Info,
    Warning,
    Error,
}

/// A kind of message, identified by a stable code.
#[derive(Debug, PartialEq, Eq)]
pub struct MessageType {
    pub code: &'static str,
    pub name: &'static str,
    pub level: Level,

    /// Rendered by substituting `{field}` and `{value}`.
    template: &'static str,
}

/// A resource named by another resource could not be found.
pub static REFERENCED_RESOURCE_NOT_FOUND: MessageType = MessageType {
    code: "IST0101",
    name: "ReferencedResourceNotFound",
    level: Level::Error,
    template: "Referenced {field} not found: {value}",
};

/// Identifies the resource a message is about.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Origin {
    pub collection: Collection,
    pub id: ResourceId,
}

/// A single finding reported by an analyzer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub kind: &'static MessageType,

    pub origin: Origin,

    /// Names the field of the origin resource holding the offending value, e.g. `selector`.
    pub field: &'static str,

    pub value: String,
}

// === impl Level ===

impl std::str::FromStr for Level {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("info") {
            return Ok(Self::Info);
        }
        if s.eq_ignore_ascii_case("warning") || s.eq_ignore_ascii_case("warn") {
            return Ok(Self::Warning);
        }
        if s.eq_ignore_ascii_case("error") {
            return Ok(Self::Error);
        }
        Err(InvalidLevel(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("Info"),
            Self::Warning => f.write_str("Warning"),
            Self::Error => f.write_str("Error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid level {0:?}: expected one of Info, Warning, Error")]
pub struct InvalidLevel(String);

// === impl Origin ===

impl Origin {
    pub fn new(collection: Collection, id: ResourceId) -> Self {
        Self { collection, id }
    }
}

/// Renders as `Kind name.namespace`.
impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}.{}",
            self.collection.kind(),
            self.id.name,
            self.id.namespace
        )
    }
}

// === impl Message ===

impl Message {
    pub fn referenced_resource_not_found(
        origin: Origin,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self {
            kind: &REFERENCED_RESOURCE_NOT_FOUND,
            origin,
            field,
            value: value.into(),
        }
    }

    pub fn level(&self) -> Level {
        self.kind.level
    }

    /// The human-readable description of the finding, without level, code or origin.
    pub fn text(&self) -> String {
        self.kind
            .template
            .replace("{field}", self.field)
            .replace("{value}", &format!("{:?}", self.value))
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({}) {}",
            self.kind.level,
            self.kind.code,
            self.origin,
            self.text()
        )
    }
}
