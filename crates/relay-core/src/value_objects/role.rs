//! Connection role

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role a connection plays inside its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Originates events (the desktop application)
    Publisher,
    /// Consumes events (a browser overlay)
    #[default]
    Viewer,
}

impl Role {
    /// Normalize the role announced in a handshake.
    ///
    /// Only the exact string `"publisher"` selects [`Role::Publisher`]; anything
    /// else, including a different case or a missing value, is a viewer.
    #[must_use]
    pub fn from_handshake(raw: Option<&str>) -> Self {
        match raw {
            Some("publisher") => Self::Publisher,
            _ => Self::Viewer,
        }
    }

    /// Get the lowercase name of this role
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publisher => "publisher",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
