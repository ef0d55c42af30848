use std::fmt;

/// A place a truck can be sent to or from.
///
/// Wraps the location code used in the Source/Destination CSV columns
/// (§6) instead of a bare `String`, so a typo can't be silently read back
/// as the zero-distance placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location(String);

const PLACEHOLDER: &str = "Placeholder";

impl Location {
    pub fn new(code: impl Into<String>) -> Self {
        Location(code.into())
    }

    /// The synthetic zero-distance location added to every distance
    /// matrix (§3).
    pub fn placeholder() -> Self {
        Location(PLACEHOLDER.to_string())
    }

    pub fn is_placeholder(&self) -> bool {
        self.0 == PLACEHOLDER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(s: &str) -> Self {
        Location(s.to_string())
    }
}

impl From<String> for Location {
    fn from(s: String) -> Self {
        Location(s)
    }
}
