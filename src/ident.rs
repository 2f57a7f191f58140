//! Path-like identifiers (`A::B::C`) used as the sole cross-reference
//! mechanism between data nodes. Equality is structural over all segments.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// One identifier segment plus an optional nested child segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Identifier {
    value: String,
    child: Option<Box<Identifier>>,
}

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Identifier {
            value: value.into(),
            child: None,
        }
    }

    /// Parse a `::`-separated path into nested segments. Empty input is `None`.
    pub fn from_str(identifier: &str) -> Option<Self> {
        if identifier.is_empty() {
            return None;
        }

        let mut previous: Option<Identifier> = None;
        for chunk in identifier.rsplit("::") {
            previous = Some(Identifier {
                value: chunk.to_string(),
                child: previous.map(Box::new),
            });
        }
        previous
    }

    /// Random `xxxx-xxxx-xxxx-xxxx` id in the hex-group shape package data uses.
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Identifier::new(format!(
            "{}-{}-{}-{}",
            &hex[0..4],
            &hex[4..8],
            &hex[8..12],
            &hex[12..16]
        ))
    }

    /// True if `candidate` has the four hyphen-joined 4-character
    /// alphanumeric-group shape package ids use. Modifier `field`
    /// attributes use this to name a constraint or cost instead of a
    /// literal attribute.
    pub fn is_id_shaped(candidate: &str) -> bool {
        let groups: Vec<&str> = candidate.split('-').collect();
        groups.len() == 4
            && groups
                .iter()
                .all(|g| g.len() == 4 && g.chars().all(|c| c.is_ascii_alphanumeric()))
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn child(&self) -> Option<&Identifier> {
        self.child.as_deref()
    }

    /// Deepest segment of the path.
    pub fn last(&self) -> &Identifier {
        match &self.child {
            Some(child) => child.last(),
            None => self,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(child) = &self.child {
            write!(f, "::{child}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_builds_nested_segments() {
        let id = Identifier::from_str("a::b::c").unwrap();
        assert_eq!(id.value(), "a");
        assert_eq!(id.child().unwrap().value(), "b");
        assert_eq!(id.last().value(), "c");
        assert_eq!(id.to_string(), "a::b::c");
    }

    #[test]
    fn equality_is_structural() {
        let a = Identifier::from_str("a::b").unwrap();
        let b = Identifier::from_str("a::b").unwrap();
        let c = Identifier::from_str("a").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn generated_ids_are_id_shaped() {
        let id = Identifier::generate();
        assert!(Identifier::is_id_shaped(id.value()));
    }

    #[test]
    fn id_shape_detection() {
        assert!(Identifier::is_id_shaped("38fe-f863-513a-9012"));
        assert!(!Identifier::is_id_shaped("hidden"));
        assert!(!Identifier::is_id_shaped("38fe-f863-513a"));
        assert!(!Identifier::is_id_shaped("38fe-f863-513a-90123"));
    }
}
