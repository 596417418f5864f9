//! Hierarchical node paths

use std::fmt;

/// A path from the tree root to a node, as an ordered list of names
///
/// Two paths are equal iff their segment sequences are equal. The string
/// form (`/Scene/water/density`) is for display and debugging; it only
/// round-trips when names contain no `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodePath {
    parts: Vec<String>,
}

impl NodePath {
    /// The empty path, rendered as `/`
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from name segments
    pub fn from_parts(parts: Vec<String>) -> Self {
        Self { parts }
    }

    /// A new path with the given name appended
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(name.into());
        Self { parts }
    }

    /// The parent path, or `None` for the empty path
    pub fn parent(&self) -> Option<Self> {
        if self.parts.is_empty() {
            return None;
        }
        Some(Self {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    /// The last segment, or `""` for the empty path
    pub fn name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// The name segments in order
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns true for the empty path
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.parts.join("/"))
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        Self {
            parts: s
                .split('/')
                .filter(|part| !part.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_path_creation() {
        let path = NodePath::new();
        assert_eq!(path.to_string(), "/");
        assert!(path.is_empty());

        let path = NodePath::from_parts(vec!["root".into(), "a".into(), "b".into()]);
        assert_eq!(path.to_string(), "/root/a/b");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_path_parsing() {
        let path = NodePath::from("/root/a/b");
        assert_eq!(path.parts(), ["root", "a", "b"]);

        // Trailing and doubled separators are tolerated
        assert_eq!(NodePath::from("/root/a/b/"), path);
        assert_eq!(NodePath::from("root//a/b"), path);
        assert!(NodePath::from("/").is_empty());
    }

    #[test]
    fn test_path_operations() {
        let path = NodePath::from("/root/a");

        let child = path.child("b");
        assert_eq!(child.to_string(), "/root/a/b");
        assert_eq!(child.name(), "b");

        let parent = path.parent().unwrap();
        assert_eq!(parent.to_string(), "/root");

        assert_eq!(NodePath::from("/root").parent().unwrap(), NodePath::new());
        assert!(NodePath::new().parent().is_none());
        assert_eq!(NodePath::new().name(), "");
    }
}
