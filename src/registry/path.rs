//! Folder paths as validated segment sequences
//!
//! A path is an ordered list of folder names from the root; the root itself
//! is the empty sequence. Segments are validated once, when the path is
//! built, which is what makes the `/`-joined storage encoding and the SQL
//! prefix predicate safe: a stored segment can never contain the delimiter.

use std::fmt;

use crate::core::config::validation::MAX_NAME_LENGTH;
use crate::registry::RegistryError;

/// Display name used for the root folder, which has no segment of its own
pub const ROOT_DISPLAY_NAME: &str = "Root";

/// Absolute path of a folder, addressed from the root
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FolderPath {
    segments: Vec<String>,
}

impl FolderPath {
    /// The root path (empty segment sequence)
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Builds a path from pre-existing segments, validating each one
    pub fn from_segments<I, S>(segments: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::root();
        for segment in segments {
            path = path.child(&segment.into())?;
        }
        Ok(path)
    }

    /// Returns the path of the named direct subfolder
    pub fn child(&self, name: &str) -> Result<Self, RegistryError> {
        validate_name(name)?;
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Returns the parent path; the root is its own parent
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, i.e. the folder's own name; `None` for the root
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Name suitable for menu titles; the root gets its reserved display name
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(ROOT_DISPLAY_NAME)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Prefix relation: `true` if `self` is `other` or a descendant of it
    pub fn starts_with(&self, other: &FolderPath) -> bool {
        self.segments.len() >= other.segments.len() && self.segments[..other.segments.len()] == other.segments[..]
    }

    /// Storage encoding: segments joined with `/`; the root encodes to ""
    pub fn encode(&self) -> String {
        self.segments.join("/")
    }

    /// Decodes a stored path. Stored values were validated on the way in,
    /// so a malformed segment here means the database was edited by hand.
    pub fn decode(encoded: &str) -> Result<Self, RegistryError> {
        if encoded.is_empty() {
            return Ok(Self::root());
        }
        Self::from_segments(encoded.split('/'))
    }
}

impl fmt::Display for FolderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Validates a folder name or filename segment
///
/// Rules: non-empty, at most [`MAX_NAME_LENGTH`] characters, no path
/// delimiter, no control characters.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    if name.is_empty() {
        return Err(RegistryError::InvalidName("name must not be empty".to_string()));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(RegistryError::InvalidName(format!(
            "name exceeds {} characters",
            MAX_NAME_LENGTH
        )));
    }
    if name.contains('/') {
        return Err(RegistryError::InvalidName("name must not contain '/'".to_string()));
    }
    if name.chars().any(char::is_control) {
        return Err(RegistryError::InvalidName(
            "name must not contain control characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn root_is_empty_and_its_own_parent() {
        let root = FolderPath::root();
        assert!(root.is_root());
        assert_eq!(root.depth(), 0);
        assert_eq!(root.parent(), root);
        assert_eq!(root.name(), None);
        assert_eq!(root.display_name(), ROOT_DISPLAY_NAME);
    }

    #[test]
    fn child_and_parent_round_trip() {
        let docs = FolderPath::root().child("Docs").unwrap();
        let week1 = docs.child("Week 1").unwrap();
        assert_eq!(week1.segments(), ["Docs", "Week 1"]);
        assert_eq!(week1.name(), Some("Week 1"));
        assert_eq!(week1.parent(), docs);
        assert_eq!(docs.parent(), FolderPath::root());
    }

    #[test]
    fn encode_decode_round_trip() {
        let path = FolderPath::from_segments(["Lectures", "Crypto", "Slides"]).unwrap();
        assert_eq!(path.encode(), "Lectures/Crypto/Slides");
        assert_eq!(FolderPath::decode("Lectures/Crypto/Slides").unwrap(), path);
        assert_eq!(FolderPath::decode("").unwrap(), FolderPath::root());
    }

    #[test]
    fn prefix_relation() {
        let root = FolderPath::root();
        let a = root.child("a").unwrap();
        let ab = a.child("b").unwrap();
        let ax = a.child("bc").unwrap();
        assert!(ab.starts_with(&a));
        assert!(ab.starts_with(&root));
        assert!(ab.starts_with(&ab));
        assert!(!a.starts_with(&ab));
        // "bc" must not count as a descendant of "b"
        assert!(!ax.starts_with(&ab));
    }

    #[test]
    fn validate_rejects_empty_name() {
        assert!(matches!(validate_name(""), Err(RegistryError::InvalidName(_))));
    }

    #[test]
    fn validate_rejects_delimiter_and_control_chars() {
        assert!(matches!(validate_name("a/b"), Err(RegistryError::InvalidName(_))));
        assert!(matches!(validate_name("a\nb"), Err(RegistryError::InvalidName(_))));
        assert!(matches!(validate_name("a\u{0}b"), Err(RegistryError::InvalidName(_))));
    }

    #[test]
    fn validate_enforces_length_bound() {
        let exactly_100 = "x".repeat(100);
        assert!(validate_name(&exactly_100).is_ok());
        let over = "x".repeat(101);
        assert!(matches!(validate_name(&over), Err(RegistryError::InvalidName(_))));
    }

    #[test]
    fn validate_counts_characters_not_bytes() {
        // 100 multibyte characters are within the bound
        let cyrillic = "д".repeat(100);
        assert!(validate_name(&cyrillic).is_ok());
    }
}
