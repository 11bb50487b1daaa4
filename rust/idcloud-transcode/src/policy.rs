use crate::{FieldPath, ScopedPath};

/// How a transcoder treats the node at a given path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    /// Leave the field out of the output entirely.
    Skip,
    /// A byte buffer natively, a base64url string on the wire.
    Binary,
    /// A byte buffer natively, the UTF-8 text of those bytes on the wire.
    Text,
    /// Copy scalars and recurse into arrays and objects.
    Descend,
}

/// Path-keyed transcoding rules.
///
/// A policy is assembled once, usually for a fixed ceremony and protocol
/// version, and read on every pass:
///
/// ```
/// use idcloud_transcode::{FieldPath, PathPolicy, ScopedPath, Treatment};
///
/// let policy = PathPolicy::new()
///     .wildcard(["extensions.prf.evalByCredential"])
///     .binary(["extensions.prf.evalByCredential.*.first"]);
///
/// let parent = ScopedPath::from(FieldPath::parse("extensions.prf.evalByCredential"));
/// assert!(policy.is_wildcard_parent(&parent));
///
/// let child = ScopedPath::from(FieldPath::parse("extensions.prf.evalByCredential.*.first"));
/// assert_eq!(policy.treatment(&child), Treatment::Binary);
/// ```
///
/// When a path is listed under more than one rule, [`Treatment::Skip`] wins
/// over [`Treatment::Binary`], which wins over [`Treatment::Text`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPolicy {
    skip: Vec<FieldPath>,
    binary: Vec<FieldPath>,
    text: Vec<FieldPath>,
    wildcard_parents: Vec<FieldPath>,
}

impl PathPolicy {
    /// A policy that copies everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fields that are dropped in either direction.
    pub fn skip<P: Into<FieldPath>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.skip.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add fields that hold base64url strings on the wire.
    pub fn binary<P: Into<FieldPath>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.binary.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add fields that hold UTF-8 text on the wire but bytes natively.
    pub fn text<P: Into<FieldPath>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.text.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Add parents whose children are keyed dynamically. Their children are
    /// matched as `*` instead of by name.
    pub fn wildcard<P: Into<FieldPath>>(mut self, paths: impl IntoIterator<Item = P>) -> Self {
        self.wildcard_parents
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Resolve the treatment of the node at `path`.
    pub fn treatment(&self, path: &ScopedPath) -> Treatment {
        if any_matches(&self.skip, path) {
            Treatment::Skip
        } else if any_matches(&self.binary, path) {
            Treatment::Binary
        } else if any_matches(&self.text, path) {
            Treatment::Text
        } else {
            Treatment::Descend
        }
    }

    /// Whether the children of the node at `path` are matched as `*`.
    pub fn is_wildcard_parent(&self, path: &ScopedPath) -> bool {
        any_matches(&self.wildcard_parents, path)
    }
}

fn any_matches(patterns: &[FieldPath], path: &ScopedPath) -> bool {
    patterns.iter().any(|pattern| pattern.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(pattern: &str) -> ScopedPath {
        ScopedPath::from(FieldPath::parse(pattern))
    }

    #[idcloud_macros::test]
    fn it_defaults_to_descend() {
        let policy = PathPolicy::new().binary(["challenge"]);

        assert_eq!(policy.treatment(&scoped("rp.id")), Treatment::Descend);
        assert_eq!(policy.treatment(&scoped("challenge")), Treatment::Binary);
    }

    #[idcloud_macros::test]
    fn it_prefers_skip_over_binary_over_text() {
        let policy = PathPolicy::new()
            .text(["user.id"])
            .binary(["user.id", "challenge"])
            .skip(["challenge"]);

        assert_eq!(policy.treatment(&scoped("challenge")), Treatment::Skip);
        assert_eq!(policy.treatment(&scoped("user.id")), Treatment::Binary);
    }

    #[idcloud_macros::test]
    fn it_recognizes_wildcard_parents_exactly() {
        let policy = PathPolicy::new().wildcard(["extensions.prf.evalByCredential"]);

        assert!(policy.is_wildcard_parent(&scoped("extensions.prf.evalByCredential")));
        assert!(!policy.is_wildcard_parent(&scoped("extensions.prf")));
    }
}
