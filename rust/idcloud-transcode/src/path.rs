use std::{convert::Infallible, fmt, str::FromStr};

/// One step of a structural path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named object member.
    Key(String),
    /// Any element of an array, written `[]`.
    Index,
    /// Any member of a dynamically keyed map, written `*`.
    Any,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index => f.write_str("[]"),
            Segment::Any => f.write_str("*"),
        }
    }
}

/// A path pattern such as `excludeCredentials.[].id` or
/// `extensions.prf.evalByCredential.*.first`.
///
/// Segments are separated by `.`. An array segment may stand alone (`a.[].b`)
/// or trail a key (`a[].b`); both parse to the same pattern. Empty segments
/// are ignored, so parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Parse a dotted path pattern.
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        for part in pattern.split('.').filter(|part| !part.is_empty()) {
            let mut key = part;
            let mut arrays = 0;
            while let Some(rest) = key.strip_suffix("[]") {
                key = rest;
                arrays += 1;
            }
            match key {
                "" => {}
                "*" => segments.push(Segment::Any),
                key => segments.push(Segment::Key(key.to_owned())),
            }
            segments.extend(std::iter::repeat_n(Segment::Index, arrays));
        }
        Self(segments)
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Whether this pattern names exactly the node at `path`.
    pub fn matches(&self, path: &ScopedPath) -> bool {
        self.0 == path.segments
    }
}

impl From<&str> for FieldPath {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(pattern))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segments(f, &self.0)
    }
}

/// The path from the root of a tree to the node a transcoder is visiting.
///
/// Children of a wildcard parent appear as [`Segment::Any`] rather than by
/// their real key, so one pattern covers the whole map.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopedPath {
    segments: Vec<Segment>,
}

impl ScopedPath {
    /// The root of a tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// The segments walked so far.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Run `visit` with `segment` appended, restoring the path afterwards.
    pub fn within<T>(&mut self, segment: Segment, visit: impl FnOnce(&mut Self) -> T) -> T {
        self.segments.push(segment);
        let result = visit(self);
        self.segments.pop();
        result
    }
}

/// The concrete path a pattern names, as a transcoder would see it.
impl From<FieldPath> for ScopedPath {
    fn from(pattern: FieldPath) -> Self {
        Self {
            segments: pattern.0,
        }
    }
}

impl fmt::Display for ScopedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_segments(f, &self.segments)
    }
}

fn write_segments(f: &mut fmt::Formatter<'_>, segments: &[Segment]) -> fmt::Result {
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            f.write_str(".")?;
        }
        write!(f, "{segment}")?;
    }
    Ok(())
}
