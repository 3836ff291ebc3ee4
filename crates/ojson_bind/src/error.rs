use core::error;
use core::fmt;
use std::borrow::Cow;

use ojson_tree::SyntaxError;

// -----------------------------------------------------------------------------
// Path

/// One step from a parent node to a child during conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// An object member.
    Key(String),
    /// An array element.
    Index(usize),
}

/// The route from the conversion root to a failure point.
///
/// Frames contribute their segment as an error unwinds, so the finished path
/// reads root-first. Rendered in the usual `$.field[3].inner` form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    #[inline]
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Adds `segment` at the root end; called by each enclosing frame.
    pub fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BindError

/// Everything that can go fatally wrong during a conversion.
///
/// All variants except [`Syntax`](Self::Syntax) carry the full root-to-failure
/// [`Path`]; syntax errors are surfaced unchanged from the streaming
/// reader/writer collaborator, which owns its own lexical context.
#[derive(Debug)]
pub enum BindError {
    /// The object graph reaches back into a node currently being converted.
    Cycle {
        type_path: Cow<'static, str>,
        path: Path,
    },
    /// No viable way to build an instance of the target type.
    Construction {
        type_path: Cow<'static, str>,
        reason: Cow<'static, str>,
        path: Path,
    },
    /// Document shape and target type disagree.
    TypeMismatch {
        expected: Cow<'static, str>,
        found: Cow<'static, str>,
        path: Path,
    },
    /// A document key with no counterpart field, under the strict policy.
    UnknownField {
        key: String,
        type_path: Cow<'static, str>,
        path: Path,
    },
    /// A leaf type reached with no converter claiming it.
    Unsupported {
        type_path: Cow<'static, str>,
        path: Path,
    },
    /// The recursion ceiling was hit before the graph bottomed out.
    DepthExceeded { limit: usize, path: Path },
    /// Malformed input, surfaced unchanged from the reader/writer.
    Syntax(SyntaxError),
}

impl BindError {
    /// Adds the enclosing frame's segment at the root end of the path.
    pub fn at(mut self, segment: PathSegment) -> Self {
        if let Some(path) = self.path_mut() {
            path.prepend(segment);
        }
        self
    }

    /// The root-to-failure path, when this error carries one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Cycle { path, .. }
            | Self::Construction { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::UnknownField { path, .. }
            | Self::Unsupported { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
            Self::Syntax(_) => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut Path> {
        match self {
            Self::Cycle { path, .. }
            | Self::Construction { path, .. }
            | Self::TypeMismatch { path, .. }
            | Self::UnknownField { path, .. }
            | Self::Unsupported { path, .. }
            | Self::DepthExceeded { path, .. } => Some(path),
            Self::Syntax(_) => None,
        }
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cycle { type_path, path } => {
                write!(f, "circular reference to `{type_path}` at {path}")
            }
            Self::Construction {
                type_path,
                reason,
                path,
            } => {
                write!(
                    f,
                    "cannot construct `{type_path}` at {path}: {reason}; \
                     register an instance creator for this type"
                )
            }
            Self::TypeMismatch {
                expected,
                found,
                path,
            } => {
                write!(f, "expected {expected}, found {found} at {path}")
            }
            Self::UnknownField {
                key,
                type_path,
                path,
            } => {
                write!(f, "unknown key `{key}` for `{type_path}` at {path}")
            }
            Self::Unsupported { type_path, path } => {
                write!(f, "no converter handles `{type_path}` at {path}")
            }
            Self::DepthExceeded { limit, path } => {
                write!(f, "recursion deeper than {limit} at {path}")
            }
            Self::Syntax(source) => fmt::Display::fmt(source, f),
        }
    }
}

impl error::Error for BindError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Syntax(source) => Some(source),
            _ => None,
        }
    }
}

impl From<SyntaxError> for BindError {
    #[inline]
    fn from(source: SyntaxError) -> Self {
        Self::Syntax(source)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{BindError, Path, PathSegment};

    #[test]
    fn paths_render_root_first() {
        let error = BindError::Unsupported {
            type_path: "x::Leaf".into(),
            path: Path::new(),
        }
        .at(PathSegment::Key("name".into()))
        .at(PathSegment::Index(3))
        .at(PathSegment::Key("items".into()));

        assert_eq!(error.path().unwrap().to_string(), "$.items[3].name");
    }
}
