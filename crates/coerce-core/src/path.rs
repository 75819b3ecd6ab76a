//! # Error Paths
//!
//! A [`Path`] records where a value sits inside nested input. Descending
//! into a map field appends a `"."` separator and the field name; descending
//! into a list element appends `"[i]"`. Paths exist only to make error
//! messages readable and are never used for lookup.

use std::fmt;

/// Location of a value within nested input, as a sequence of segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path, used for the top-level value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from raw segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// The raw segments, separators included.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true for the empty path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of the map field `name` below this path.
    pub fn field(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 2);
        segments.extend_from_slice(&self.segments);
        segments.push(".".to_string());
        segments.push(name.to_string());
        Self { segments }
    }

    /// Path of the list element at `index` below this path.
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{index}]"));
        Self { segments }
    }

    /// Rendered path followed by `": "`, or the empty string when the
    /// rendered path is empty. Error messages start with this.
    pub fn prefix(&self) -> String {
        let rendered = self.to_string();
        if rendered.is_empty() {
            rendered
        } else {
            format!("{rendered}: ")
        }
    }
}

impl fmt::Display for Path {
    /// Concatenates the segments, dropping a leading `"."` so that a field
    /// of the root value renders as `name` rather than `.name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = match self.segments.first() {
            Some(first) if first == "." => &self.segments[1..],
            _ => &self.segments[..],
        };
        for segment in segments {
            f.write_str(segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_empty() {
        let path = Path::root();
        assert!(path.is_root());
        assert_eq!(path.to_string(), "");
        assert_eq!(path.prefix(), "");
    }

    #[test]
    fn top_level_field_drops_leading_dot() {
        let path = Path::root().field("name");
        assert_eq!(path.segments(), &[".", "name"]);
        assert_eq!(path.to_string(), "name");
        assert_eq!(path.prefix(), "name: ");
    }

    #[test]
    fn nested_fields_and_indices() {
        let path = Path::root().field("servers").index(2).field("port");
        assert_eq!(path.to_string(), "servers[2].port");
    }

    #[test]
    fn custom_root_keeps_all_segments() {
        let path = Path::from_segments(["<pa", "th>"]).field("a");
        assert_eq!(path.to_string(), "<path>.a");
        assert_eq!(path.prefix(), "<path>.a: ");
    }

    #[test]
    fn field_does_not_mutate_parent() {
        let parent = Path::from_segments(["top"]);
        let _child = parent.field("x");
        assert_eq!(parent.to_string(), "top");
    }
}
