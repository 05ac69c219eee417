use std::fmt;

/// Literal segment interleaved between names in the dotted path form.
pub const CHILDREN_SEGMENT: &str = "children";

/// Location of a node: the child names walked from the root.
///
/// The empty path is the root.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut names = self.0.clone();
        names.push(name.into());
        Self(names)
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }

    /// Last segment; `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn starts_with(&self, prefix: &NodePath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// Re-anchor a path that lives under `from` so it lives under `to`.
    pub fn rebase(&self, from: &NodePath, to: &NodePath) -> Option<Self> {
        let rest = self.0.strip_prefix(from.0.as_slice())?;
        let mut names = to.0.clone();
        names.extend(rest.iter().cloned());
        Some(Self(names))
    }
}

/// Dotted form with `children` interleaved, e.g. `children.sample.children.id`.
impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for name in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            first = false;
            write!(f, "{CHILDREN_SEGMENT}.{name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotted_form_interleaves_children() {
        let p = NodePath::from_names(["sample", "id"]);
        assert_eq!(p.to_string(), "children.sample.children.id");
        assert_eq!(NodePath::root().to_string(), "");
    }

    #[test]
    fn test_parent_and_name() {
        let p = NodePath::root().child("a").child("b");
        assert_eq!(p.name(), Some("b"));
        assert_eq!(p.parent(), Some(NodePath::from_names(["a"])));
        assert_eq!(NodePath::root().parent(), None);
        assert_eq!(NodePath::root().name(), None);
    }

    #[test]
    fn test_rebase_moves_descendants() {
        let from = NodePath::from_names(["a"]);
        let to = NodePath::from_names(["z"]);
        let p = NodePath::from_names(["a", "b", "c"]);
        assert_eq!(p.rebase(&from, &to), Some(NodePath::from_names(["z", "b", "c"])));
        assert_eq!(NodePath::from_names(["ab"]).rebase(&from, &to), None);
    }
}
