/// Reference to a grouping-type parent. Only constructed when the tracker
/// reports a parent whose type matches the configured grouping type; any
/// other parent is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub key: String,
    pub title: String,
}

/// A fetched tracker issue. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub kind: String,
    pub title: String,
    pub parent: Option<ParentRef>,
}

impl Issue {
    pub fn new(key: impl Into<String>, kind: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            title: title.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, key: impl Into<String>, title: impl Into<String>) -> Self {
        self.parent = Some(ParentRef {
            key: key.into(),
            title: title.into(),
        });
        self
    }
}
