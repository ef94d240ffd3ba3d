/// Engine wide switches.
///
/// Every flag is off by default.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Options {
    /// Reject spans with `begin > end` or out of accumulation order.
    pub validate: bool,
    /// Sort in-memory sources by accumulation order before feeding them.
    pub sort: bool,
    /// Merge groups whose bounds are exactly one successor step apart.
    pub consolidate: bool,
    /// Reject spans without a tag.
    pub tag_required: bool
}


impl Options {
    pub fn with_validate(mut self, yes: bool) -> Self {
        self.validate = yes;
        self
    }

    pub fn with_sort(mut self, yes: bool) -> Self {
        self.sort = yes;
        self
    }

    pub fn with_consolidate(mut self, yes: bool) -> Self {
        self.consolidate = yes;
        self
    }

    pub fn with_tag_required(mut self, yes: bool) -> Self {
        self.tag_required = yes;
        self
    }
}
