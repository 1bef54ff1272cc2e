/// The branch a build is made from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_trunk: bool,
}

impl BranchContext {
    /// Create a branch context, comparing against the configured trunk name
    pub fn new(name: impl Into<String>, trunk: &str) -> Self {
        let name = name.into();
        let is_trunk = name == trunk;
        BranchContext { name, is_trunk }
    }

    /// The trunk branch itself
    pub fn trunk(trunk: &str) -> Self {
        BranchContext::new(trunk, trunk)
    }

    /// Local version label for this branch (`+name`), empty on trunk
    pub fn local_suffix(&self) -> String {
        if self.is_trunk {
            String::new()
        } else {
            format!("+{}", self.name)
        }
    }
}
