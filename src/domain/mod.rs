//! Domain logic - pure versioning rules independent of git operations

pub mod branch;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use tag::Tag;
pub use version::{LocalSegment, PreReleaseKind, Version};
