//! Workspace (tenant) entities.

pub mod member;
pub mod model;
pub mod role;

pub use member::WorkspaceMember;
pub use model::{CreateWorkspace, MemberWorkspace, Workspace, slugify};
pub use role::WorkspaceRole;
