//! Role name constants.
//!
//! `admin` manages users and may delete anything; `staff` edits commitment
//! data within their agreements; `member` has read-only access to the
//! agreements they belong to.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_MEMBER: &str = "member";

/// Whether a role may mutate commitment data.
pub fn can_edit(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_STAFF
}
