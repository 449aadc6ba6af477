//! Role name constants shared by the auth layer and the `admins` table.

/// Role marker required for admin provisioning endpoints.
pub const ROLE_ADMIN: &str = "admin";

/// Default role for every registered user.
pub const ROLE_USER: &str = "user";
