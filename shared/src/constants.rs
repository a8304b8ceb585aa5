//! Limits shared by the catalog client and server.

/// Maximum length of an app's short description, in characters.
pub const SHORT_DESCRIPTION_MAX_CHARS: usize = 100;

/// Maximum number of additional categories an app may list.
pub const MAX_ADDITIONAL_CATEGORIES: usize = 2;

/// User id reported when the host cannot identify the user.
pub const GUEST_USER_ID: &str = "guest";
