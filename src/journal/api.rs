//! Backend routes consumed by the journal bindings.

pub const LOGIN: &str = "/api/login";
pub const SIGNUP: &str = "/api/signup";
pub const CONTACT: &str = "/api/contact";
pub const CONTACT_BY_ID: &str = "/api/contact/:id";
pub const ACCOUNT: &str = "/api/account";
pub const ACCOUNT_BY_ID: &str = "/api/account/:id";
pub const ACCOUNT_PASSWORD: &str = "/api/account/password";
pub const BIOGRAPHY: &str = "/api/biography";
pub const BIOGRAPHY_BY_ID: &str = "/api/biography/:id";
pub const JOURNAL: &str = "/api/journal";
pub const JOURNAL_BY_ID: &str = "/api/journal/:id";
pub const JOURNALS_BY_USER: &str = "/api/journal/user/:user";
pub const STATISTICS_BY_ID: &str = "/api/statistics/:id";
pub const FRIENDS_BY_ID: &str = "/api/friend/:id";
pub const AVATAR: &str = "/Avatar";
pub const ALBUM_IMAGE: &str = "/AlbumImage";

pub const LOGIN_OK: &str = "JJ.LOGIN.OK";
pub const INVALID_LOGIN: &str = "Your login information was invalid. Please try again";
pub const SIGNUP_FAILED: &str =
    "Unable to create this account. Please verify all fields and try again";
