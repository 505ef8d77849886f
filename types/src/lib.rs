mod access;
mod error;
pub mod maintenance;
mod role;
mod session;

pub use access::{
    Access, AccessGate, CaretakerPolicy, LANDLORD_AREA, LOGIN_PATH, RouteRequirement,
};
pub use error::{Error, Result};
pub use role::{Permission, Role};
pub use session::{CurrentUser, SESSION_COOKIE_NAME, Session, User, UserData};

#[doc(hidden)]
pub use anyhow::anyhow as internal_anyhow_dont_use;
