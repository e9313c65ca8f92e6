//! Authentication: session identity and password hashing.

mod password;
mod session;

pub use password::{hash_password, verify_password, PasswordError};
pub use session::{session_layer, CurrentUser, SESSION_USER_ID_KEY};
