//! Database rows and their conversions into the shared client types.

mod document;
mod user;

pub use document::{DocumentRow, SidebarRow};
pub use user::{normalize_email, NewUser, User};
