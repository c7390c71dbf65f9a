//! Domain records and their directory containers.

mod category;
mod group;
mod user;

pub use category::{GroupCategory, UserCategory};
pub use group::{Group, GROUP_OBJECT_CLASSES};
pub use user::{User, USER_OBJECT_CLASSES};
