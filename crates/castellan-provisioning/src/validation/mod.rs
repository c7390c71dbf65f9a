//! Input format validation for registration.

mod email;
mod error;
mod username;

pub use email::validate_email;
pub use error::ValidationError;
pub use username::validate_member_username;
