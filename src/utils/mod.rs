pub mod secret;
pub mod token;

pub use secret::{hash_secret, verify_secret};
pub use token::generate_opaque_token;
