//! Shared domain models

pub mod amount;
pub mod secret_string;
pub mod token;

pub use amount::{Amount, ParseAmountError};
pub use secret_string::SecretString;
pub use token::{ChainId, TokenDescriptor};
