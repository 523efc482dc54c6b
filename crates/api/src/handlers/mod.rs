pub mod common;
pub mod health;
pub mod quotes;

pub use health::health;
pub use quotes::post_quote;
