//! Quote request, normalized quote and failure contract

pub mod errors;
pub mod request;
pub mod response;

pub use errors::{ErrorReason, MinAmountHint, QuoteFailure, QuoteValidationError};
pub use request::{QuoteRequest, RouteMode, MAX_SLIPPAGE_PERCENT, MAX_TOKEN_DECIMALS};
pub use response::{FeeItem, NormalizedQuote, TxDescriptor};

/// Result type for quote request validation
pub type QuoteValidationResult<T> = Result<T, QuoteValidationError>;
