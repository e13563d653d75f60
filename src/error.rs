/// Coarse classification shared by every error of the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Referenced currency, sub-balance, rate or rate selection does not exist.
    NotFound,
    /// Account-level context is missing or contradictory.
    InvalidState,
    InsufficientFunds,
    InvalidArgument,
    /// Neither the direct nor the inverse rate is registered.
    RateNotFound,
}
