/// Currency identifiers and the integer amount/rate types.
pub mod currency;

/// Directional exchange rates and their registry.
pub mod rate;

/// Per-currency sub-balances and the account holding them.
/// Pure storage, no rules are enforced here.
pub mod account;

/// All rules of a multi-currency account: main currency, deposit, withdrawal,
/// conversion and currency removal.
pub mod manager;

/// Error classification shared across modules.
pub mod error;

/// Turns scripted operation rows into commands executed by [`processor`].
pub mod command;

/// Operation processor interface, plus "in memory" implementation that owns
/// the rate registry and the account manager.
pub mod processor;

/// Driver used by the binary and the integration tests.
pub mod bin_utils;
