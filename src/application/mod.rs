// Application layer: the ledger service and its error type.
// Every client (CLI subcommands, interactive menu, tests) goes through here.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
