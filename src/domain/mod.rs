mod account;
mod history;
mod ledger;
mod money;
mod transaction;

pub use account::*;
pub use history::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
