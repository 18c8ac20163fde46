pub mod auction;
pub mod contract;
pub mod dispatch;
mod error;
pub mod ledger;
pub mod msg;
pub mod registry;
pub mod snapshot;
pub mod staging;
pub mod state;

pub use crate::error::{ContractError, ErrorKind};
