use cosmwasm_std::{StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

use cosmwasm_schema::cw_serde;

/// Coarse classification reported in a transaction [`Outcome`](crate::dispatch::Outcome).
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    InsufficientFunds,
    /// The underlying storage can no longer be trusted.
    Fatal,
}

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Name cannot be empty")]
    EmptyName {},

    #[error("Value cannot be empty")]
    EmptyValue {},

    #[error("Denom cannot be empty")]
    EmptyDenom {},

    #[error("Signer address cannot be empty")]
    EmptySigner {},

    #[error("{field} must be positive")]
    ZeroAmount { field: String },

    #[error("Auction duration must be positive")]
    ZeroDuration {},

    #[error("Auction deadline overflows: height {height} + duration {duration}")]
    HeightOverflow { height: u64, duration: u64 },

    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Message signed by {signer} but sent by {sender}")]
    SignerMismatch { signer: String, sender: String },

    #[error("Name {name} already has an owner")]
    NameTaken { name: String },

    #[error("Name {name} is already being auctioned")]
    AlreadyAuctioning { name: String },

    #[error("No auction for name {name}")]
    NoAuction { name: String },

    #[error("Auction for {name} closed at height {dead_height}")]
    AuctionExpired { name: String, dead_height: u64 },

    #[error("Auctor can't bid in their own auction")]
    AuctorCannotBid {},

    #[error("Auction for {name} is still open until height {dead_height}")]
    AuctionStillOpen { name: String, dead_height: u64 },

    #[error("Bid {bid} is not above {price}")]
    BidTooLow { bid: Uint128, price: Uint128 },

    #[error("Bid {bid} is not above previous bid {previous}")]
    BelowPreviousBid { bid: Uint128, previous: Uint128 },

    #[error("Insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds { needed: Uint128, available: Uint128 },
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Std(_) => ErrorKind::Fatal,
            ContractError::Payment(_)
            | ContractError::EmptyName {}
            | ContractError::EmptyValue {}
            | ContractError::EmptyDenom {}
            | ContractError::EmptySigner {}
            | ContractError::ZeroAmount { .. }
            | ContractError::ZeroDuration {}
            | ContractError::HeightOverflow { .. }
            | ContractError::InvalidSnapshot { .. } => ErrorKind::Validation,
            ContractError::Unauthorized {}
            | ContractError::SignerMismatch { .. }
            | ContractError::NameTaken { .. }
            | ContractError::AlreadyAuctioning { .. }
            | ContractError::NoAuction { .. }
            | ContractError::AuctionExpired { .. }
            | ContractError::AuctorCannotBid {}
            | ContractError::AuctionStillOpen { .. } => ErrorKind::Unauthorized,
            ContractError::BidTooLow { .. }
            | ContractError::BelowPreviousBid { .. }
            | ContractError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
        }
    }
}
