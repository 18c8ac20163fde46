use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{to_vec, Addr, StdResult, Uint128};

use crate::error::ContractError;
use crate::snapshot::Snapshot;
use crate::state::{Auction, AuctionState, Config};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denom names are paid for in
    pub denom: String,
    /// Registry state to start from
    pub snapshot: Option<Snapshot>,
}

/// Contract-facing messages. The signer of every transition is the message sender.
#[cw_serde]
pub enum ExecuteMsg {
    SetName {
        name: String,
        value: String,
    },
    BuyName {
        name: String,
        bid: Uint128,
    },
    AuctionName {
        name: String,
        starting_price: Uint128,
        /// Number of blocks the auction accepts bids for
        duration: u64,
    },
    AuctionBid {
        name: String,
        bid: Uint128,
    },
    AuctionReveal {
        name: String,
    },
}

impl ExecuteMsg {
    pub fn into_name_msg(self, sender: Addr) -> NameMsg {
        match self {
            ExecuteMsg::SetName { name, value } => NameMsg::SetName {
                name,
                value,
                owner: sender,
            },
            ExecuteMsg::BuyName { name, bid } => NameMsg::BuyName {
                name,
                bid,
                buyer: sender,
            },
            ExecuteMsg::AuctionName {
                name,
                starting_price,
                duration,
            } => NameMsg::AuctionName {
                name,
                starting_price,
                duration,
                auctor: sender,
            },
            ExecuteMsg::AuctionBid { name, bid } => NameMsg::AuctionBid {
                name,
                bid,
                buyer: sender,
            },
            ExecuteMsg::AuctionReveal { name } => NameMsg::AuctionReveal {
                name,
                auctor: sender,
            },
        }
    }
}

/// A signed state transition. Each variant names the account that must have
/// signed it.
#[cw_serde]
pub enum NameMsg {
    SetName {
        name: String,
        value: String,
        owner: Addr,
    },
    BuyName {
        name: String,
        bid: Uint128,
        buyer: Addr,
    },
    AuctionName {
        name: String,
        starting_price: Uint128,
        duration: u64,
        auctor: Addr,
    },
    AuctionBid {
        name: String,
        bid: Uint128,
        buyer: Addr,
    },
    AuctionReveal {
        name: String,
        auctor: Addr,
    },
}

impl NameMsg {
    pub fn name(&self) -> &str {
        match self {
            NameMsg::SetName { name, .. }
            | NameMsg::BuyName { name, .. }
            | NameMsg::AuctionName { name, .. }
            | NameMsg::AuctionBid { name, .. }
            | NameMsg::AuctionReveal { name, .. } => name,
        }
    }

    pub fn signer(&self) -> &Addr {
        match self {
            NameMsg::SetName { owner, .. } => owner,
            NameMsg::BuyName { buyer, .. } | NameMsg::AuctionBid { buyer, .. } => buyer,
            NameMsg::AuctionName { auctor, .. } | NameMsg::AuctionReveal { auctor, .. } => auctor,
        }
    }

    /// Stateless field checks.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.signer().as_str().is_empty() {
            return Err(ContractError::EmptySigner {});
        }
        if self.name().is_empty() {
            return Err(ContractError::EmptyName {});
        }
        match self {
            NameMsg::SetName { value, .. } if value.is_empty() => Err(ContractError::EmptyValue {}),
            NameMsg::BuyName { bid, .. } | NameMsg::AuctionBid { bid, .. } if bid.is_zero() => {
                Err(ContractError::ZeroAmount {
                    field: "bid".to_string(),
                })
            }
            NameMsg::AuctionName { starting_price, .. } if starting_price.is_zero() => {
                Err(ContractError::ZeroAmount {
                    field: "starting_price".to_string(),
                })
            }
            NameMsg::AuctionName { duration: 0, .. } => Err(ContractError::ZeroDuration {}),
            _ => Ok(()),
        }
    }

    /// Canonical bytes to sign: JSON with fields in declaration order and no maps.
    pub fn sign_bytes(&self) -> StdResult<Vec<u8>> {
        to_vec(self)
    }
}

/// A transition as delivered by the block: authenticated sender plus message.
#[cw_serde]
pub struct Tx {
    pub sender: Addr,
    pub msg: NameMsg,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ResolveResponse)]
    Resolve { name: String },
    #[returns(WhoisResponse)]
    Whois { name: String },
    #[returns(NamesResponse)]
    Names {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(AuctionResponse)]
    Auction { name: String },
    #[returns(ConfigResponse)]
    Config {},
    #[returns(Snapshot)]
    Export {},
}

// We define a custom struct for each query response
#[cw_serde]
pub struct ResolveResponse {
    pub value: String,
}

#[cw_serde]
pub struct WhoisResponse {
    pub value: String,
    pub owner: Option<Addr>,
    pub price: Uint128,
}

#[cw_serde]
pub struct NamesResponse {
    pub names: Vec<String>,
}

#[cw_serde]
pub struct AuctionResponse {
    pub auction: Option<Auction>,
    /// State at the current block height
    pub state: Option<AuctionState>,
}

#[cw_serde]
pub struct ConfigResponse {
    pub denom: String,
}

impl From<Config> for ConfigResponse {
    fn from(config: Config) -> ConfigResponse {
        ConfigResponse {
            denom: config.denom,
        }
    }
}
