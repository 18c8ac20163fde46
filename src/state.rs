use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

/// Floor price of any owned name, and the baseline a winning auction bid must exceed.
pub const MIN_PRICE: Uint128 = Uint128::new(1);

#[cw_serde]
pub struct Config {
    /// Native denom bids and purchases are paid in
    pub denom: String,
}

#[cw_serde]
pub struct NameRecord {
    pub value: String,
    pub owner: Option<Addr>,
    pub price: Uint128,
}

impl Default for NameRecord {
    fn default() -> Self {
        NameRecord {
            value: String::new(),
            owner: None,
            price: MIN_PRICE,
        }
    }
}

impl NameRecord {
    pub fn is_owned_by(&self, addr: &Addr) -> bool {
        self.owner.as_ref() == Some(addr)
    }
}

#[cw_serde]
pub struct Bid {
    pub bidder: Addr,
    pub amount: Uint128,
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum AuctionState {
    /// Accepting bids: height < dead_height
    Open,
    /// Waiting for the auctor to settle: height >= dead_height
    Expired,
}

#[cw_serde]
pub struct Auction {
    pub auctor: Addr,
    pub starting_price: Uint128,
    pub dead_height: u64,
    /// One entry per bidder, sorted by bidder address
    pub bids: Vec<Bid>,
}

impl Auction {
    pub fn new(auctor: Addr, starting_price: Uint128, dead_height: u64) -> Self {
        Auction {
            auctor,
            starting_price,
            dead_height,
            bids: vec![],
        }
    }

    pub fn state(&self, height: u64) -> AuctionState {
        if height < self.dead_height {
            AuctionState::Open
        } else {
            AuctionState::Expired
        }
    }

    pub fn bid_of(&self, bidder: &Addr) -> Option<&Bid> {
        self.bids
            .binary_search_by(|b| b.bidder.as_str().cmp(bidder.as_str()))
            .ok()
            .map(|i| &self.bids[i])
    }

    /// Records `amount` as the bidder's total, replacing any earlier bid.
    pub fn place_bid(&mut self, bidder: Addr, amount: Uint128) {
        match self
            .bids
            .binary_search_by(|b| b.bidder.as_str().cmp(bidder.as_str()))
        {
            Ok(i) => self.bids[i].amount = amount,
            Err(i) => self.bids.insert(i, Bid { bidder, amount }),
        }
    }

    /// Highest bid strictly above the floor price. Equal amounts go to the
    /// lexicographically smallest bidder, so the result never depends on
    /// storage iteration order.
    pub fn winner(&self) -> Option<&Bid> {
        self.bids
            .iter()
            .filter(|b| b.amount > MIN_PRICE)
            .max_by(|a, b| {
                a.amount
                    .cmp(&b.amount)
                    .then_with(|| b.bidder.as_str().cmp(a.bidder.as_str()))
            })
    }
}

pub const CONFIG: Item<Config> = Item::new("config");
pub const NAMES: Map<&str, NameRecord> = Map::new("names");
pub const AUCTIONS: Map<&str, Auction> = Map::new("auctions");

/// Record store: name -> ownership record.
pub mod records {
    use super::*;

    pub fn get(store: &dyn Storage, name: &str) -> StdResult<NameRecord> {
        Ok(NAMES.may_load(store, name)?.unwrap_or_default())
    }

    /// Unowned placeholders are never written.
    pub fn set(store: &mut dyn Storage, name: &str, record: &NameRecord) -> StdResult<()> {
        if record.owner.is_none() {
            return Ok(());
        }
        NAMES.save(store, name, record)
    }

    pub fn delete(store: &mut dyn Storage, name: &str) {
        NAMES.remove(store, name)
    }

    pub fn iterate<'a>(
        store: &'a dyn Storage,
    ) -> impl Iterator<Item = StdResult<(String, NameRecord)>> + 'a {
        NAMES.range(store, None, None, Order::Ascending)
    }
}

/// Auction store: name -> live auction.
pub mod auctions {
    use super::*;

    pub fn get(store: &dyn Storage, name: &str) -> StdResult<Option<Auction>> {
        AUCTIONS.may_load(store, name)
    }

    pub fn set(store: &mut dyn Storage, name: &str, auction: &Auction) -> StdResult<()> {
        if auction.auctor.as_str().is_empty() {
            return Ok(());
        }
        AUCTIONS.save(store, name, auction)
    }

    pub fn delete(store: &mut dyn Storage, name: &str) {
        AUCTIONS.remove(store, name)
    }

    pub fn iterate<'a>(
        store: &'a dyn Storage,
    ) -> impl Iterator<Item = StdResult<(String, Auction)>> + 'a {
        AUCTIONS.range(store, None, None, Order::Ascending)
    }
}
