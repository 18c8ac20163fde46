use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdResult, Storage};

use crate::error::ContractError;
use crate::state::{auctions, records, Auction, NameRecord, MIN_PRICE};

#[cw_serde]
pub struct NameEntry {
    pub name: String,
    pub record: NameRecord,
}

#[cw_serde]
pub struct AuctionEntry {
    pub name: String,
    pub auction: Auction,
}

/// Full registry state. Entries are ordered by name and bids by bidder, so
/// equal states serialize to equal bytes.
#[cw_serde]
#[derive(Default)]
pub struct Snapshot {
    pub names: Vec<NameEntry>,
    pub auctions: Vec<AuctionEntry>,
}

pub fn export(store: &dyn Storage) -> StdResult<Snapshot> {
    let names = records::iterate(store)
        .map(|item| item.map(|(name, record)| NameEntry { name, record }))
        .collect::<StdResult<Vec<_>>>()?;
    let auctions = auctions::iterate(store)
        .map(|item| item.map(|(name, auction)| AuctionEntry { name, auction }))
        .collect::<StdResult<Vec<_>>>()?;
    Ok(Snapshot { names, auctions })
}

/// Writes every entry of a valid snapshot. Nothing is written if any entry is invalid.
///
/// An owned name must carry a value, so a state holding a bought name whose
/// value was never set exports fine but does not import.
pub fn import(store: &mut dyn Storage, snapshot: &Snapshot) -> Result<(), ContractError> {
    snapshot.validate()?;
    for entry in &snapshot.names {
        records::set(store, &entry.name, &entry.record)?;
    }
    for entry in &snapshot.auctions {
        auctions::set(store, &entry.name, &entry.auction)?;
    }
    Ok(())
}

fn invalid(reason: String) -> ContractError {
    ContractError::InvalidSnapshot { reason }
}

impl Snapshot {
    pub fn validate(&self) -> Result<(), ContractError> {
        let mut prev: Option<&str> = None;
        for NameEntry { name, record } in &self.names {
            check_order(&mut prev, name, "name record")?;
            let owner = match &record.owner {
                Some(owner) if !owner.as_str().is_empty() => owner,
                _ => return Err(invalid(format!("name record {}: missing owner", name))),
            };
            if record.value.is_empty() {
                return Err(invalid(format!(
                    "name record {} (owner {}): missing value",
                    name, owner
                )));
            }
            if record.price < MIN_PRICE {
                return Err(invalid(format!(
                    "name record {}: price {} below floor {}",
                    name, record.price, MIN_PRICE
                )));
            }
        }

        let mut prev: Option<&str> = None;
        for AuctionEntry { name, auction } in &self.auctions {
            check_order(&mut prev, name, "auction")?;
            if auction.auctor.as_str().is_empty() {
                return Err(invalid(format!("auction {}: missing auctor", name)));
            }
            if auction.starting_price.is_zero() {
                return Err(invalid(format!("auction {}: missing starting price", name)));
            }
            if auction.dead_height == 0 {
                return Err(invalid(format!("auction {}: missing dead height", name)));
            }
            let owner = self
                .names
                .binary_search_by(|entry| entry.name.as_str().cmp(name.as_str()))
                .ok()
                .and_then(|i| self.names[i].record.owner.as_ref());
            if owner != Some(&auction.auctor) {
                return Err(invalid(format!(
                    "auction {}: auctor {} does not own the name",
                    name, auction.auctor
                )));
            }
            for pair in auction.bids.windows(2) {
                if pair[0].bidder.as_str() >= pair[1].bidder.as_str() {
                    return Err(invalid(format!(
                        "auction {}: bids not sorted by bidder at {}",
                        name, pair[1].bidder
                    )));
                }
            }
            if let Some(bid) = auction.bids.iter().find(|bid| bid.amount.is_zero()) {
                return Err(invalid(format!(
                    "auction {}: zero bid from {}",
                    name, bid.bidder
                )));
            }
        }
        Ok(())
    }
}

fn check_order<'a>(
    prev: &mut Option<&'a str>,
    name: &'a str,
    what: &str,
) -> Result<(), ContractError> {
    if name.is_empty() {
        return Err(invalid(format!("{} with empty name", what)));
    }
    if let Some(prev) = prev {
        if *prev >= name {
            return Err(invalid(format!(
                "{} {} is duplicated or out of order",
                what, name
            )));
        }
    }
    *prev = Some(name);
    Ok(())
}
