use cosmwasm_std::{Addr, Response, StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::state::{records, NameRecord};

/// Value the name resolves to, empty when unregistered.
pub fn resolve(store: &dyn Storage, name: &str) -> StdResult<String> {
    Ok(records::get(store, name)?.value)
}

pub fn whois(store: &dyn Storage, name: &str) -> StdResult<NameRecord> {
    records::get(store, name)
}

pub fn set_value(
    store: &mut dyn Storage,
    sender: &Addr,
    name: &str,
    value: &str,
) -> Result<Response, ContractError> {
    let mut record = records::get(store, name)?;
    if !record.is_owned_by(sender) {
        return Err(ContractError::Unauthorized {});
    }
    record.value = value.to_string();
    records::set(store, name, &record)?;

    Ok(Response::new()
        .add_attribute("action", "set_name")
        .add_attribute("name", name)
        .add_attribute("value", value))
}

/// Direct purchase of an unregistered name. Owned names only change hands
/// through an auction.
pub fn buy(
    store: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    sender: &Addr,
    name: &str,
    bid: Uint128,
) -> Result<Response, ContractError> {
    let mut record = records::get(store, name)?;
    if record.owner.is_some() {
        return Err(ContractError::NameTaken {
            name: name.to_string(),
        });
    }
    if bid <= record.price {
        return Err(ContractError::BidTooLow {
            bid,
            price: record.price,
        });
    }
    ledger.debit(sender, bid)?;

    record.owner = Some(sender.clone());
    record.price = bid;
    records::set(store, name, &record)?;

    Ok(Response::new()
        .add_attribute("action", "buy_name")
        .add_attribute("name", name)
        .add_attribute("owner", sender)
        .add_attribute("price", bid))
}

/// Reverts the name to unregistered.
pub fn clear(store: &mut dyn Storage, name: &str) {
    records::delete(store, name)
}
