//! English auctions over registered names.
//!
//! An auction for a name moves through `NONE -> OPEN -> EXPIRED -> NONE`:
//! it is opened by the owner, collects bids while the block height is below
//! its dead height, and is settled by the auctor once that height is
//! reached. Presence in the auction store is what makes an auction live.

use cosmwasm_std::{Addr, Response, StdResult, Storage, Uint128};

use crate::error::ContractError;
use crate::ledger::Ledger;
use crate::registry;
use crate::state::{auctions, records, Auction, AuctionState};

pub fn auction_of(store: &dyn Storage, name: &str) -> StdResult<Option<Auction>> {
    auctions::get(store, name)
}

pub fn open(
    store: &mut dyn Storage,
    sender: &Addr,
    name: &str,
    starting_price: Uint128,
    duration: u64,
    height: u64,
) -> Result<Response, ContractError> {
    let record = records::get(store, name)?;
    if !record.is_owned_by(sender) {
        return Err(ContractError::Unauthorized {});
    }
    if auctions::get(store, name)?.is_some() {
        return Err(ContractError::AlreadyAuctioning {
            name: name.to_string(),
        });
    }
    if starting_price.is_zero() {
        return Err(ContractError::ZeroAmount {
            field: "starting_price".to_string(),
        });
    }
    if duration == 0 {
        return Err(ContractError::ZeroDuration {});
    }
    let dead_height = height
        .checked_add(duration)
        .ok_or(ContractError::HeightOverflow { height, duration })?;

    auctions::set(
        store,
        name,
        &Auction::new(sender.clone(), starting_price, dead_height),
    )?;

    Ok(Response::new()
        .add_attribute("action", "auction_name")
        .add_attribute("name", name)
        .add_attribute("auctor", sender)
        .add_attribute("starting_price", starting_price)
        .add_attribute("dead_height", dead_height.to_string()))
}

/// Places or raises `sender`'s bid. A repeat bidder is only charged the
/// difference to their previous bid.
pub fn bid(
    store: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    sender: &Addr,
    name: &str,
    amount: Uint128,
    height: u64,
) -> Result<Response, ContractError> {
    let mut auction = auctions::get(store, name)?.ok_or_else(|| ContractError::NoAuction {
        name: name.to_string(),
    })?;
    if auction.state(height) != AuctionState::Open {
        return Err(ContractError::AuctionExpired {
            name: name.to_string(),
            dead_height: auction.dead_height,
        });
    }
    if *sender == auction.auctor {
        return Err(ContractError::AuctorCannotBid {});
    }
    if amount <= auction.starting_price {
        return Err(ContractError::BidTooLow {
            bid: amount,
            price: auction.starting_price,
        });
    }

    let charge = match auction.bid_of(sender) {
        None => amount,
        Some(previous) if amount > previous.amount => amount - previous.amount,
        Some(previous) => {
            return Err(ContractError::BelowPreviousBid {
                bid: amount,
                previous: previous.amount,
            })
        }
    };
    ledger.debit(sender, charge)?;

    auction.place_bid(sender.clone(), amount);
    auctions::set(store, name, &auction)?;

    Ok(Response::new()
        .add_attribute("action", "auction_bid")
        .add_attribute("name", name)
        .add_attribute("bidder", sender)
        .add_attribute("amount", amount)
        .add_attribute("charged", charge))
}

/// Settles an expired auction. The winner pays their bid to the auctor and
/// takes the name at that price; every other bidder gets their bid back.
/// Without a qualifying bid the name reverts to unregistered.
pub fn reveal(
    store: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    sender: &Addr,
    name: &str,
    height: u64,
) -> Result<Response, ContractError> {
    let auction = auctions::get(store, name)?.ok_or_else(|| ContractError::NoAuction {
        name: name.to_string(),
    })?;
    if *sender != auction.auctor {
        return Err(ContractError::Unauthorized {});
    }
    if auction.state(height) == AuctionState::Open {
        return Err(ContractError::AuctionStillOpen {
            name: name.to_string(),
            dead_height: auction.dead_height,
        });
    }

    let mut res = Response::new()
        .add_attribute("action", "auction_reveal")
        .add_attribute("name", name);

    let winner = auction.winner().cloned();
    let mut refunded = 0u32;
    for bid in &auction.bids {
        if winner.as_ref().map(|w| &w.bidder) != Some(&bid.bidder) {
            ledger.credit(&bid.bidder, bid.amount);
            refunded += 1;
        }
    }

    match winner {
        Some(winner) => {
            ledger.credit(&auction.auctor, winner.amount);

            let mut record = records::get(store, name)?;
            record.owner = Some(winner.bidder.clone());
            record.price = winner.amount;
            records::set(store, name, &record)?;

            res = res
                .add_attribute("winner", winner.bidder)
                .add_attribute("price", winner.amount);
        }
        None => {
            registry::clear(store, name);
            res = res.add_attribute("winner", "");
        }
    }
    auctions::delete(store, name);

    Ok(res.add_attribute("refunded", refunded.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use crate::registry::{buy, whois};
    use crate::state::NameRecord;
    use cosmwasm_std::testing::MockStorage;

    fn addr(s: &str) -> Addr {
        Addr::unchecked(s)
    }

    fn amount(v: u128) -> Uint128 {
        Uint128::new(v)
    }

    /// "owner" holds "alice" bought at 5, with an auction open from height 10 to 20.
    fn setup() -> (MockStorage, MemoryLedger) {
        let mut store = MockStorage::new();
        let mut ledger = MemoryLedger::with_balances(&[
            ("owner", 100),
            ("a", 100),
            ("b", 100),
            ("c", 100),
        ]);
        buy(&mut store, &mut ledger, &addr("owner"), "alice", amount(5)).unwrap();
        open(&mut store, &addr("owner"), "alice", amount(10), 10, 10).unwrap();
        (store, ledger)
    }

    #[test]
    fn open_requires_owner() {
        let (mut store, _) = setup();
        let err = open(&mut store, &addr("a"), "bob", amount(10), 10, 10).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized {});
        let err = open(&mut store, &addr("a"), "alice", amount(10), 10, 10).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized {});
    }

    #[test]
    fn open_twice_is_rejected() {
        let (mut store, _) = setup();
        let err = open(&mut store, &addr("owner"), "alice", amount(20), 5, 12).unwrap_err();
        assert_eq!(
            err,
            ContractError::AlreadyAuctioning {
                name: "alice".to_string()
            }
        );
        assert_eq!(auction_of(&store, "alice").unwrap().unwrap().dead_height, 20);
    }

    #[test]
    fn open_rejects_overflowing_deadline() {
        let mut store = MockStorage::new();
        let mut ledger = MemoryLedger::with_balances(&[("owner", 100)]);
        buy(&mut store, &mut ledger, &addr("owner"), "alice", amount(5)).unwrap();
        let err = open(&mut store, &addr("owner"), "alice", amount(1), u64::MAX, 1).unwrap_err();
        assert_eq!(
            err,
            ContractError::HeightOverflow {
                height: 1,
                duration: u64::MAX
            }
        );
        assert_eq!(auction_of(&store, "alice").unwrap(), None);
    }

    #[test]
    fn repeat_bids_are_charged_incrementally() {
        let (mut store, mut ledger) = setup();
        bid(&mut store, &mut ledger, &addr("a"), "alice", amount(40), 11).unwrap();
        bid(&mut store, &mut ledger, &addr("a"), "alice", amount(55), 12).unwrap();

        assert_eq!(ledger.balance(&addr("a")), amount(45));
        let auction = auction_of(&store, "alice").unwrap().unwrap();
        assert_eq!(auction.bid_of(&addr("a")).unwrap().amount, amount(55));
        assert_eq!(auction.bids.len(), 1);
    }

    #[test]
    fn equal_repeat_bid_is_rejected() {
        let (mut store, mut ledger) = setup();
        bid(&mut store, &mut ledger, &addr("a"), "alice", amount(40), 11).unwrap();
        let before = auction_of(&store, "alice").unwrap();

        let err = bid(&mut store, &mut ledger, &addr("a"), "alice", amount(40), 12).unwrap_err();
        assert_eq!(
            err,
            ContractError::BelowPreviousBid {
                bid: amount(40),
                previous: amount(40)
            }
        );
        assert_eq!(auction_of(&store, "alice").unwrap(), before);
        assert_eq!(ledger.balance(&addr("a")), amount(60));
    }

    #[test]
    fn bid_must_exceed_starting_price() {
        let (mut store, mut ledger) = setup();
        let err = bid(&mut store, &mut ledger, &addr("a"), "alice", amount(10), 11).unwrap_err();
        assert_eq!(
            err,
            ContractError::BidTooLow {
                bid: amount(10),
                price: amount(10)
            }
        );
    }

    #[test]
    fn auctor_cannot_bid() {
        let (mut store, mut ledger) = setup();
        let err = bid(&mut store, &mut ledger, &addr("owner"), "alice", amount(30), 11).unwrap_err();
        assert_eq!(err, ContractError::AuctorCannotBid {});
    }

    #[test]
    fn bid_after_deadline_is_rejected() {
        let (mut store, mut ledger) = setup();
        let err = bid(&mut store, &mut ledger, &addr("a"), "alice", amount(30), 20).unwrap_err();
        assert_eq!(
            err,
            ContractError::AuctionExpired {
                name: "alice".to_string(),
                dead_height: 20
            }
        );
        let err = bid(&mut store, &mut ledger, &addr("a"), "bob", amount(30), 11).unwrap_err();
        assert_eq!(
            err,
            ContractError::NoAuction {
                name: "bob".to_string()
            }
        );
        assert_eq!(ledger.balance(&addr("a")), amount(100));
    }

    #[test]
    fn bid_without_funds_leaves_auction_untouched() {
        let (mut store, mut ledger) = setup();
        let err = bid(&mut store, &mut ledger, &addr("a"), "alice", amount(101), 11).unwrap_err();
        assert!(matches!(err, ContractError::InsufficientFunds { .. }));
        assert!(auction_of(&store, "alice").unwrap().unwrap().bids.is_empty());
    }

    #[test]
    fn reveal_settles_to_highest_bidder() {
        let (mut store, mut ledger) = setup();
        bid(&mut store, &mut ledger, &addr("a"), "alice", amount(50), 11).unwrap();
        bid(&mut store, &mut ledger, &addr("b"), "alice", amount(80), 12).unwrap();
        bid(&mut store, &mut ledger, &addr("c"), "alice", amount(30), 13).unwrap();

        let res = reveal(&mut store, &mut ledger, &addr("owner"), "alice", 20).unwrap();
        assert!(res
            .attributes
            .iter()
            .any(|attr| attr.key == "winner" && attr.value == "b"));

        let record = whois(&store, "alice").unwrap();
        assert_eq!(record.owner, Some(addr("b")));
        assert_eq!(record.price, amount(80));
        // owner paid 5 for the name, gets the winning 80
        assert_eq!(ledger.balance(&addr("owner")), amount(175));
        assert_eq!(ledger.balance(&addr("a")), amount(100));
        assert_eq!(ledger.balance(&addr("b")), amount(20));
        assert_eq!(ledger.balance(&addr("c")), amount(100));
        assert_eq!(auction_of(&store, "alice").unwrap(), None);
    }

    #[test]
    fn reveal_keeps_value() {
        let (mut store, mut ledger) = setup();
        crate::registry::set_value(&mut store, &addr("owner"), "alice", "1.2.3.4").unwrap();
        bid(&mut store, &mut ledger, &addr("a"), "alice", amount(50), 11).unwrap();
        reveal(&mut store, &mut ledger, &addr("owner"), "alice", 25).unwrap();
        assert_eq!(crate::registry::resolve(&store, "alice").unwrap(), "1.2.3.4");
    }

    #[test]
    fn reveal_without_bids_clears_the_name() {
        let (mut store, mut ledger) = setup();
        let before = ledger.clone();

        reveal(&mut store, &mut ledger, &addr("owner"), "alice", 20).unwrap();
        assert_eq!(whois(&store, "alice").unwrap(), NameRecord::default());
        assert_eq!(auction_of(&store, "alice").unwrap(), None);
        assert_eq!(ledger, before);

        // free to buy again
        buy(&mut store, &mut ledger, &addr("a"), "alice", amount(2)).unwrap();
        assert_eq!(whois(&store, "alice").unwrap().owner, Some(addr("a")));
    }

    #[test]
    fn reveal_before_deadline_is_rejected() {
        let (mut store, mut ledger) = setup();
        let err = reveal(&mut store, &mut ledger, &addr("owner"), "alice", 19).unwrap_err();
        assert_eq!(
            err,
            ContractError::AuctionStillOpen {
                name: "alice".to_string(),
                dead_height: 20
            }
        );
        assert!(auction_of(&store, "alice").unwrap().is_some());
    }

    #[test]
    fn reveal_by_stranger_is_rejected() {
        let (mut store, mut ledger) = setup();
        let err = reveal(&mut store, &mut ledger, &addr("a"), "alice", 30).unwrap_err();
        assert_eq!(err, ContractError::Unauthorized {});
        let err = reveal(&mut store, &mut ledger, &addr("owner"), "bob", 30).unwrap_err();
        assert_eq!(
            err,
            ContractError::NoAuction {
                name: "bob".to_string()
            }
        );
    }
}
