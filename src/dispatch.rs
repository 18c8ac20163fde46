use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Attribute, Response, StdError, StdResult, Storage};

use crate::auction;
use crate::error::{ContractError, ErrorKind};
use crate::ledger::{JournaledLedger, Ledger, StagedLedger};
use crate::msg::{NameMsg, Tx};
use crate::registry;
use crate::staging::StagedStorage;

/// What the replication layer knows about the transaction being applied.
#[derive(Clone, Debug, PartialEq)]
pub struct TxContext {
    pub sender: Addr,
    pub height: u64,
}

#[cw_serde]
pub struct Outcome {
    pub ok: bool,
    pub error_kind: Option<ErrorKind>,
    pub log: String,
    pub attributes: Vec<Attribute>,
}

impl Outcome {
    fn success(attributes: Vec<Attribute>) -> Self {
        Outcome {
            ok: true,
            error_kind: None,
            log: String::new(),
            attributes,
        }
    }

    fn failure(err: &ContractError) -> Self {
        Outcome {
            ok: false,
            error_kind: Some(err.kind()),
            log: err.to_string(),
            attributes: vec![],
        }
    }
}

/// Applies one message atomically: either every store write and ledger call
/// takes effect, or none does.
pub fn execute(
    storage: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    ctx: &TxContext,
    msg: &NameMsg,
) -> Result<Response, ContractError> {
    msg.validate()?;
    if *msg.signer() != ctx.sender {
        return Err(ContractError::SignerMismatch {
            signer: msg.signer().to_string(),
            sender: ctx.sender.to_string(),
        });
    }

    let mut store = StagedStorage::new(storage);
    let mut funds = StagedLedger::new(ledger);
    match route(&mut store, &mut funds, ctx.height, msg) {
        Ok(res) => {
            funds.commit();
            store.commit();
            Ok(res)
        }
        Err(err) => {
            funds.rollback();
            Err(err)
        }
    }
}

fn route(
    store: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    height: u64,
    msg: &NameMsg,
) -> Result<Response, ContractError> {
    match msg {
        NameMsg::SetName { name, value, owner } => registry::set_value(store, owner, name, value),
        NameMsg::BuyName { name, bid, buyer } => registry::buy(store, ledger, buyer, name, *bid),
        NameMsg::AuctionName {
            name,
            starting_price,
            duration,
            auctor,
        } => auction::open(store, auctor, name, *starting_price, *duration, height),
        NameMsg::AuctionBid { name, bid, buyer } => {
            auction::bid(store, ledger, buyer, name, *bid, height)
        }
        NameMsg::AuctionReveal { name, auctor } => {
            auction::reveal(store, ledger, auctor, name, height)
        }
    }
}

/// Like [`execute`], but reports ordinary failures as an unsuccessful
/// [`Outcome`]. Only store failures are returned as errors.
pub fn apply(
    storage: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    ctx: &TxContext,
    msg: &NameMsg,
) -> StdResult<Outcome> {
    match execute(storage, ledger, ctx, msg) {
        Ok(res) => Ok(Outcome::success(res.attributes)),
        Err(ContractError::Std(err)) => Err(err),
        Err(err) => Ok(Outcome::failure(&err)),
    }
}

/// Applies a block of transactions in order at one height. Each transaction
/// sees the payouts of those before it. A store failure aborts the block and
/// leaves storage and ledger as they were before it.
pub fn apply_batch(
    storage: &mut dyn Storage,
    ledger: &mut dyn Ledger,
    height: u64,
    txs: &[Tx],
) -> Result<Vec<Outcome>, StdError> {
    let mut store = StagedStorage::new(storage);
    let mut funds = JournaledLedger::new(ledger);
    let mut outcomes = Vec::with_capacity(txs.len());
    for tx in txs {
        let ctx = TxContext {
            sender: tx.sender.clone(),
            height,
        };
        match apply(&mut store, &mut funds, &ctx, &tx.msg) {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                funds.rollback();
                return Err(err);
            }
        }
    }
    store.commit();
    Ok(outcomes)
}
