#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Order, Response, StdResult,
};
use cw2::set_contract_version;
use cw_storage_plus::Bound;
use cw_utils::may_pay;

use crate::auction::auction_of;
use crate::dispatch::{self, TxContext};
use crate::error::ContractError;
use crate::ledger::FundsLedger;
use crate::msg::{
    AuctionResponse, ConfigResponse, ExecuteMsg, InstantiateMsg, NamesResponse, QueryMsg,
    ResolveResponse, WhoisResponse,
};
use crate::registry::{resolve, whois};
use crate::snapshot::{self, Snapshot};
use crate::state::{Config, CONFIG, NAMES};

// version info for migration info
const CONTRACT_NAME: &str = "crates.io:cw-name-auction";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.denom.is_empty() {
        return Err(ContractError::EmptyDenom {});
    }
    let config = Config { denom: msg.denom };
    CONFIG.save(deps.storage, &config)?;

    let snapshot = msg.snapshot.unwrap_or_default();
    snapshot::import(deps.storage, &snapshot)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("owner", info.sender)
        .add_attribute("denom", config.denom)
        .add_attribute("names", snapshot.names.len().to_string())
        .add_attribute("auctions", snapshot.auctions.len().to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let attached = may_pay(&info, &config.denom)?;

    let mut ledger = FundsLedger::new(info.sender.clone(), config.denom, attached);
    let ctx = TxContext {
        sender: info.sender.clone(),
        height: env.block.height,
    };
    let res = dispatch::execute(
        deps.storage,
        &mut ledger,
        &ctx,
        &msg.into_name_msg(info.sender),
    )?;

    Ok(res.add_messages(ledger.into_bank_msgs()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Resolve { name } => to_binary(&query_resolve(deps, name)?),
        QueryMsg::Whois { name } => to_binary(&query_whois(deps, name)?),
        QueryMsg::Names { start_after, limit } => {
            to_binary(&query_names(deps, start_after, limit)?)
        }
        QueryMsg::Auction { name } => to_binary(&query_auction(deps, env, name)?),
        QueryMsg::Config {} => to_binary::<ConfigResponse>(&CONFIG.load(deps.storage)?.into()),
        QueryMsg::Export {} => to_binary(&query_export(deps)?),
    }
}

fn query_resolve(deps: Deps, name: String) -> StdResult<ResolveResponse> {
    let value = resolve(deps.storage, &name)?;
    Ok(ResolveResponse { value })
}

fn query_whois(deps: Deps, name: String) -> StdResult<WhoisResponse> {
    let record = whois(deps.storage, &name)?;
    Ok(WhoisResponse {
        value: record.value,
        owner: record.owner,
        price: record.price,
    })
}

fn query_names(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<NamesResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(|s| Bound::ExclusiveRaw(s.into_bytes()));
    let names = NAMES
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .collect::<StdResult<Vec<String>>>()?;
    Ok(NamesResponse { names })
}

fn query_auction(deps: Deps, env: Env, name: String) -> StdResult<AuctionResponse> {
    let auction = auction_of(deps.storage, &name)?;
    let state = auction.as_ref().map(|a| a.state(env.block.height));
    Ok(AuctionResponse { auction, state })
}

fn query_export(deps: Deps) -> StdResult<Snapshot> {
    snapshot::export(deps.storage)
}
