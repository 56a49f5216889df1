use std::convert::Infallible;
use std::sync::Arc;

use parking_lot::Mutex;
use tixchain_core::{Blockchain, CoreError};
use tracing::{info, warn};
use warp::{Filter, Rejection, Reply};

use crate::dto::{BlockRequest, TicketRequest};
use crate::error::{handle_rejection, ApiError};
use crate::export;
use crate::mapper::BlockMapper;

/// One chain shared by every handler. The mutex serializes appends so two
/// requests can never derive their `previous_hash` from the same tip.
pub type SharedChain = Arc<Mutex<Blockchain>>;

pub fn shared(chain: Blockchain) -> SharedChain {
    Arc::new(Mutex::new(chain))
}

fn with_chain(chain: SharedChain) -> impl Filter<Extract = (SharedChain,), Error = Infallible> + Clone {
    warp::any().map(move || chain.clone())
}

/// Every `/api/blockchain` route, without rejection recovery.
pub fn routes(chain: SharedChain) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let get_chain_route = warp::path!("api" / "blockchain" / "chain")
        .and(warp::get())
        .and(with_chain(chain.clone()))
        .and_then(handle_get_chain);

    let get_block_route = warp::path!("api" / "blockchain" / "block" / i64)
        .and(warp::get())
        .and(with_chain(chain.clone()))
        .and_then(handle_get_block);

    let add_block_route = warp::path!("api" / "blockchain" / "block")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_chain(chain.clone()))
        .and_then(handle_add_block);

    let add_ticket_route = warp::path!("api" / "blockchain" / "ticket")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_chain(chain.clone()))
        .and_then(handle_add_ticket);

    let validate_route = warp::path!("api" / "blockchain" / "validate")
        .and(warp::get())
        .and(with_chain(chain.clone()))
        .and_then(handle_validate);

    let export_json_route = warp::path!("api" / "blockchain" / "export")
        .and(warp::get())
        .and(with_chain(chain))
        .and_then(handle_export_json);

    let update_block = warp::path!("api" / "blockchain" / "block" / i64)
        .and(warp::put())
        .and_then(|index| reject_mutation("Update", index));

    let delete_block = warp::path!("api" / "blockchain" / "block" / i64)
        .and(warp::delete())
        .and_then(|index| reject_mutation("Delete", index));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| warp::reply::json(&"ok"));

    get_chain_route
        .or(get_block_route)
        .or(add_block_route)
        .or(add_ticket_route)
        .or(validate_route)
        .or(export_json_route)
        .or(update_block)
        .or(delete_block)
        .or(health)
}

/// Routes with JSON error recovery and request logging.
pub fn api(chain: SharedChain) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    routes(chain)
        .recover(handle_rejection)
        .with(warp::log("tixchain_rpc"))
}

/// Run `f` against the locked chain on the blocking pool. A proof-of-work
/// append may hold the lock for a long time; async workers never wait on it.
async fn with_locked<T, F>(chain: SharedChain, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut Blockchain) -> T + Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&mut *chain.lock()))
        .await
        .map_err(|e| ApiError::Task(e.to_string()))
}

async fn handle_get_chain(chain: SharedChain) -> Result<impl Reply, Rejection> {
    let blocks = with_locked(chain, |chain| BlockMapper::to_response_list(chain.chain())).await?;
    Ok(warp::reply::json(&blocks))
}

async fn handle_get_block(index: i64, chain: SharedChain) -> Result<impl Reply, Rejection> {
    let response = with_locked(chain, move |chain| {
        chain.get_block(index).map(BlockMapper::to_response)
    })
    .await?
    .map_err(ApiError::from)?;
    Ok(warp::reply::json(&response))
}

async fn handle_add_block(request: BlockRequest, chain: SharedChain) -> Result<impl Reply, Rejection> {
    let data = request.into_data();
    let response = with_locked(chain, move |chain| BlockMapper::to_response(chain.add_block(data))).await?;

    info!("Block #{} appended via API", response.index);
    Ok(warp::reply::json(&response))
}

async fn handle_add_ticket(request: TicketRequest, chain: SharedChain) -> Result<impl Reply, Rejection> {
    let (data, ticket) = request.into_parts();
    let response = with_locked(chain, move |chain| {
        BlockMapper::to_response(chain.add_ticket_block(data, ticket))
    })
    .await?;

    info!(
        "Ticket block #{} appended via API (event={}, status={})",
        response.index, response.event_id, response.status
    );
    Ok(warp::reply::json(&response))
}

async fn handle_validate(chain: SharedChain) -> Result<impl Reply, Rejection> {
    let response = with_locked(chain, |chain| {
        let result = chain.verify();
        if let Err(violation) = &result {
            warn!("Validation requested on corrupted chain: {}", violation);
        }
        BlockMapper::to_validation_response(&result, chain.len())
    })
    .await?;
    Ok(warp::reply::json(&response))
}

async fn handle_export_json(chain: SharedChain) -> Result<impl Reply, Rejection> {
    let json = with_locked(chain, |chain| export::to_json_pretty(chain.chain()))
        .await?
        .map_err(ApiError::from)?;
    Ok(warp::reply::with_header(json, "content-type", "application/json"))
}

async fn reject_mutation(operation: &'static str, index: i64) -> Result<warp::reply::Json, Rejection> {
    warn!("{} of block #{} refused", operation, index);
    Err(ApiError::from(CoreError::immutable(operation)).into())
}
