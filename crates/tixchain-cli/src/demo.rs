use std::path::Path;

use anyhow::{Context, Result};
use tixchain_consensus::{build_engine, ConsensusKind, ConsensusSettings, EngineConfigError};
use tixchain_core::{Blockchain, TicketMetadata, TicketStatus};
use tracing::info;

const EVENT_ID: &str = "EVT-001";
const ARTIST: &str = "Stromae";

/// Plain parcel-tracking chain with no consensus engine.
pub fn logistics_chain() -> Blockchain {
    let mut chain = Blockchain::new();
    chain.add_block("Goods picked up by the carrier");
    chain.add_block("Customs clearance approved");
    chain.add_block("Parcel delivered to the customer");
    chain
}

/// Ticket lifecycle, one engine per step, then no engine for the last two.
pub fn ticketing_chain(settings: &ConsensusSettings) -> Result<Blockchain, EngineConfigError> {
    let steps = [
        (Some(ConsensusKind::Pow), "Ticket created", TicketStatus::Created, "Organizer"),
        (Some(ConsensusKind::Pos), "Ticket purchased", TicketStatus::Purchased, "Alice"),
        (Some(ConsensusKind::Pbft), "Ticket resold", TicketStatus::Resold, "Bob"),
        (Some(ConsensusKind::Poa), "Ticket resold", TicketStatus::Resold, "Charlie"),
        (None, "Ticket used", TicketStatus::Used, "Charlie"),
        (None, "Ticket invalidated", TicketStatus::Invalidated, "Charlie"),
    ];

    let mut chain = Blockchain::new();
    for (kind, data, status, owner) in steps {
        let engine = kind.map(|k| build_engine(k, settings)).transpose()?;
        if chain.consensus_name() != engine.as_ref().map(|e| e.name()) {
            info!(
                "[Consensus: {}]",
                engine.as_ref().map_or("none".to_string(), |e| e.name())
            );
            chain.set_consensus(engine);
        }
        chain.add_ticket_block(data, TicketMetadata::new(EVENT_ID, ARTIST, status, owner));
    }
    Ok(chain)
}

/// Run the full walkthrough and optionally write the ticketing chain to disk.
pub fn run(settings: &ConsensusSettings, export: Option<&Path>) -> Result<Blockchain> {
    info!("========================================");
    info!("  BLOCKCHAIN TRACKING - TICKETING");
    info!("========================================");

    info!("--- Basic chain (logistics tracking) ---");
    let logistics = logistics_chain();
    logistics.display_chain();
    info!("Chain valid? {}", logistics.is_chain_valid());

    info!("--- Ticketing chain ---");
    let ticketing = ticketing_chain(settings)?;
    info!("--- Full ticketing chain ---");
    ticketing.display_chain();
    info!("Ticketing integrity: {}", ticketing.is_chain_valid());

    if let Some(path) = export {
        tixchain_rpc::save_to_file(ticketing.chain(), path)
            .with_context(|| format!("exporting chain to {}", path.display()))?;
    }

    Ok(ticketing)
}
