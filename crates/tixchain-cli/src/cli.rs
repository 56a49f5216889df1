use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tixchain_consensus::{build_engine, ConsensusKind};
use tixchain_core::{digest, Blockchain};
use tracing::{error, info};

use crate::settings::Settings;
use crate::{demo, logging};

#[derive(Parser)]
#[command(name = "tixchain")]
#[command(about = "TIXCHAIN ticketing ledger", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./tixchain.{toml,yaml,json} when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. `debug`
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Walk through a logistics chain and a ticket lifecycle using every engine
    Demo {
        /// Write the ticketing chain as JSON to this file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Start the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Engine attached to the served chain: pow, pos, pbft or poa
        #[arg(long)]
        consensus: Option<ConsensusKind>,
    },

    /// Build the ticketing chain and write it as JSON
    Export {
        #[arg(long, default_value = "blockchain.json")]
        out: PathBuf,
    },

    /// Build the ticketing chain and report its integrity
    Validate,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref());

    // A broken hash primitive makes every later append meaningless.
    digest::self_test().context("hash primitive self test failed; refusing to start")?;

    let settings = Settings::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Demo { export } => {
            demo::run(&settings.consensus, export.as_deref())?;
        }
        Commands::Serve {
            host,
            port,
            consensus,
        } => {
            let host = host.unwrap_or(settings.server.host);
            let port = port.unwrap_or(settings.server.port);
            let ip: IpAddr = host
                .parse()
                .with_context(|| format!("invalid listen host: {}", host))?;

            let mut chain = Blockchain::new();
            if let Some(kind) = consensus.or(settings.consensus.kind) {
                let engine = build_engine(kind, &settings.consensus)
                    .with_context(|| format!("building {} engine", kind))?;
                chain.set_consensus(Some(engine));
            }

            tixchain_rpc::serve(tixchain_rpc::shared(chain), SocketAddr::new(ip, port)).await;
        }
        Commands::Export { out } => {
            let chain = demo::ticketing_chain(&settings.consensus)?;
            tixchain_rpc::save_to_file(chain.chain(), &out)
                .with_context(|| format!("exporting chain to {}", out.display()))?;
            println!("Exported {} blocks to {}", chain.len(), out.display());
        }
        Commands::Validate => {
            let chain = demo::ticketing_chain(&settings.consensus)?;
            match chain.verify() {
                Ok(()) => {
                    info!("Chain of {} blocks is valid", chain.len());
                    println!("Chain valid: true");
                }
                Err(violation) => {
                    error!("{}", violation);
                    println!("Chain valid: false ({})", violation);
                }
            }
        }
    }

    Ok(())
}
