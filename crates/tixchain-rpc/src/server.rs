use std::net::SocketAddr;

use tracing::info;

use crate::routes::{api, SharedChain};

/// Serve the HTTP API until the process is stopped.
pub async fn serve(chain: SharedChain, addr: SocketAddr) {
    info!("TIXCHAIN API running at http://{}", addr);
    info!("  GET    /api/blockchain/chain        - full chain");
    info!("  GET    /api/blockchain/block/{{i}}    - block by index");
    info!("  POST   /api/blockchain/block        - append a block");
    info!("  POST   /api/blockchain/ticket       - append a ticket operation");
    info!("  GET    /api/blockchain/validate     - integrity check");
    info!("  GET    /api/blockchain/export       - JSON export");
    warp::serve(api(chain)).run(addr).await;
}
