//! HTTP API and JSON export for a shared TIXCHAIN ledger.

pub mod dto;
pub mod error;
pub mod export;
pub mod mapper;
pub mod routes;
pub mod server;

pub use dto::{BlockRequest, BlockResponse, ErrorResponse, TicketRequest, ValidationResponse};
pub use error::{handle_rejection, ApiError};
pub use export::{save_to_file, to_json_pretty, ExportError};
pub use mapper::BlockMapper;
pub use routes::{api, routes, shared, SharedChain};
pub use server::serve;
