//! Services shared by interactors, sync and clients

mod network_writer;
mod notes;
mod safe_call;

pub use network_writer::{NetworkOp, NetworkWriter};
pub use notes::NotesService;
pub use safe_call::{
    failure_reason, handle_cache_result, safe_api_call, safe_cache_call, CallTimeouts,
    CACHE_ERROR_TIMEOUT, CACHE_ERROR_UNKNOWN, CACHE_TIMEOUT, NETWORK_ERROR_TIMEOUT,
    NETWORK_ERROR_UNKNOWN, NETWORK_TIMEOUT,
};
