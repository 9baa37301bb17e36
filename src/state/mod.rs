//! Per-machine state persisted between runs.
//!
//! Only the remote selection (platform, account, token) survives a run; it
//! lives in a JSON file under the user's home directory.

mod remote_cache;

pub use remote_cache::{CACHE_DIR_NAME, RemoteCache};
