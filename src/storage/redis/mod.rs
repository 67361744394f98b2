//! Redis storage implementation
//!
//! - `pool` - lazily established multiplexed connection with timeouts
//! - `counter` - the shared rate-limit counter operations

mod counter;
mod pool;

pub use counter::parse_counter_reply;
pub use pool::RedisPool;
