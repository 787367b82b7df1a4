pub use crate::ds::{End, FreqLadder, GhostFifo, NodeArena, NodeId, SentinelList};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::lru_k::LrukCache;
pub use crate::policy::sieve::SieveCache;
pub use crate::policy::two_q::{QueueTag, TwoQCache};
pub use crate::traits::ReadOnlyCache;
