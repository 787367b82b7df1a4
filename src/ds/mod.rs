pub mod freq_ladder;
pub mod ghost_fifo;
pub mod node_arena;
pub mod sentinel_list;

pub use freq_ladder::FreqLadder;
pub use ghost_fifo::GhostFifo;
pub use node_arena::{NodeArena, NodeId};
pub use sentinel_list::{End, SentinelList};
