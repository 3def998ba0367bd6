pub mod config;
pub mod events;
pub mod metadata;
pub mod models;
pub mod notify;
pub mod poller;
pub mod rpc;

pub use models::MintEvent;
pub use poller::{PendingBatch, PollState, Poller, TickReport};
pub use rpc::{ChainSource, RpcClient};
