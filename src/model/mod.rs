pub mod board;
pub mod config;
pub mod id;
pub mod person;
pub mod snapshot;
pub mod store;
pub mod task;

pub use board::*;
pub use config::*;
pub use person::*;
pub use snapshot::*;
pub use store::*;
pub use task::*;
