pub mod config_io;
pub mod persist;
pub mod session;
pub mod writer;
