pub mod config;
pub mod logging;

pub mod fetch;
pub mod naming;
pub mod rename;
pub mod retry;
pub mod sheet;
pub mod storage;
pub mod transport;
