//! Console module - logging facilities.

pub mod logger;

pub use logger::init as init_logger;
