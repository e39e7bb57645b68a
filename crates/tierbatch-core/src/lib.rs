pub mod config;
pub mod logging;

pub mod catalog;
pub mod model;
pub mod report;
pub mod resizing;
pub mod scheduler;
