pub mod bootstrap;
pub mod config;
pub mod logging;
pub mod outbound;
pub mod pipeline;
pub mod progress;
