pub mod config;
pub mod refresh;
pub mod serve;
pub mod status;
pub mod watch;
