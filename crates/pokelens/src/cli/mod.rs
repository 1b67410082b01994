pub mod config;
pub mod identify;
pub mod serve;
