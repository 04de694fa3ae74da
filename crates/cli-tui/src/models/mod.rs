pub mod config;

pub use config::TuiConfig;
