pub mod feed_config;
pub mod utils;

pub use feed_config::{ConfigError, FeedConfig, RetryConfig};
pub use utils::{config_dir, default_config_path};
