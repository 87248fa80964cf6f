pub mod poller;

pub use poller::{ConfigError, PollSettings, PollerConfig};
