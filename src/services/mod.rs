pub mod display;
pub mod presenter;
pub mod status_client;
pub mod status_poller;

pub use display::StatusDisplay;
pub use presenter::present;
pub use status_client::{HttpStatusClient, StatusSource, STATUS_PATH};
pub use status_poller::{PollPhase, StatusPoller};
