mod time_manager;
mod time_state;

pub use time_manager::TimeManager;
pub use time_state::{InboundRoute, TimeState};
