mod callback_pipeline;
mod delivery;
mod dispatcher;
mod scheduled;

pub use callback_pipeline::{CallbackPipeline, Released};
pub use delivery::deliver;
pub use dispatcher::CallbackDispatcher;
pub use scheduled::{ScheduledCallback, ScheduledCallbacks};
