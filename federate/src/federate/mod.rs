mod federate;
mod ingress;
mod object_ops;
mod ownership_ops;
mod save_ops;
mod time_ops;

pub use federate::{CallbackCounts, Federate};
