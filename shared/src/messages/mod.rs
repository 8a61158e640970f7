mod notification;
mod request;
mod response;

pub use notification::Notification;
pub use request::Request;
pub use response::Response;
