mod channel;
mod dispatcher;

pub use channel::{InAppChannel, LogChannel, Notification, NotificationChannel};
pub use dispatcher::NotificationDispatcher;
