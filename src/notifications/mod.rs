mod handler;
mod notification;
mod notification_content;

pub use self::{
    handler::NotificationHandler,
    notification::Notification,
    notification_content::{NotificationContent, Response, Success},
};
