//! Toast/notification collaborator contracts.

mod service;

pub use service::{
    MemoryNotificationService, NoopNotificationService, NotificationFuture, NotificationService,
};
