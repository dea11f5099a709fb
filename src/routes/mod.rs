pub mod announcements;
pub mod chat;
pub mod donations;
pub mod events;
pub mod staff;
pub mod volunteers;
