pub mod cataloger;
pub mod classifier;
