pub mod catalog_ops;
pub mod console;
pub mod dashboard;
pub mod notifications;
pub mod protocol;
pub mod state;
pub mod wizard_task;

// Re-export the console loop to make it easily accessible to the binary.
pub use console::run_console;
pub use notifications::NotificationQueue;
pub use state::AppState;
