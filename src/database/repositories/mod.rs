pub mod leave;
pub mod leave_history;
pub mod user;

// Re-export all repositories and their ports for easy importing
pub use leave::{LeaveRepository, LeaveStore};
pub use leave_history::{HistoryStore, LeaveHistoryRepository};
pub use user::{UserRepository, UserStore};
