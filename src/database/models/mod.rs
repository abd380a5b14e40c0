pub(crate) mod macros;

pub mod history;
pub mod leave;
pub mod page;
pub mod user;

// Re-export all models for easy importing
pub use history::{FieldChange, LeaveAction, LeaveHistoryDetail, LeaveHistoryEntry};
pub use leave::{AttachmentRef, Leave, LeaveDetails, LeaveInput, LeaveStatus, ReviewInput};
pub use page::{ListOptions, Page, PageRequest};
pub use user::{
    AuthResponse, CreateUserInput, LoginInput, RegisterInput, UpdateUserInput, User, UserInfo,
    UserRole,
};
