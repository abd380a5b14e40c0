pub mod auth;
pub mod history;
pub mod notify;
pub mod query;
pub mod storage;
pub mod workflow;

pub use auth::AuthService;
pub use history::LeaveHistoryLedger;
pub use query::LeaveQueryService;
pub use workflow::LeaveWorkflow;
