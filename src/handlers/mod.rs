pub mod auth;
pub mod leave_history;
pub mod leaves;
pub mod shared;
pub mod users;
