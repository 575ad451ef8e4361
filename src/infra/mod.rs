pub mod auth;
pub mod azure;
pub mod git;
pub mod style;
