pub mod agent;
pub mod errors;
pub mod mode;
pub mod models;
pub mod prompt;
pub mod providers;
pub mod session;
pub mod tools;
