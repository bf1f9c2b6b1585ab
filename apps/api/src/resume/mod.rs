pub mod feedback;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod scorer;
pub mod service;
pub mod store;
