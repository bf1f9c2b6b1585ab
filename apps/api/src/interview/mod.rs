pub mod collaborators;
pub mod engine;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod store;
