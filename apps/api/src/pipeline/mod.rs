pub mod artifacts;
pub mod generator;
pub mod handlers;
pub mod prompts;
