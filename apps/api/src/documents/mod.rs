pub mod archive;
pub mod briefs;
pub mod handlers;
pub mod pdf;
pub mod store;
