pub mod handlers;
pub mod ingest;
pub mod ranker;
