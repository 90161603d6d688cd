pub mod artifact;
pub mod company;
pub mod document;
