pub mod backend;
pub mod conversation;
pub mod extractor;
pub mod resolver;
