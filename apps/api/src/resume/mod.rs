pub mod handlers;
pub mod parser;
pub mod sections;
pub mod store;
