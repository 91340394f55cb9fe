pub mod error;
pub mod news;
pub mod ranker;
pub mod service;
pub mod table;
