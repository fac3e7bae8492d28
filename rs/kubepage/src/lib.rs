pub mod app;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod page;
pub mod paginate;
pub mod query;
pub mod report;
pub mod source;
