pub mod catalog;
pub mod config;
pub mod error;
pub mod grading;
pub mod output;
pub mod table;
