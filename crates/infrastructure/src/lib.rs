//! dnstree Infrastructure Layer
pub mod checker;
pub mod database;
pub mod filesystem;
pub mod repositories;
