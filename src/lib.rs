pub mod api;
pub mod board;
pub mod cli;
pub mod config;
pub mod grid;
pub mod limits;
pub mod model;
pub mod notify;
pub mod observability;
pub mod registry;
pub mod time;
