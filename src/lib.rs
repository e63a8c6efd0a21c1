pub mod args;
pub mod commands;
pub mod database;
pub mod model;
pub mod utils;
