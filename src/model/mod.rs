pub mod config;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod jump_policy;
pub mod ladder;
pub mod member_tracker;
pub mod presets;
pub mod scoring;
pub mod settings;
pub mod structures;
