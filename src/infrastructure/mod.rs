// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod json_store;
pub mod path_query;
pub mod run_locator;
pub mod svg_chart;
pub mod terminal;
