// Presentation layer - Terminal frames, reports and HTTP handlers
pub mod app_state;
pub mod curve;
pub mod frame;
pub mod handlers;
pub mod plot_view;
pub mod report;
