// Application layer - Use cases and ports
pub mod extractor;
pub mod sample_repository;
pub mod session;
pub mod surface;
pub mod timeframe_filter;
pub mod visualizer_service;
