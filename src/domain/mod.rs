// Domain layer - Pure data types for series and screen geometry
pub mod error;
pub mod geometry;
pub mod sample;
pub mod timeframe;
