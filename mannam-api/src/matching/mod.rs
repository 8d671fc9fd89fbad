pub mod geo;
pub mod lifecycle;
pub mod scoring;
pub mod selector;
