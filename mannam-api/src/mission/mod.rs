pub mod catalog;
pub mod planner;
