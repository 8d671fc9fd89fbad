pub mod cron;
pub mod custom_questions;
pub mod health;
pub mod matches;
pub mod missions;
pub mod notifications;
pub mod profile;
pub mod questions;
pub mod safety;
