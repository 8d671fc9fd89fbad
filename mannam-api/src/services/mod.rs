pub mod match_service;
pub mod mission_service;
pub mod noshow_service;
pub mod notification_service;
