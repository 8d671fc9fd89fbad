pub mod db;
pub mod rabbitmq;

pub use db::{create_pool, DbPool};
pub use rabbitmq::RabbitMQClient;
