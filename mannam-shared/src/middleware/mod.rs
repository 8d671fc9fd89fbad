pub mod auth_extractor;
pub mod cron_auth;
pub mod metrics_layer;
pub mod tracing_layer;

pub use auth_extractor::AdminUser;
pub use cron_auth::CronCaller;
pub use metrics_layer::{init_metrics, metrics_middleware, record_job_run};
pub use tracing_layer::init_tracing;
