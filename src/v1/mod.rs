pub mod batch;
pub mod health;
pub mod predict;
pub mod schema;

pub use batch::{predict_batch, predict_csv, BatchPredictResponse};
pub use health::{health_check, HealthResponse};
pub use predict::{index, predict_form, predict_json, PredictResponse};
pub use schema::get_schema;
