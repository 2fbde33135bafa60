use thiserror::Error;

use lu_data::DataError;
use lu_travel::TravelError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model configuration error: {0}")]
    Config(String),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("travel time error: {0}")]
    Travel(#[from] TravelError),
}

pub type ModelResult<T> = Result<T, ModelError>;
