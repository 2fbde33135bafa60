use thiserror::Error;

use lu_core::CoreError;
use lu_data::DataError;
use lu_models::ModelError;
use lu_travel::TravelError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("travel time error: {0}")]
    Travel(#[from] TravelError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
