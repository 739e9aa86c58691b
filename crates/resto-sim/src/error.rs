use resto_des::DesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("simulation fault: {0}")]
    Des(#[from] DesError),
}

pub type SimResult<T> = Result<T, SimError>;
