use thiserror::Error;

use crate::ids::InstanceId;
use crate::validate::ConfigError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScrollError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no scroll instance with id {0}")]
    NoSuchInstance(InstanceId),
}
