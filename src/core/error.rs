use thiserror::Error;

use crate::attribute::AttributeTypeId;
use crate::core::types::AgentId;
use crate::drive::DriveTypeId;

#[derive(Error, Debug)]
pub enum VolitionError {
    #[error("Agent not found: {0:?}")]
    AgentNotFound(AgentId),

    #[error("Drive state missing for agent {agent:?}: {drive}")]
    DriveStateMissing { agent: AgentId, drive: DriveTypeId },

    #[error("Attribute state missing for agent {agent:?}: {attribute}")]
    AttributeStateMissing {
        agent: AgentId,
        attribute: AttributeTypeId,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, VolitionError>;
