use std::any::type_name;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("State not found: {name}, context: {context}")]
    StateNotFound { name: &'static str, context: String },
    #[error("Command not found: {name}")]
    CommandNotFound { name: &'static str },
    #[error("No executor to run command: {name}")]
    SpawnFailed { name: &'static str },
}

impl Error {
    pub fn state_not_found<T>(context: impl Into<String>) -> Self {
        Self::StateNotFound {
            name: type_name::<T>(),
            context: context.into(),
        }
    }

    pub fn command_not_found<T>() -> Self {
        Self::CommandNotFound {
            name: type_name::<T>(),
        }
    }
}
