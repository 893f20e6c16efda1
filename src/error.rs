use simple_error::SimpleError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] SimpleError),
}

impl RecipeError {
    pub fn invalid_configuration(message: impl AsRef<str>) -> Self {
        RecipeError::InvalidConfiguration(SimpleError::new(message.as_ref()))
    }

    /// The underlying validation message, without the error kind prefix.
    pub fn as_str(&self) -> &str {
        match self {
            RecipeError::InvalidConfiguration(err) => err.as_str(),
        }
    }
}

pub type RecipeResult<T> = Result<T, RecipeError>;
