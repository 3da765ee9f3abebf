use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// An argument had a shape the operation cannot turn into a query fragment.
    #[error("malformed argument: {0}")]
    MalformedArgument(String),
}

impl Error {
    pub fn malformed_argument(message: impl Into<String>) -> Self {
        Self::MalformedArgument(message.into())
    }
}
