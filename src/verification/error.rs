//! Result type and errors related to verification stuff.

pub type Result<T> = std::result::Result<T, Error>;

impl<T> From<Error> for Result<T> {
    fn from(error: Error) -> Self {
        Err(error)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("the {0} tag is missing from the template")]
    MissingRequiredTag(&'static str),
    #[error("email regex did not match")]
    NotAnEmail,
    #[error("message could not be dispatched: {0}")]
    Dispatch(String),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[cfg(test)]
    #[error("unexpected error")]
    Debug,
}

impl From<strum::ParseError> for Error {
    fn from(error: strum::ParseError) -> Self {
        Self::InvalidConfiguration(error.to_string())
    }
}

#[cfg(feature = "smtp")]
impl From<crate::smtp::Error> for Error {
    fn from(error: crate::smtp::Error) -> Self {
        Self::Dispatch(error.to_string())
    }
}

impl Error {
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration(_))
    }

    pub fn is_missing_required_tag(&self) -> bool {
        matches!(self, Error::MissingRequiredTag(_))
    }

    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, Error::Dispatch(_))
    }
}
