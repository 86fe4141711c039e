use std::fmt;

/// Error returned by [`Generator::try_next()`](crate::Generator::try_next) when the strict
/// random-source policy is in effect.
///
/// The infallible [`Generator::next()`](crate::Generator::next) never reports this error; it
/// zero-fills the bytes it could not obtain and carries on.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The secure random source failed while seeding the sequence counter or refilling the random
    /// pool. The generator state is left as it was before the call.
    RandSource(rand::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandSource(_) => write!(f, "random source unavailable"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RandSource(err) => Some(err),
        }
    }
}

impl From<rand::Error> for Error {
    fn from(err: rand::Error) -> Self {
        Self::RandSource(err)
    }
}
