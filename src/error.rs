use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `OutbreakError` and maps other errors to
/// convert to an `OutbreakError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum OutbreakError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    /// A particle, area or settings value is out of range.
    InvalidParameter(String),
    /// The drawing surface could not be used. This is fatal at setup.
    RenderTargetUnavailable(String),
    /// The host supplied a NaN or infinite timestamp.
    InvalidTimestamp(f64),
    OutbreakError(String),
}

impl From<io::Error> for OutbreakError {
    fn from(error: io::Error) -> Self {
        OutbreakError::IoError(error)
    }
}

impl From<serde_json::Error> for OutbreakError {
    fn from(error: serde_json::Error) -> Self {
        OutbreakError::JsonError(error)
    }
}

impl From<csv::Error> for OutbreakError {
    fn from(error: csv::Error) -> Self {
        OutbreakError::CsvError(error)
    }
}

impl From<String> for OutbreakError {
    fn from(error: String) -> Self {
        OutbreakError::OutbreakError(error)
    }
}

impl From<&str> for OutbreakError {
    fn from(error: &str) -> Self {
        OutbreakError::OutbreakError(error.to_string())
    }
}

impl std::error::Error for OutbreakError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OutbreakError::IoError(e) => Some(e),
            OutbreakError::JsonError(e) => Some(e),
            OutbreakError::CsvError(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for OutbreakError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OutbreakError::InvalidParameter(msg) => write!(f, "Error: invalid parameter: {msg}"),
            OutbreakError::RenderTargetUnavailable(msg) => {
                write!(f, "Error: render target unavailable: {msg}")
            }
            OutbreakError::InvalidTimestamp(t) => write!(f, "Error: invalid timestamp: {t}"),
            _ => write!(f, "Error: {self:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_parameter() {
        let e = OutbreakError::InvalidParameter("radius must be > 0".to_string());
        let msg = e.to_string();
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("radius"));
    }

    #[test]
    fn converts_from_str_and_io() {
        let e: OutbreakError = "boom".into();
        assert!(matches!(e, OutbreakError::OutbreakError(ref s) if s == "boom"));

        let e: OutbreakError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(e, OutbreakError::IoError(_)));
        assert!(std::error::Error::source(&e).is_some());
    }
}
