use crate::{WMIError, WMIResult};
use serde::Serialize;
use std::fmt;

/// Outcome of a request or of a single property read: `0` for success, non zero otherwise.
///
/// Messages come from [`WMIError::message`], so they are drawn from a small, stable set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    code: i32,
    message: String,
}

impl Status {
    pub const SUCCESS_CODE: i32 = 0;
    pub const FAILURE_CODE: i32 = -1;

    pub fn success() -> Self {
        Self {
            code: Self::SUCCESS_CODE,
            message: "OK".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            code: Self::FAILURE_CODE,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Self::SUCCESS_CODE
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for Status {
    /// A request that never ran to completion.
    fn default() -> Self {
        Self::failure("WMI request was not executed.")
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl From<&WMIError> for Status {
    fn from(err: &WMIError) -> Self {
        Self::failure(err.message())
    }
}

impl<T> From<&WMIResult<T>> for Status {
    fn from(result: &WMIResult<T>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_converts_results() {
        let ok: WMIResult<u8> = Ok(1);
        assert!(Status::from(&ok).is_ok());

        let err: WMIResult<u8> = Err(WMIError::RetrievalError {
            property: "Name".to_string(),
            source: None,
        });
        let status = Status::from(&err);

        assert!(!status.is_ok());
        assert_eq!(status.code(), Status::FAILURE_CODE);
        assert_eq!(status.message(), "Error retrieving data from WMI query.");
    }

    #[test]
    fn it_serializes_code_and_message() {
        let json = serde_json::to_value(Status::failure("Invalid data type returned.")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"code": -1, "message": "Invalid data type returned."})
        );
    }
}
