use crate::hres;
use std::error::Error as _;
use thiserror::Error;

/// The kind of failure, independent of the exact call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Creating the locator or binding to a namespace failed.
    Connection,
    /// Submitting the query failed.
    Execution,
    /// A pull from the result enumerator failed mid-drain.
    EnumerationStop,
    /// A named property could not be fetched.
    Retrieval,
    /// The property exists, but holds a different type than requested.
    TypeMismatch,
    /// An intermediate conversion (date-time helper, numeric parse) failed.
    Conversion,
    /// A raw call into the object system failed.
    Call,
}

#[derive(Debug, Error)]
pub enum WMIError {
    /// A failed call into the object system.
    #[error("HRESULT Call failed with: {hres:#X} {}", hres::to_str(*hres))]
    HResultError { hres: i32 },
    #[error("Failed to create the WMI locator")]
    LocatorError {
        #[source]
        source: Box<WMIError>,
    },
    #[error("Failed to connect to the WMI namespace {namespace:?}")]
    NamespaceError {
        namespace: String,
        #[source]
        source: Box<WMIError>,
    },
    #[error("Failed to execute the WMI query {query:?}")]
    ExecQueryError {
        query: String,
        #[source]
        source: Box<WMIError>,
    },
    #[error("WMI enumeration stopped after {collected} results")]
    EnumerationStopped {
        collected: usize,
        #[source]
        source: Box<WMIError>,
    },
    #[error("Error retrieving property {property:?} from WMI query result")]
    RetrievalError {
        property: String,
        #[source]
        source: Option<Box<WMIError>>,
    },
    #[error("Invalid data type returned for property {property:?}: expected {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: String,
    },
    #[error("{reason} (property {property:?}: {detail})")]
    ConversionError {
        property: String,
        reason: &'static str,
        detail: String,
    },
    #[error("Unsupported VARIANT type: {0:#X}")]
    ConvertError(u16),
    #[error("Expected a non null pointer")]
    NullPointerResult,
}

pub type WMIResult<T> = Result<T, WMIError>;

impl WMIError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WMIError::HResultError { .. } => ErrorKind::Call,
            WMIError::LocatorError { .. } | WMIError::NamespaceError { .. } => {
                ErrorKind::Connection
            }
            WMIError::ExecQueryError { .. } => ErrorKind::Execution,
            WMIError::EnumerationStopped { .. } => ErrorKind::EnumerationStop,
            WMIError::RetrievalError { .. } => ErrorKind::Retrieval,
            WMIError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            WMIError::ConversionError { .. }
            | WMIError::ConvertError(_)
            | WMIError::NullPointerResult => ErrorKind::Conversion,
        }
    }

    /// A short, stable description of the failure, suitable for a [`Status`](crate::Status).
    pub fn message(&self) -> &'static str {
        match self {
            WMIError::HResultError { .. } => "WMI call failed.",
            WMIError::LocatorError { .. } => "Failed to create the WMI locator.",
            WMIError::NamespaceError { .. } => "Failed to connect to the WMI namespace.",
            WMIError::ExecQueryError { .. } => "Failed to execute the WMI query.",
            WMIError::EnumerationStopped { .. } => "WMI enumeration stopped early.",
            WMIError::RetrievalError { .. } => "Error retrieving data from WMI query.",
            WMIError::TypeMismatch { .. } => "Invalid data type returned.",
            WMIError::ConversionError { reason, .. } => *reason,
            WMIError::ConvertError(_) | WMIError::NullPointerResult => {
                "Unsupported WMI data type."
            }
        }
    }

    /// The `HRESULT` behind this error, if any, searching through the error sources.
    pub fn hres(&self) -> Option<i32> {
        if let WMIError::HResultError { hres } = self {
            return Some(*hres);
        }

        let mut source = self.source();

        while let Some(err) = source {
            if let Some(WMIError::HResultError { hres }) = err.downcast_ref::<WMIError>() {
                return Some(*hres);
            }

            source = err.source();
        }

        None
    }
}

#[cfg(windows)]
impl From<windows::core::Error> for WMIError {
    fn from(value: windows::core::Error) -> Self {
        Self::HResultError {
            hres: value.code().0,
        }
    }
}
