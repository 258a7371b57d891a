//! The external object system, as seen by [`QueryRequest`](crate::QueryRequest) and
//! [`ResultItem`](crate::ResultItem).
//!
//! Every handle type owns exactly one external reference and releases it when dropped.
//! None of them is `Clone`, so a handle can only change owners by being moved.
//!
//! On Windows, these traits are implemented by the COM types in the `connection` and
//! `result_enumerator` modules.

use crate::{Variant, WMIResult};

/// Entry point to the object system: process-wide setup and locator creation.
pub trait ObjectSystem {
    type Locator: Locator<Services = Self::Services>;
    type Services: Services<Enumerator = Self::Enumerator>;
    type Enumerator: ResultEnumerator<Object = Self::Object>;
    type Object: ClassObject;

    /// Configure the process-wide authentication defaults.
    ///
    /// This is configure-once state: calling it again is harmless, and returns the first outcome.
    fn initialize_security(&self) -> WMIResult<()>;

    fn create_locator(&self) -> WMIResult<Self::Locator>;
}

/// Connects to namespaces (`IWbemLocator`).
pub trait Locator {
    type Services;

    fn connect_server(&self, namespace: &str) -> WMIResult<Self::Services>;
}

/// A session bound to one namespace (`IWbemServices`).
pub trait Services {
    type Enumerator;

    /// Submit `query`, requesting forward-only enumeration of the results.
    fn exec_query(&self, query_language: &str, query: &str) -> WMIResult<Self::Enumerator>;
}

/// A forward-only cursor over query results (`IEnumWbemClassObject`).
pub trait ResultEnumerator {
    type Object;

    /// Pull the next object, waiting as long as it takes.
    ///
    /// Returns `Ok(None)` once the results are exhausted. The returned object carries the
    /// reference handed out by the enumerator.
    fn next_object(&mut self) -> WMIResult<Option<Self::Object>>;
}

/// One management object (`IWbemClassObject`).
pub trait ClassObject {
    type DateTime: DateTimeConverter;

    /// Read a named property. The returned value owns its payload.
    fn get_property(&self, name: &str) -> WMIResult<Variant>;

    /// Create a date-time conversion helper (`SWbemDateTime`).
    fn create_datetime(&self) -> WMIResult<Self::DateTime>;
}

/// Converts CIM datetime strings into file times (`ISWbemDateTime`).
pub trait DateTimeConverter {
    fn set_value(&mut self, value: &str) -> WMIResult<()>;

    /// Render the value as a decimal `FILETIME` tick count, in local time if `is_local` is set.
    fn file_time(&self, is_local: bool) -> WMIResult<String>;
}
