//! # wmi-request
//!
//! [WMI] is a management API for Windows-based operating systems.
//! This crate runs a WQL query, collects every result object, and then reads the properties of
//! each object with getters which check the property's type before converting it.
//!
//! All data is copied to owning data structures, so the returned values are not tied in any way
//! to the original WMI object (refer to MSDN's [Creating a WMI Application Using C++] to learn
//! more about how data is handled by WMI).
//!
//! Before using WMI, COM must be initialized for the current thread.
//!
//! ```edition2018
//! # #[cfg(windows)]
//! # fn main() -> wmi_request::WMIResult<()> {
//! use wmi_request::{COMLibrary, WMIRequest, DEFAULT_NAMESPACE};
//!
//! let com_lib = COMLibrary::new()?;
//! let request = WMIRequest::with_system(
//!     &com_lib,
//!     "SELECT Caption, Debug, LastBootUpTime FROM Win32_OperatingSystem",
//!     DEFAULT_NAMESPACE,
//! );
//!
//! assert!(request.status().is_ok());
//!
//! for os in &request {
//!     let caption = os.get_string("Caption")?;
//!     let debug = os.get_bool("Debug")?;
//!     let last_boot = os.get_date_time("LastBootUpTime", false)?;
//!
//!     println!("{} (debug: {}) booted at {:?}", caption, debug, last_boot.to_naive());
//! }
//! #   Ok(())
//! # }
//! # #[cfg(not(windows))]
//! # fn main() {}
//! ```
//!
//! # Status and errors
//!
//! A [`QueryRequest`] never fails to construct. Its [`Status`] tells if the query was
//! executed, and the underlying [`WMIError`] is available with [`QueryRequest::error`].
//!
//! If the result enumerator fails midway, the results collected so far are kept and the status
//! is still a success. Use [`QueryRequest::stopped_early`] and [`QueryRequest::enumeration_error`]
//! to tell a complete result set from a partial one.
//!
//! Each getter of [`ResultItem`] returns a [`WMIResult`], and the [`ErrorKind`] of an error tells
//! if the property was missing, held another type, or could not be converted.
//!
//! # Types
//!
//! WMI data model is based on COM's [`VARIANT`] Type, which is a struct capable of holding
//! many types of data. This crate provides the analogous [`Variant`] enum.
//!
//! Every getter expects one exact tag, and never coerces:
//!
//! | Getter                                       | Tag                  | Rust type      |
//! |----------------------------------------------|----------------------|----------------|
//! | [`get_bool`](ResultItem::get_bool)                             | `VT_BOOL`            | `bool`         |
//! | [`get_uchar`](ResultItem::get_uchar)                           | `VT_UI1`             | `u8`           |
//! | [`get_unsigned_short`](ResultItem::get_unsigned_short)         | `VT_UI2`             | `u16`          |
//! | [`get_unsigned_int32`](ResultItem::get_unsigned_int32)         | `VT_UINT`            | `u32`          |
//! | [`get_long`](ResultItem::get_long)                             | `VT_I4`              | `i32`          |
//! | [`get_unsigned_long`](ResultItem::get_unsigned_long)           | `VT_UI4`             | `u32`          |
//! | [`get_long_long`](ResultItem::get_long_long)                   | `VT_I8`              | `i64`          |
//! | [`get_unsigned_long_long`](ResultItem::get_unsigned_long_long) | `VT_UI8`             | `u64`          |
//! | [`get_string`](ResultItem::get_string)                         | `VT_BSTR`            | `String`       |
//! | [`get_vector_of_strings`](ResultItem::get_vector_of_strings)   | `VT_ARRAY \| VT_BSTR` | `Vec<String>`  |
//! | [`get_date_time`](ResultItem::get_date_time)                   | `VT_BSTR`            | [`FileTime`]   |
//!
//! # Testing
//!
//! The request logic is written against the traits in [`backend`], which are implemented by
//! the COM types on Windows. With the `test` feature, the in-memory implementation in
//! `tests::fake` can be used to test code built on this crate on any platform.
//!
//! [WMI]: https://docs.microsoft.com/en-us/windows/desktop/wmisdk/about-wmi
//! [Creating a WMI Application Using C++]: https://docs.microsoft.com/en-us/windows/desktop/wmisdk/creating-a-wmi-application-using-c-
//! [`VARIANT`]: https://docs.microsoft.com/en-us/windows/desktop/api/oaidl/ns-oaidl-tagvariant
//!
#![allow(non_snake_case)]
#![allow(unused_unsafe)]

pub mod backend;
pub mod datetime;
pub mod hres;
pub mod request;
pub mod result_item;
pub mod safearray;
pub mod status;
pub mod utils;
pub mod variant;

#[cfg(windows)]
pub mod connection;
#[cfg(windows)]
pub mod result_enumerator;


pub use datetime::{FileTime, WMIDateTime};
pub use request::{CancelToken, DrainOutcome, QueryRequest, DEFAULT_NAMESPACE, QUERY_LANGUAGE};
pub use result_item::ResultItem;
pub use status::Status;
pub use utils::{ErrorKind, WMIError, WMIResult};
pub use variant::{VarType, Variant};

#[cfg(windows)]
pub use connection::COMLibrary;
#[cfg(windows)]
pub use result_enumerator::IWbemClassWrapper;

/// A query executed over COM.
#[cfg(windows)]
pub type WMIRequest = QueryRequest<COMLibrary>;

/// A result of a [`WMIRequest`].
#[cfg(windows)]
pub type WMIResultItem = ResultItem<IWbemClassWrapper>;

#[doc = include_str!("../README.md")]
#[cfg(all(doctest, windows))]
pub struct ReadmeDoctests;
