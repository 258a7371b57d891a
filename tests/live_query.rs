//! Queries against the local WMI service.
//!
//! These tests read properties of `Win32_OperatingSystem`, whose types are fixed by its schema.
#![cfg(windows)]

use wmi_request::{
    COMLibrary, DrainOutcome, ErrorKind, WMIError, WMIRequest, DEFAULT_NAMESPACE,
};

const OS_QUERY: &str = "SELECT Caption, Debug, LastBootUpTime, MUILanguages, \
                        ForegroundApplicationBoost, NumberOfUsers FROM Win32_OperatingSystem";

fn os_request() -> WMIRequest {
    let com_lib = COMLibrary::new().unwrap();

    WMIRequest::with_system(&com_lib, OS_QUERY, DEFAULT_NAMESPACE)
}

#[test]
fn it_queries_the_operating_system() {
    let request = os_request();

    assert!(request.status().is_ok(), "{}", request.status());
    assert_eq!(request.drain_outcome(), DrainOutcome::Exhausted);
    assert_eq!(request.results().len(), 1);

    let os = &request.results()[0];

    assert!(os.get_string("Caption").unwrap().contains("Windows"));
    let _debug = os.get_bool("Debug").unwrap();
    let _boost = os.get_uchar("ForegroundApplicationBoost").unwrap();

    let languages = os.get_vector_of_strings("MUILanguages").unwrap();
    assert!(!languages.is_empty());
}

#[test]
fn it_converts_the_last_boot_time() {
    let request = os_request();
    let os = &request.results()[0];

    let utc = os.get_date_time("LastBootUpTime", false).unwrap();
    let local = os.get_date_time("LastBootUpTime", true).unwrap();

    let boot = utc.to_naive().unwrap();
    assert!(boot.and_utc().timestamp() > 0);

    // Both are the same instant, rendered in different zones.
    let skew = utc.ticks() as i128 - local.ticks() as i128;
    assert!(skew.abs() <= 14 * 3600 * 10_000_000);
}

#[test]
fn it_does_not_coerce_types() {
    let request = os_request();
    let os = &request.results()[0];

    // `NumberOfUsers` is a VT_I4 in practice, even though it is a uint32 in the schema.
    let err = os.get_string("NumberOfUsers").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);

    let err = os.get_bool("NoSuchProperty").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Retrieval);
}

#[test]
fn it_reports_an_invalid_namespace() {
    let com_lib = COMLibrary::new().unwrap();

    let request = WMIRequest::with_system(&com_lib, OS_QUERY, "ROOT\\DoesNotExist");

    assert!(!request.status().is_ok());
    assert!(request.results().is_empty());
    assert!(matches!(
        request.error(),
        Some(WMIError::NamespaceError { .. })
    ));
}

#[test]
fn it_reports_an_invalid_query() {
    let com_lib = COMLibrary::new().unwrap();

    let request = WMIRequest::with_system(&com_lib, "SELECT * FROM Win32_Nope", DEFAULT_NAMESPACE);

    // WMI may also reject the class lazily, on the first pull.
    if request.status().is_ok() {
        assert!(request.results().is_empty());
    } else {
        assert_eq!(request.error().unwrap().kind(), ErrorKind::Execution);
    }
}
