/// Describe a failed `HRESULT` returned by a WMI call.
///
/// Only the codes a query session can realistically hit are spelled out,
/// the rest are reported by facility.
pub const fn to_str(hres: i32) -> &'static str {
    match hres as u32 {
        E_FAIL => E_FAIL_EN,
        E_ACCESSDENIED => E_ACCESSDENIED_EN,
        RPC_E_TOO_LATE => RPC_E_TOO_LATE_EN,
        WBEM_E_FAILED => WBEM_E_FAILED_EN,
        WBEM_E_NOT_FOUND => WBEM_E_NOT_FOUND_EN,
        WBEM_E_ACCESS_DENIED => WBEM_E_ACCESS_DENIED_EN,
        WBEM_E_PROVIDER_FAILURE => WBEM_E_PROVIDER_FAILURE_EN,
        WBEM_E_TYPE_MISMATCH => WBEM_E_TYPE_MISMATCH_EN,
        WBEM_E_OUT_OF_MEMORY => WBEM_E_OUT_OF_MEMORY_EN,
        WBEM_E_INVALID_PARAMETER => WBEM_E_INVALID_PARAMETER_EN,
        WBEM_E_NOT_AVAILABLE => WBEM_E_NOT_AVAILABLE_EN,
        WBEM_E_NOT_SUPPORTED => WBEM_E_NOT_SUPPORTED_EN,
        WBEM_E_INVALID_NAMESPACE => WBEM_E_INVALID_NAMESPACE_EN,
        WBEM_E_INVALID_CLASS => WBEM_E_INVALID_CLASS_EN,
        WBEM_E_TRANSPORT_FAILURE => WBEM_E_TRANSPORT_FAILURE_EN,
        WBEM_E_INVALID_QUERY => WBEM_E_INVALID_QUERY_EN,
        WBEM_E_INVALID_QUERY_TYPE => WBEM_E_INVALID_QUERY_TYPE_EN,
        WBEM_E_UNEXPECTED => WBEM_E_UNEXPECTED_EN,
        WBEM_E_INVALID_SYNTAX => WBEM_E_INVALID_SYNTAX_EN,
        WBEM_E_CALL_CANCELLED => WBEM_E_CALL_CANCELLED_EN,
        WBEM_E_SHUTTING_DOWN => WBEM_E_SHUTTING_DOWN_EN,
        WBEM_E_INVALID_PROPERTY => WBEM_E_INVALID_PROPERTY_EN,
        WBEM_E_SERVER_TOO_BUSY => WBEM_E_SERVER_TOO_BUSY_EN,
        WBEM_E_QUOTA_VIOLATION => WBEM_E_QUOTA_VIOLATION_EN,
        WBEM_E_TIMED_OUT => WBEM_E_TIMED_OUT_EN,
        WBEM_E_PROVIDER_TIMED_OUT => WBEM_E_PROVIDER_TIMED_OUT_EN,
        x if x >= 0x80041068 && x <= 0x80041099 => "(WMI)",
        x if x >= 0x80070000 && x <= 0x80079999 => "(OS)",
        x if x >= 0x80040000 && x <= 0x80040999 => "(DCOM)",
        _ => "(UNKNOWN)",
    }
}

// WBEM constants and English descriptions hard-coded from:
// https://docs.microsoft.com/en-us/windows/win32/wmisdk/wmi-error-constants
// https://github.com/MicrosoftDocs/win32/blob/docs/desktop-src/WmiSdk/wmi-error-constants.md

pub const E_FAIL: u32 = 0x80004005;
const E_FAIL_EN: &str = "(E_FAIL) Unspecified failure.";

pub const E_ACCESSDENIED: u32 = 0x80070005;
const E_ACCESSDENIED_EN: &str = "(E_ACCESSDENIED) General access denied error.";

pub const RPC_E_TOO_LATE: u32 = 0x80010119;
const RPC_E_TOO_LATE_EN: &str =
    "(RPC_E_TOO_LATE) Security must be initialized before any interfaces are marshalled or \
    unmarshalled.";

pub const WBEM_E_FAILED: u32 = 0x80041001;
const WBEM_E_FAILED_EN: &str = "(WBEM_E_FAILED) Call failed.";

pub const WBEM_E_NOT_FOUND: u32 = 0x80041002;
const WBEM_E_NOT_FOUND_EN: &str = "(WBEM_E_NOT_FOUND) Object cannot be found.";

pub const WBEM_E_ACCESS_DENIED: u32 = 0x80041003;
const WBEM_E_ACCESS_DENIED_EN: &str =
    "(WBEM_E_ACCESS_DENIED) Current user does not have permission to perform the action.";

pub const WBEM_E_PROVIDER_FAILURE: u32 = 0x80041004;
const WBEM_E_PROVIDER_FAILURE_EN: &str =
    "(WBEM_E_PROVIDER_FAILURE) Provider has failed at some time other than during initialization.";

pub const WBEM_E_TYPE_MISMATCH: u32 = 0x80041005;
const WBEM_E_TYPE_MISMATCH_EN: &str = "(WBEM_E_TYPE_MISMATCH) Type mismatch occurred.";

pub const WBEM_E_OUT_OF_MEMORY: u32 = 0x80041006;
const WBEM_E_OUT_OF_MEMORY_EN: &str = "(WBEM_E_OUT_OF_MEMORY) Not enough memory for the operation.";

pub const WBEM_E_INVALID_PARAMETER: u32 = 0x80041008;
const WBEM_E_INVALID_PARAMETER_EN: &str =
    "(WBEM_E_INVALID_PARAMETER) One of the parameters to the call is not correct.";

pub const WBEM_E_NOT_AVAILABLE: u32 = 0x80041009;
const WBEM_E_NOT_AVAILABLE_EN: &str =
    "(WBEM_E_NOT_AVAILABLE) Resource, typically a remote server, is not currently available.";

pub const WBEM_E_NOT_SUPPORTED: u32 = 0x8004100C;
const WBEM_E_NOT_SUPPORTED_EN: &str =
    "(WBEM_E_NOT_SUPPORTED) Feature or operation is not supported.";

pub const WBEM_E_INVALID_NAMESPACE: u32 = 0x8004100E;
const WBEM_E_INVALID_NAMESPACE_EN: &str =
    "(WBEM_E_INVALID_NAMESPACE) Namespace specified cannot be found.";

pub const WBEM_E_INVALID_CLASS: u32 = 0x80041010;
const WBEM_E_INVALID_CLASS_EN: &str = "(WBEM_E_INVALID_CLASS) Specified class is not valid.";

pub const WBEM_E_TRANSPORT_FAILURE: u32 = 0x80041015;
const WBEM_E_TRANSPORT_FAILURE_EN: &str =
    "(WBEM_E_TRANSPORT_FAILURE) Networking error that prevents normal operation has occurred.";

pub const WBEM_E_INVALID_QUERY: u32 = 0x80041017;
const WBEM_E_INVALID_QUERY_EN: &str = "(WBEM_E_INVALID_QUERY) Query was not syntactically valid.";

pub const WBEM_E_INVALID_QUERY_TYPE: u32 = 0x80041018;
const WBEM_E_INVALID_QUERY_TYPE_EN: &str =
    "(WBEM_E_INVALID_QUERY_TYPE) Requested query language is not supported.";

pub const WBEM_E_UNEXPECTED: u32 = 0x8004101D;
const WBEM_E_UNEXPECTED_EN: &str =
    "(WBEM_E_UNEXPECTED) Client made an unexpected and illegal sequence of calls.";

pub const WBEM_E_INVALID_SYNTAX: u32 = 0x80041021;
const WBEM_E_INVALID_SYNTAX_EN: &str = "(WBEM_E_INVALID_SYNTAX) Query is syntactically not valid.";

pub const WBEM_E_CALL_CANCELLED: u32 = 0x80041032;
const WBEM_E_CALL_CANCELLED_EN: &str =
    "(WBEM_E_CALL_CANCELLED) Asynchronous process has been canceled internally or by the user. \
    Note that due to the timing and nature of the asynchronous operation, the operation may not \
    have been truly canceled.";

pub const WBEM_E_SHUTTING_DOWN: u32 = 0x80041033;
const WBEM_E_SHUTTING_DOWN_EN: &str =
    "(WBEM_E_SHUTTING_DOWN) User has requested an operation while WMI is in the process of \
    shutting down.";

pub const WBEM_E_INVALID_PROPERTY: u32 = 0x80041031;
const WBEM_E_INVALID_PROPERTY_EN: &str =
    "(WBEM_E_INVALID_PROPERTY) Property type is not recognized.";

pub const WBEM_E_SERVER_TOO_BUSY: u32 = 0x80041045;
const WBEM_E_SERVER_TOO_BUSY_EN: &str =
    "(WBEM_E_SERVER_TOO_BUSY) Call to IWbemObjectSink::Indicate has failed. The provider can \
    refire the event.";

pub const WBEM_E_QUOTA_VIOLATION: u32 = 0x8004106C;
const WBEM_E_QUOTA_VIOLATION_EN: &str =
    "(WBEM_E_QUOTA_VIOLATION) WMI is taking up too much memory. This can be caused by low memory \
    availability or excessive memory consumption by WMI.";

pub const WBEM_E_TIMED_OUT: u32 = 0x80041069;
const WBEM_E_TIMED_OUT_EN: &str = "(WBEM_E_TIMED_OUT) Operation timed out.";

pub const WBEM_E_PROVIDER_TIMED_OUT: u32 = 0x80041088;
const WBEM_E_PROVIDER_TIMED_OUT_EN: &str =
    "(WBEM_E_PROVIDER_TIMED_OUT) A provider failed to report results within the specified \
    timeout.";
