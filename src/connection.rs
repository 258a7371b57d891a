use crate::backend::{Locator, ObjectSystem, Services};
use crate::result_enumerator::IWbemClassWrapper;
use crate::utils::{WMIError, WMIResult};
use log::debug;
use std::marker::PhantomData;
use std::sync::OnceLock;
use windows::core::BSTR;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoInitializeSecurity, CLSCTX_INPROC_SERVER,
    COINIT_MULTITHREADED, EOAC_NONE, RPC_C_AUTHN_LEVEL_DEFAULT, RPC_C_IMP_LEVEL_IMPERSONATE,
};
use windows::Win32::System::Wmi::{
    IEnumWbemClassObject, IWbemLocator, IWbemServices, WbemLocator, WBEM_FLAG_FORWARD_ONLY,
};

// `CoInitializeSecurity` may be called once per process, so its outcome is kept for later callers.
static SECURITY: OnceLock<Result<(), i32>> = OnceLock::new();

/// A marker to indicate that the current thread was `CoInitialize`d.
/// It can be freely copied within the same thread.
#[derive(Clone, Copy, Debug)]
pub struct COMLibrary {
    // Force the type to be `!Send`, as each thread must be initialized separately.
    _phantom: PhantomData<*mut ()>,
}

/// Initialize COM.
///
/// `CoUninitialize` will NOT be called when dropped.
/// See: https://github.com/microsoft/windows-rs/issues/1169#issuecomment-926877227
///
impl COMLibrary {
    /// `CoInitialize`s the COM library for use by the calling thread.
    ///
    /// Security is initialized by each [`WMIRequest`](crate::WMIRequest), so this does not
    /// set it up.
    pub fn new() -> WMIResult<Self> {
        unsafe { CoInitializeEx(None, COINIT_MULTITHREADED).ok()? }

        let instance = Self {
            _phantom: PhantomData,
        };

        Ok(instance)
    }

    /// Assumes that COM was already initialized for this thread.
    ///
    /// # Safety
    ///
    /// This function is unsafe as it is the caller's responsibility to ensure that COM is initialized
    /// and will not be uninitialized while any instance of object is in scope.
    ///
    /// ```edition2018
    /// # #[cfg(windows)]
    /// # fn main() -> wmi_request::WMIResult<()> {
    /// # use wmi_request::*;
    /// # let _actual_com = COMLibrary::new()?;
    /// let initialized_com = unsafe { COMLibrary::assume_initialized() };
    ///
    /// // Later, in the same thread.
    /// let request = WMIRequest::with_system(&initialized_com, "SELECT * FROM Win32_Bios", DEFAULT_NAMESPACE);
    /// # Ok(())
    /// # }
    /// # #[cfg(not(windows))]
    /// # fn main() {}
    /// ```
    pub unsafe fn assume_initialized() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

/// ```compile_fail
/// let com = wmi_request::COMLibrary::new().unwrap();
/// _test_com_lib_not_send(com);
/// ```
fn _test_com_lib_not_send(_s: impl Send) {}

fn init_security() -> Result<(), i32> {
    let result = unsafe {
        CoInitializeSecurity(
            None,
            -1, // let COM choose.
            None,
            None,
            RPC_C_AUTHN_LEVEL_DEFAULT,
            RPC_C_IMP_LEVEL_IMPERSONATE,
            None,
            EOAC_NONE,
            None,
        )
    };

    result.map_err(|e| e.code().0)
}

impl ObjectSystem for COMLibrary {
    type Locator = IWbemLocator;
    type Services = IWbemServices;
    type Enumerator = IEnumWbemClassObject;
    type Object = IWbemClassWrapper;

    fn initialize_security(&self) -> WMIResult<()> {
        let outcome = SECURITY.get_or_init(init_security);

        (*outcome).map_err(|hres| WMIError::HResultError { hres })
    }

    fn create_locator(&self) -> WMIResult<IWbemLocator> {
        let loc: IWbemLocator =
            unsafe { CoCreateInstance(&WbemLocator, None, CLSCTX_INPROC_SERVER)? };

        debug!("Got locator {:?}", loc);

        Ok(loc)
    }
}

impl Locator for IWbemLocator {
    type Services = IWbemServices;

    fn connect_server(&self, namespace: &str) -> WMIResult<IWbemServices> {
        let object_path_bstr = BSTR::from(namespace);

        let svc = unsafe {
            self.ConnectServer(
                &object_path_bstr,
                &BSTR::new(),
                &BSTR::new(),
                &BSTR::new(),
                0,
                &BSTR::new(),
                None,
            )?
        };

        debug!("Got service {:?}", svc);

        Ok(svc)
    }
}

impl Services for IWbemServices {
    type Enumerator = IEnumWbemClassObject;

    fn exec_query(&self, query_language: &str, query: &str) -> WMIResult<IEnumWbemClassObject> {
        let enumerator = unsafe {
            self.ExecQuery(
                &BSTR::from(query_language),
                &BSTR::from(query),
                WBEM_FLAG_FORWARD_ONLY,
                None,
            )?
        };

        debug!("Got enumerator {:?}", enumerator);

        Ok(enumerator)
    }
}
