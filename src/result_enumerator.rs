use crate::backend::{ClassObject, DateTimeConverter, ResultEnumerator};
use crate::{Variant, WMIResult};
use log::trace;
use windows::core::{BSTR, HSTRING};
use windows::Win32::Foundation::{VARIANT_FALSE, VARIANT_TRUE};
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_INPROC_SERVER};
use windows::Win32::System::Variant::VARIANT;
use windows::Win32::System::Wmi::{
    IEnumWbemClassObject, ISWbemDateTime, IWbemClassObject, SWbemDateTime, WBEM_INFINITE,
};

/// A wrapper around IWbemClassObject, which owns one reference to the object.
///
/// It is intentionally not `Clone`: moving the wrapper moves the reference.
#[derive(Debug)]
pub struct IWbemClassWrapper {
    pub inner: IWbemClassObject,
}

impl IWbemClassWrapper {
    pub fn new(inner: IWbemClassObject) -> Self {
        Self { inner }
    }
}

impl ClassObject for IWbemClassWrapper {
    type DateTime = ISWbemDateTime;

    fn get_property(&self, property_name: &str) -> WMIResult<Variant> {
        let mut vt_prop = VARIANT::default();

        unsafe {
            self.inner.Get(
                &HSTRING::from(property_name),
                0,
                &mut vt_prop,
                None,
                None,
            )?;
        }

        // `vt_prop` is cleared once dropped, and the value holds its own copy.
        Variant::from_variant(&vt_prop)
    }

    fn create_datetime(&self) -> WMIResult<ISWbemDateTime> {
        let dt = unsafe { CoCreateInstance(&SWbemDateTime, None, CLSCTX_INPROC_SERVER)? };

        Ok(dt)
    }
}

impl ResultEnumerator for IEnumWbemClassObject {
    type Object = IWbemClassWrapper;

    fn next_object(&mut self) -> WMIResult<Option<IWbemClassWrapper>> {
        let mut objs = [None];
        let mut return_value = 0;

        unsafe { self.Next(WBEM_INFINITE.0, &mut objs, &mut return_value).ok()? };

        // Fewer objects than requested means the enumeration is done.
        if return_value == 0 {
            return Ok(None);
        }

        let [obj] = objs;

        trace!("Got enumerator {:?} and obj {:?}", self, obj);

        Ok(obj.map(IWbemClassWrapper::new))
    }
}

impl DateTimeConverter for ISWbemDateTime {
    fn set_value(&mut self, value: &str) -> WMIResult<()> {
        unsafe { self.SetValue(&BSTR::from(value))? };

        Ok(())
    }

    fn file_time(&self, is_local: bool) -> WMIResult<String> {
        let is_local = if is_local { VARIANT_TRUE } else { VARIANT_FALSE };

        let file_time = unsafe { self.GetFileTime(is_local)? };

        Ok(file_time.to_string())
    }
}
