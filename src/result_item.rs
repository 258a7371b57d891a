use crate::backend::{ClassObject, DateTimeConverter};
use crate::datetime::FileTime;
use crate::variant::{VarType, Variant};
use crate::{WMIError, WMIResult};
use log::trace;
use std::convert::TryFrom;

/// One result object of a query.
///
/// A `ResultItem` holds exactly one reference to the object, or nothing at all. It is not
/// `Clone`: ownership moves with the value, or explicitly with [`ResultItem::take`], and the
/// reference is released once the holder is dropped.
///
/// Every getter reads one named property and checks its type tag before converting it.
/// A failed getter returns an error and touches nothing else.
#[derive(Debug)]
pub struct ResultItem<O> {
    inner: Option<O>,
}

impl<O> Default for ResultItem<O> {
    /// An empty item, which fails every read.
    fn default() -> Self {
        Self { inner: None }
    }
}

impl<O> ResultItem<O> {
    /// Take ownership of an enumerated object, without acquiring another reference.
    pub fn new(object: O) -> Self {
        Self {
            inner: Some(object),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Move the object into a new item, leaving this one empty.
    pub fn take(&mut self) -> Self {
        Self {
            inner: self.inner.take(),
        }
    }

    pub fn inner(&self) -> Option<&O> {
        self.inner.as_ref()
    }

    pub fn into_inner(mut self) -> Option<O> {
        self.inner.take()
    }
}

impl<O> From<O> for ResultItem<O> {
    fn from(object: O) -> Self {
        Self::new(object)
    }
}

/// Attach the property name to an error raised while converting its value.
fn for_property(err: WMIError, name: &str) -> WMIError {
    match err {
        WMIError::TypeMismatch {
            expected, found, ..
        } => WMIError::TypeMismatch {
            property: name.to_string(),
            expected,
            found,
        },
        WMIError::ConversionError { reason, detail, .. } => WMIError::ConversionError {
            property: name.to_string(),
            reason,
            detail,
        },
        WMIError::ConvertError(_) | WMIError::NullPointerResult => WMIError::ConversionError {
            property: name.to_string(),
            reason: "Unsupported WMI data type.",
            detail: err.to_string(),
        },
        other => WMIError::RetrievalError {
            property: name.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

fn conversion_step(err: WMIError, name: &str, reason: &'static str) -> WMIError {
    WMIError::ConversionError {
        property: name.to_string(),
        reason,
        detail: err.to_string(),
    }
}

impl<O: ClassObject> ResultItem<O> {
    fn object(&self, name: &str) -> WMIResult<&O> {
        self.inner.as_ref().ok_or_else(|| WMIError::RetrievalError {
            property: name.to_string(),
            source: None,
        })
    }

    /// Read a property as-is, whatever its type.
    pub fn get_variant(&self, name: &str) -> WMIResult<Variant> {
        let value = self
            .object(name)?
            .get_property(name)
            .map_err(|err| for_property(err, name))?;

        trace!("Got {:?} = {:?}", name, value);

        Ok(value)
    }

    /// Read a property, converting it to any type which can be built from a [`Variant`].
    ///
    /// The property's tag must match the one `T` is stored as. Nothing is coerced: asking
    /// for an `i32` from a `VT_UI4` property is a [`WMIError::TypeMismatch`].
    pub fn get<T>(&self, name: &str) -> WMIResult<T>
    where
        T: TryFrom<Variant, Error = WMIError>,
    {
        let value = self.get_variant(name)?;

        T::try_from(value).map_err(|err| for_property(err, name))
    }

    /// `VT_BOOL`
    pub fn get_bool(&self, name: &str) -> WMIResult<bool> {
        self.get(name)
    }

    /// `VT_UI1`
    pub fn get_uchar(&self, name: &str) -> WMIResult<u8> {
        self.get(name)
    }

    /// `VT_UI2`
    pub fn get_unsigned_short(&self, name: &str) -> WMIResult<u16> {
        self.get(name)
    }

    /// `VT_UINT`. Note that WMI reports most unsigned 32 bit properties as `VT_UI4`,
    /// which is read by [`ResultItem::get_unsigned_long`].
    pub fn get_unsigned_int32(&self, name: &str) -> WMIResult<u32> {
        match self.get_variant(name)? {
            Variant::UInt(value) => Ok(value),
            other => Err(WMIError::TypeMismatch {
                property: name.to_string(),
                expected: VarType::UInt.name(),
                found: other.type_name().to_string(),
            }),
        }
    }

    /// `VT_I4`
    pub fn get_long(&self, name: &str) -> WMIResult<i32> {
        self.get(name)
    }

    /// `VT_UI4`
    pub fn get_unsigned_long(&self, name: &str) -> WMIResult<u32> {
        self.get(name)
    }

    /// `VT_I8`
    pub fn get_long_long(&self, name: &str) -> WMIResult<i64> {
        self.get(name)
    }

    /// `VT_UI8`
    pub fn get_unsigned_long_long(&self, name: &str) -> WMIResult<u64> {
        self.get(name)
    }

    /// `VT_BSTR`
    pub fn get_string(&self, name: &str) -> WMIResult<String> {
        self.get(name)
    }

    /// `VT_ARRAY | VT_BSTR`, in array order. An empty array gives an empty `Vec`.
    pub fn get_vector_of_strings(&self, name: &str) -> WMIResult<Vec<String>> {
        self.get(name)
    }

    /// Read a CIM datetime string property (like `LastBootUpTime`) as a [`FileTime`].
    ///
    /// The conversion is done by the object system's date-time helper, which renders the
    /// value either in UTC, or in local time if `is_local` is set.
    pub fn get_date_time(&self, name: &str, is_local: bool) -> WMIResult<FileTime> {
        let value: String = self.get(name)?;

        let mut helper = self
            .object(name)?
            .create_datetime()
            .map_err(|err| conversion_step(err, name, "Failed to create SWbemDateTime object."))?;

        helper
            .set_value(&value)
            .map_err(|err| conversion_step(err, name, "Failed to set SWbemDateTime value."))?;

        let file_time = helper
            .file_time(is_local)
            .map_err(|err| conversion_step(err, name, "GetFileTime failed."))?;

        trace!("Converted {:?} to file time {}", value, file_time);

        file_time
            .parse()
            .map_err(|err| for_property(err, name))
    }
}
