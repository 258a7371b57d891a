use crate::WMIError;
use serde::{Serialize, Serializer};
use std::convert::TryFrom;

#[cfg(windows)]
use crate::{safearray::safe_array_to_vec, WMIResult};
#[cfg(windows)]
use std::ptr::NonNull;
#[cfg(windows)]
use windows::Win32::Foundation::VARIANT_TRUE;
#[cfg(windows)]
use windows::Win32::System::Variant::*;

/// The runtime type tag of a property value, named after the matching `VT_*` constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Empty,
    Null,
    BStr,
    I1,
    I2,
    I4,
    I8,
    R4,
    R8,
    Bool,
    UI1,
    UI2,
    UI4,
    UInt,
    UI8,
}

impl VarType {
    pub const fn name(self) -> &'static str {
        match self {
            VarType::Empty => "VT_EMPTY",
            VarType::Null => "VT_NULL",
            VarType::BStr => "VT_BSTR",
            VarType::I1 => "VT_I1",
            VarType::I2 => "VT_I2",
            VarType::I4 => "VT_I4",
            VarType::I8 => "VT_I8",
            VarType::R4 => "VT_R4",
            VarType::R8 => "VT_R8",
            VarType::Bool => "VT_BOOL",
            VarType::UI1 => "VT_UI1",
            VarType::UI2 => "VT_UI2",
            VarType::UI4 => "VT_UI4",
            VarType::UInt => "VT_UINT",
            VarType::UI8 => "VT_UI8",
        }
    }

    /// Name of an array of this element type, like `VT_ARRAY | VT_BSTR`.
    pub const fn array_name(self) -> &'static str {
        match self {
            VarType::Empty => "VT_ARRAY | VT_EMPTY",
            VarType::Null => "VT_ARRAY | VT_NULL",
            VarType::BStr => "VT_ARRAY | VT_BSTR",
            VarType::I1 => "VT_ARRAY | VT_I1",
            VarType::I2 => "VT_ARRAY | VT_I2",
            VarType::I4 => "VT_ARRAY | VT_I4",
            VarType::I8 => "VT_ARRAY | VT_I8",
            VarType::R4 => "VT_ARRAY | VT_R4",
            VarType::R8 => "VT_ARRAY | VT_R8",
            VarType::Bool => "VT_ARRAY | VT_BOOL",
            VarType::UI1 => "VT_ARRAY | VT_UI1",
            VarType::UI2 => "VT_ARRAY | VT_UI2",
            VarType::UI4 => "VT_ARRAY | VT_UI4",
            VarType::UInt => "VT_ARRAY | VT_UINT",
            VarType::UI8 => "VT_ARRAY | VT_UI8",
        }
    }
}

/// An owned copy of a dynamically typed property value.
///
/// `Array` carries the element tag, so an empty `VT_ARRAY | VT_BSTR` is still
/// distinguishable from an empty array of integers.
#[derive(Debug, PartialEq, Clone)]
pub enum Variant {
    Empty,
    Null,

    String(String),

    I1(i8),
    I2(i16),
    I4(i32),
    I8(i64),

    R4(f32),
    R8(f64),

    Bool(bool),

    UI1(u8),
    UI2(u16),
    UI4(u32),
    /// `VT_UINT`, which is tagged separately from `VT_UI4`.
    UInt(u32),
    UI8(u64),

    Array(VarType, Vec<Variant>),
}

impl Variant {
    /// The tag of this value. For arrays, this is the tag of the elements.
    pub fn var_type(&self) -> VarType {
        match self {
            Variant::Empty => VarType::Empty,
            Variant::Null => VarType::Null,
            Variant::String(_) => VarType::BStr,
            Variant::I1(_) => VarType::I1,
            Variant::I2(_) => VarType::I2,
            Variant::I4(_) => VarType::I4,
            Variant::I8(_) => VarType::I8,
            Variant::R4(_) => VarType::R4,
            Variant::R8(_) => VarType::R8,
            Variant::Bool(_) => VarType::Bool,
            Variant::UI1(_) => VarType::UI1,
            Variant::UI2(_) => VarType::UI2,
            Variant::UI4(_) => VarType::UI4,
            Variant::UInt(_) => VarType::UInt,
            Variant::UI8(_) => VarType::UI8,
            Variant::Array(item_type, _) => *item_type,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(..))
    }

    /// Name of the full tag, like `VT_I4` or `VT_ARRAY | VT_BSTR`.
    pub fn type_name(&self) -> &'static str {
        if self.is_array() {
            self.var_type().array_name()
        } else {
            self.var_type().name()
        }
    }

    fn mismatch(&self, expected: &'static str) -> WMIError {
        WMIError::TypeMismatch {
            property: String::new(),
            expected,
            found: self.type_name().to_string(),
        }
    }
}

#[cfg(windows)]
impl Variant {
    /// Create a `Variant` instance from a raw `VARIANT`.
    ///
    /// The `VARIANT` still owns its payload, and is cleared by its owner once dropped.
    pub fn from_variant(vt: &VARIANT) -> WMIResult<Variant> {
        let variant_type = unsafe { vt.Anonymous.Anonymous.vt };

        // variant_type has two 'forms':
        // 1. A simple type like `VT_BSTR` .
        // 2. An array of certain type like `VT_ARRAY | VT_BSTR`.
        if variant_type & VT_ARRAY == VT_ARRAY {
            let array = NonNull::new(unsafe { vt.Anonymous.Anonymous.Anonymous.parray })
                .ok_or(WMIError::NullPointerResult)?;

            let item_type = variant_type & VT_TYPEMASK;

            return unsafe { safe_array_to_vec(array, item_type) };
        }

        // See https://msdn.microsoft.com/en-us/library/cc237865.aspx for more info.
        let variant_value = match variant_type {
            VT_BSTR => {
                let bstr_ptr = unsafe { &vt.Anonymous.Anonymous.Anonymous.bstrVal };
                Variant::String(bstr_ptr.to_string())
            }
            VT_I1 => {
                let num = unsafe { vt.Anonymous.Anonymous.Anonymous.cVal };

                Variant::I1(num as _)
            }
            VT_I2 => {
                let num: i16 = unsafe { vt.Anonymous.Anonymous.Anonymous.iVal };

                Variant::I2(num)
            }
            VT_I4 => {
                let num: i32 = unsafe { vt.Anonymous.Anonymous.Anonymous.lVal };

                Variant::I4(num)
            }
            VT_I8 => {
                let num: i64 = unsafe { vt.Anonymous.Anonymous.Anonymous.llVal };

                Variant::I8(num)
            }
            VT_R4 => {
                let num: f32 = unsafe { vt.Anonymous.Anonymous.Anonymous.fltVal };

                Variant::R4(num)
            }
            VT_R8 => {
                let num: f64 = unsafe { vt.Anonymous.Anonymous.Anonymous.dblVal };

                Variant::R8(num)
            }
            VT_BOOL => {
                let value = unsafe { vt.Anonymous.Anonymous.Anonymous.boolVal };

                // Only `VARIANT_TRUE` is true.
                Variant::Bool(value == VARIANT_TRUE)
            }
            VT_UI1 => {
                let num: u8 = unsafe { vt.Anonymous.Anonymous.Anonymous.bVal };

                Variant::UI1(num)
            }
            VT_UI2 => {
                let num: u16 = unsafe { vt.Anonymous.Anonymous.Anonymous.uiVal };

                Variant::UI2(num)
            }
            VT_UI4 => {
                let num: u32 = unsafe { vt.Anonymous.Anonymous.Anonymous.ulVal };

                Variant::UI4(num)
            }
            VT_UINT => {
                let num: u32 = unsafe { vt.Anonymous.Anonymous.Anonymous.uintVal };

                Variant::UInt(num)
            }
            VT_UI8 => {
                let num: u64 = unsafe { vt.Anonymous.Anonymous.Anonymous.ullVal };

                Variant::UI8(num)
            }
            VT_EMPTY => Variant::Empty,
            VT_NULL => Variant::Null,
            _ => return Err(WMIError::ConvertError(variant_type.0)),
        };

        Ok(variant_value)
    }
}

macro_rules! impl_try_from_variant {
    ($target_type:ty, $variant_type:ident) => {
        impl TryFrom<Variant> for $target_type {
            type Error = WMIError;

            fn try_from(value: Variant) -> Result<$target_type, Self::Error> {
                match value {
                    Variant::$variant_type(item) => Ok(item),
                    other => Err(other.mismatch(VarType::$variant_type.name())),
                }
            }
        }
    };
}

/// Conversion of a `VT_ARRAY` of the given element tag into a `Vec`.
macro_rules! impl_try_vec_from_variant {
    ($target_type:ty, $variant_type:ident, $var_type:ident) => {
        impl TryFrom<Variant> for Vec<$target_type> {
            type Error = WMIError;

            fn try_from(value: Variant) -> Result<Vec<$target_type>, Self::Error> {
                let array = match value {
                    Variant::Array(VarType::$var_type, array) => array,
                    other => return Err(other.mismatch(VarType::$var_type.array_name())),
                };

                array
                    .into_iter()
                    .map(<$target_type as TryFrom<Variant>>::try_from)
                    .collect()
            }
        }
    };
}

/// Infallible conversion from a Rust type into a Variant wrapper for that type
macro_rules! impl_wrap_type {
    ($target_type:ty, $variant_type:ident, $var_type:ident) => {
        impl From<$target_type> for Variant {
            fn from(value: $target_type) -> Self {
                Variant::$variant_type(value)
            }
        }

        impl From<Vec<$target_type>> for Variant {
            fn from(value: Vec<$target_type>) -> Self {
                Variant::Array(
                    VarType::$var_type,
                    value.into_iter().map(Variant::$variant_type).collect(),
                )
            }
        }
    };
}

/// Add conversions from a Rust type to its Variant form and vice versa
macro_rules! bidirectional_variant_convert {
    ($target_type:ty, $variant_type:ident, $var_type:ident) => {
        impl_try_from_variant!($target_type, $variant_type);
        impl_try_vec_from_variant!($target_type, $variant_type, $var_type);
        impl_wrap_type!($target_type, $variant_type, $var_type);
    };
}

bidirectional_variant_convert!(i8, I1, I1);
bidirectional_variant_convert!(i16, I2, I2);
bidirectional_variant_convert!(i32, I4, I4);
bidirectional_variant_convert!(i64, I8, I8);
bidirectional_variant_convert!(u8, UI1, UI1);
bidirectional_variant_convert!(u16, UI2, UI2);
bidirectional_variant_convert!(u32, UI4, UI4);
bidirectional_variant_convert!(u64, UI8, UI8);
bidirectional_variant_convert!(f32, R4, R4);
bidirectional_variant_convert!(f64, R8, R8);
bidirectional_variant_convert!(bool, Bool, Bool);

// `String` is tagged `VT_BSTR`, so it cannot go through `VarType::$variant_type`.
impl TryFrom<Variant> for String {
    type Error = WMIError;

    fn try_from(value: Variant) -> Result<String, Self::Error> {
        match value {
            Variant::String(item) => Ok(item),
            other => Err(other.mismatch(VarType::BStr.name())),
        }
    }
}

impl_try_vec_from_variant!(String, String, BStr);
impl_wrap_type!(String, String, BStr);

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl Serialize for Variant {
    /// Values serialize untagged, and arrays as plain sequences.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Variant::Empty | Variant::Null => serializer.serialize_unit(),
            Variant::String(s) => serializer.serialize_str(s),
            Variant::I1(n) => serializer.serialize_i8(*n),
            Variant::I2(n) => serializer.serialize_i16(*n),
            Variant::I4(n) => serializer.serialize_i32(*n),
            Variant::I8(n) => serializer.serialize_i64(*n),
            Variant::R4(f) => serializer.serialize_f32(*f),
            Variant::R8(f) => serializer.serialize_f64(*f),
            Variant::Bool(b) => serializer.serialize_bool(*b),
            Variant::UI1(n) => serializer.serialize_u8(*n),
            Variant::UI2(n) => serializer.serialize_u16(*n),
            Variant::UI4(n) | Variant::UInt(n) => serializer.serialize_u32(*n),
            Variant::UI8(n) => serializer.serialize_u64(*n),
            Variant::Array(_, items) => items.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WMIResult;

    #[test]
    fn it_names_array_tags() {
        let variant = Variant::from(vec!["a".to_string()]);

        assert!(variant.is_array());
        assert_eq!(variant.var_type(), VarType::BStr);
        assert_eq!(variant.type_name(), "VT_ARRAY | VT_BSTR");
        assert_eq!(Variant::UInt(1).type_name(), "VT_UINT");
    }

    #[test]
    fn it_converts_matching_tags() {
        assert!(bool::try_from(Variant::Bool(true)).unwrap());
        assert_eq!(u8::try_from(Variant::UI1(7)).unwrap(), 7);
        assert_eq!(i64::try_from(Variant::I8(-5_000_000_000)).unwrap(), -5_000_000_000);
        assert_eq!(
            String::try_from(Variant::from("Microsoft Windows")).unwrap(),
            "Microsoft Windows"
        );
    }

    #[test]
    fn it_does_not_convert_mismatched_tags() {
        let err = bool::try_from(Variant::I4(1)).unwrap_err();

        match err {
            WMIError::TypeMismatch {
                expected, found, ..
            } => {
                assert_eq!(expected, "VT_BOOL");
                assert_eq!(found, "VT_I4");
            }
            other => panic!("Unexpected error {:?}", other),
        }

        // VT_UINT and VT_UI4 are different tags.
        assert!(u32::try_from(Variant::UInt(1)).is_err());
        assert!(i32::try_from(Variant::UI4(1)).is_err());
    }

    #[test]
    fn it_converts_string_arrays_in_order() {
        let variant = Variant::from(vec!["en-US".to_string(), "he-IL".to_string()]);
        let v: Vec<String> = variant.try_into().unwrap();

        assert_eq!(v, vec!["en-US".to_string(), "he-IL".to_string()]);

        let empty: Vec<String> = Variant::Array(VarType::BStr, vec![]).try_into().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn it_does_not_convert_other_arrays_to_strings() {
        let res: WMIResult<Vec<String>> = Variant::Array(VarType::I4, vec![]).try_into();
        assert!(matches!(res, Err(WMIError::TypeMismatch { .. })));

        // A bare string is not a string array.
        let res: WMIResult<Vec<String>> = Variant::from("en-US").try_into();
        assert!(matches!(res, Err(WMIError::TypeMismatch { .. })));
    }

    #[test]
    fn it_serializes_untagged() {
        let value = serde_json::to_value(Variant::from(vec![1u16, 2])).unwrap();
        assert_eq!(value, serde_json::json!([1, 2]));

        let value = serde_json::to_value(Variant::Null).unwrap();
        assert_eq!(value, serde_json::Value::Null);

        let value = serde_json::to_value(Variant::UInt(3)).unwrap();
        assert_eq!(value, serde_json::json!(3));
    }

    #[cfg(windows)]
    mod native {
        use super::*;
        use windows::core::BSTR;
        use windows::Win32::Foundation::VARIANT_BOOL;
        use windows::Win32::System::Com::SAFEARRAY;
        use windows::Win32::System::Ole::{SafeArrayCreateVector, SafeArrayPutElement};

        // The variant owns the array, and destroys it once dropped.
        fn array_variant(arr: *mut SAFEARRAY, item_type: VARENUM) -> VARIANT {
            let mut variant = VARIANT::default();

            unsafe {
                let inner = &mut variant.Anonymous.Anonymous;
                inner.vt = VT_ARRAY | item_type;
                inner.Anonymous.parray = arr;
            }

            variant
        }

        fn string_array(items: &[&str]) -> VARIANT {
            let arr = unsafe { SafeArrayCreateVector(VT_BSTR, 0, items.len() as u32) };
            assert!(!arr.is_null());

            for (index, item) in items.iter().enumerate() {
                let bstr = BSTR::from(*item);

                // The array keeps its own copy of the string.
                unsafe { SafeArrayPutElement(arr, &(index as i32), bstr.as_ptr() as *const _) }
                    .unwrap();
            }

            array_variant(arr, VT_BSTR)
        }

        #[test]
        fn it_decodes_string_arrays_in_order() {
            for items in [&[][..], &["en-US"][..], &["en-US", "he-IL", "fr-FR"][..]] {
                let variant = string_array(items);

                let decoded = Variant::from_variant(&variant).unwrap();
                let expected = items.iter().map(|item| Variant::from(*item)).collect();

                assert_eq!(decoded, Variant::Array(VarType::BStr, expected));

                let strings: Vec<String> = decoded.try_into().unwrap();
                assert_eq!(strings.len(), items.len());
            }
        }

        #[test]
        fn it_reads_only_variant_true_as_true() {
            let values = [VARIANT_TRUE, VARIANT_BOOL(0), VARIANT_BOOL(1)];

            let arr = unsafe { SafeArrayCreateVector(VT_BOOL, 0, values.len() as u32) };
            assert!(!arr.is_null());

            for (index, value) in values.iter().enumerate() {
                let value: *const VARIANT_BOOL = value;

                unsafe { SafeArrayPutElement(arr, &(index as i32), value as *const _) }.unwrap();
            }

            let variant = array_variant(arr, VT_BOOL);
            assert_eq!(
                Variant::from_variant(&variant).unwrap(),
                Variant::from(vec![true, false, false])
            );

            let mut scalar = VARIANT::default();

            unsafe {
                let inner = &mut scalar.Anonymous.Anonymous;
                inner.vt = VT_BOOL;
                inner.Anonymous.boolVal = VARIANT_BOOL(1);
            }

            assert_eq!(Variant::from_variant(&scalar).unwrap(), Variant::Bool(false));
        }
    }
}
