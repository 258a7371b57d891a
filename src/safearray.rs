/// Number of elements in a one dimensional array with the given inclusive bounds.
///
/// An empty SAFEARRAY reports an upper bound one below its lower bound.
pub fn element_count(lower_bound: i32, upper_bound: i32) -> usize {
    let count = i64::from(upper_bound) - i64::from(lower_bound) + 1;

    count.max(0) as usize
}

#[cfg(windows)]
pub use native::*;

#[cfg(windows)]
mod native {
    use super::element_count;
    use crate::variant::{VarType, Variant};
    use crate::{WMIError, WMIResult};
    use std::marker::PhantomData;
    use std::ptr::{null_mut, NonNull};
    use std::slice;
    use windows::core::BSTR;
    use windows::Win32::Foundation::{VARIANT_BOOL, VARIANT_TRUE};
    use windows::Win32::System::Com::SAFEARRAY;
    use windows::Win32::System::Ole::{
        SafeArrayAccessData, SafeArrayGetLBound, SafeArrayGetUBound, SafeArrayUnaccessData,
    };
    use windows::Win32::System::Variant::*;

    /// An accessor to SafeArray, which:
    /// 1. Locks the array so the data can be read.
    /// 2. Unlocks the array once dropped.
    ///
    /// Pointers to a Safe Array can come from different places (like GetNames, WMI property value),
    /// which can have different drop behavior (GetNames require the caller to deallocate the array,
    /// while a WMI property must be deallocated via VariantClear).
    ///
    /// For this reason, we don't have a `struct SafeArray`.
    ///
    /// However, accessing the data of the array must be done using a lock, which is the responsibility
    /// of this struct.
    #[derive(Debug)]
    pub struct SafeArrayAccessor<'a, T> {
        arr: NonNull<SAFEARRAY>,
        p_data: *mut T,
        lower_bound: i32,
        upper_bound: i32,
        _phantom: PhantomData<&'a T>,
    }

    impl<'a, T> SafeArrayAccessor<'a, T> {
        /// Creates a new Accessor, locking the given array,
        ///
        /// # Safety
        ///
        /// This function is unsafe as it is the caller's responsibility to verify that the array is
        /// of items of type T, and that it outlives the accessor.
        pub unsafe fn new(arr: NonNull<SAFEARRAY>) -> WMIResult<Self> {
            let mut p_data = null_mut();

            let lower_bound = unsafe { SafeArrayGetLBound(arr.as_ptr(), 1)? };
            let upper_bound = unsafe { SafeArrayGetUBound(arr.as_ptr(), 1)? };

            unsafe { SafeArrayAccessData(arr.as_ptr(), &mut p_data)? };

            Ok(Self {
                arr,
                p_data: p_data as *mut T,
                lower_bound,
                upper_bound,
                _phantom: PhantomData,
            })
        }

        pub fn len(&self) -> usize {
            element_count(self.lower_bound, self.upper_bound)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        /// Iterate over the elements of the array, in order.
        pub fn iter(&self) -> impl Iterator<Item = &'_ T> + '_ {
            // `SafeArrayAccessData` points at the element with the lower bound index.
            let data_slice: &[T] = if self.is_empty() || self.p_data.is_null() {
                &[]
            } else {
                unsafe { slice::from_raw_parts(self.p_data, self.len()) }
            };

            data_slice.iter()
        }
    }

    impl<'a, T> Drop for SafeArrayAccessor<'a, T> {
        fn drop(&mut self) {
            // Nothing can be done if unlocking fails.
            let _result = unsafe { SafeArrayUnaccessData(self.arr.as_ptr()) };
        }
    }

    unsafe fn copy_items<T>(
        arr: NonNull<SAFEARRAY>,
        item_type: VarType,
        convert: impl Fn(&T) -> WMIResult<Variant>,
    ) -> WMIResult<Variant> {
        let accessor = unsafe { SafeArrayAccessor::<T>::new(arr)? };

        let items = accessor.iter().map(convert).collect::<WMIResult<Vec<_>>>()?;

        Ok(Variant::Array(item_type, items))
    }

    /// Copy the items of a one dimensional SAFEARRAY.
    ///
    /// The array is unlocked before returning, but not destroyed.
    ///
    /// # Safety
    ///
    /// The array must hold items of `item_type`.
    pub unsafe fn safe_array_to_vec(
        arr: NonNull<SAFEARRAY>,
        item_type: VARENUM,
    ) -> WMIResult<Variant> {
        fn copy<T: Copy + Into<Variant>>(item: &T) -> WMIResult<Variant> {
            Ok((*item).into())
        }

        match item_type {
            VT_BSTR => unsafe {
                copy_items::<BSTR>(arr, VarType::BStr, |item| {
                    Ok(Variant::String(item.to_string()))
                })
            },
            VT_BOOL => unsafe {
                copy_items::<VARIANT_BOOL>(arr, VarType::Bool, |item| {
                    Ok(Variant::Bool(*item == VARIANT_TRUE))
                })
            },
            VT_I1 => unsafe { copy_items::<i8>(arr, VarType::I1, copy) },
            VT_I2 => unsafe { copy_items::<i16>(arr, VarType::I2, copy) },
            VT_I4 => unsafe { copy_items::<i32>(arr, VarType::I4, copy) },
            VT_I8 => unsafe { copy_items::<i64>(arr, VarType::I8, copy) },
            VT_UI1 => unsafe { copy_items::<u8>(arr, VarType::UI1, copy) },
            VT_UI2 => unsafe { copy_items::<u16>(arr, VarType::UI2, copy) },
            VT_UI4 => unsafe { copy_items::<u32>(arr, VarType::UI4, copy) },
            VT_UI8 => unsafe { copy_items::<u64>(arr, VarType::UI8, copy) },
            VT_R4 => unsafe { copy_items::<f32>(arr, VarType::R4, copy) },
            VT_R8 => unsafe { copy_items::<f64>(arr, VarType::R8, copy) },
            _ => Err(WMIError::ConvertError(item_type.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::element_count;

    #[test]
    fn it_counts_inclusive_bounds() {
        assert_eq!(element_count(0, 4), 5);
        assert_eq!(element_count(1, 1), 1);
        assert_eq!(element_count(-2, 2), 5);
    }

    #[test]
    fn it_counts_empty_arrays() {
        assert_eq!(element_count(0, -1), 0);
        assert_eq!(element_count(3, 0), 0);
    }
}
