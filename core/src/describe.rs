//! # Describe
//!
//! Compile-time source of [`TypeDescriptor`]s for ordinary Rust types.
//!
//! Record types implement [`Describe`] by hand (or through a code generator)
//! and refer to their members with [`FieldDescriptor::of`](crate::descriptor::FieldDescriptor::of),
//! which defers the member descriptor so that self-referential records stay finite.

use crate::descriptor::{PrimitiveKind, TypeDescriptor};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// Types that can describe their own shape.
pub trait Describe {
    /// Returns the descriptor of `Self`.
    fn describe() -> TypeDescriptor;
}

macro_rules! describe_primitive {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::primitive($kind, stringify!($ty))
                }
            }
        )+
    };
}

describe_primitive!(PrimitiveKind::Boolean => bool);
describe_primitive!(PrimitiveKind::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
describe_primitive!(PrimitiveKind::Number => f32, f64);
describe_primitive!(PrimitiveKind::String => char, String, str);

macro_rules! describe_pointer {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Describe + ?Sized> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::pointer(T::describe())
                }
            }
        )+
    };
}

describe_pointer!(Box, Arc, Rc);

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::pointer(T::describe())
    }
}

macro_rules! describe_sequence {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl<T: Describe> Describe for $ty<T> {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::sequence(T::describe())
                }
            }
        )+
    };
}

describe_sequence!(Vec, VecDeque, HashSet, BTreeSet);

impl<T: Describe> Describe for [T] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl Describe for serde_json::Value {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::primitive(PrimitiveKind::Other, "Value")
    }
}

impl<Tz: chrono::TimeZone> Describe for chrono::DateTime<Tz> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::DateTime
    }
}

impl Describe for chrono::NaiveDateTime {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::DateTime
    }
}
