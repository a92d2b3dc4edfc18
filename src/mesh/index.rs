//! Index types for mesh elements.
//!
//! Vertices and faces live in plain vectors and are referred to by zero-based
//! contiguous indices. These wrappers keep the two index spaces apart at the
//! type level while staying `Copy` and 4 bytes wide.

use std::fmt::{self, Debug, Display};

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics if the value does not fit in 32 bits.
            #[inline]
            pub fn new(index: usize) -> Self {
                assert!(
                    index <= u32::MAX as usize,
                    "{} index {} too large",
                    $display,
                    index
                );
                Self(index as u32)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Shift this index by `offset`, used when appending one mesh to another.
            #[inline]
            pub fn offset(self, offset: usize) -> Self {
                Self::new(self.index() + offset)
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }

        impl From<$name> for usize {
            fn from(id: $name) -> usize {
                id.index()
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");
