//! Data-channel interfaces: writing per-step output and loading
//! external arrays.
//!
//! The core never talks to a storage format directly. Output goes
//! through a [`DataSink`], which appends one record per write to a
//! dataset created up front. Initial states come from a [`StateSource`],
//! which yields a shaped array in cell-index order.

use crate::error::DataError;

/// The element type of a dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 64-bit float.
    Float,
    /// Signed 64-bit integer.
    Int,
    /// Unsigned 64-bit integer.
    UInt,
    /// Boolean.
    Bool,
}

/// A single value of any [`ElementKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scalar {
    /// A float value.
    Float(f64),
    /// A signed integer value.
    Int(i64),
    /// An unsigned integer value.
    UInt(u64),
    /// A boolean value.
    Bool(bool),
}

impl Scalar {
    /// The kind of this value.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Float(_) => ElementKind::Float,
            Self::Int(_) => ElementKind::Int,
            Self::UInt(_) => ElementKind::UInt,
            Self::Bool(_) => ElementKind::Bool,
        }
    }
}

/// Homogeneous storage for the elements of one dataset.
#[derive(Clone, Debug, PartialEq)]
pub enum DataBuffer {
    /// Float elements.
    Float(Vec<f64>),
    /// Signed integer elements.
    Int(Vec<i64>),
    /// Unsigned integer elements.
    UInt(Vec<u64>),
    /// Boolean elements.
    Bool(Vec<bool>),
}

impl DataBuffer {
    /// An empty buffer for elements of `kind`.
    pub fn new(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Float => Self::Float(Vec::new()),
            ElementKind::Int => Self::Int(Vec::new()),
            ElementKind::UInt => Self::UInt(Vec::new()),
            ElementKind::Bool => Self::Bool(Vec::new()),
        }
    }

    /// The element kind stored.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Float(_) => ElementKind::Float,
            Self::Int(_) => ElementKind::Int,
            Self::UInt(_) => ElementKind::UInt,
            Self::Bool(_) => ElementKind::Bool,
        }
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::UInt(v) => v.len(),
            Self::Bool(v) => v.len(),
        }
    }

    /// Whether no elements are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element at `i`, if in range.
    pub fn get(&self, i: usize) -> Option<Scalar> {
        match self {
            Self::Float(v) => v.get(i).copied().map(Scalar::Float),
            Self::Int(v) => v.get(i).copied().map(Scalar::Int),
            Self::UInt(v) => v.get(i).copied().map(Scalar::UInt),
            Self::Bool(v) => v.get(i).copied().map(Scalar::Bool),
        }
    }

    /// Append a value. Returns `false` (and stores nothing) if the kind
    /// does not match.
    pub fn push(&mut self, value: Scalar) -> bool {
        match (self, value) {
            (Self::Float(v), Scalar::Float(x)) => v.push(x),
            (Self::Int(v), Scalar::Int(x)) => v.push(x),
            (Self::UInt(v), Scalar::UInt(x)) => v.push(x),
            (Self::Bool(v), Scalar::Bool(x)) => v.push(x),
            _ => return false,
        }
        true
    }
}

/// A Rust type that can be stored in a dataset element.
pub trait DataElement: Copy + Sized {
    /// The dataset element kind this type is stored as.
    const KIND: ElementKind;

    /// Convert to the storage representation.
    fn to_scalar(self) -> Scalar;

    /// Convert from the storage representation. `None` if the kind does
    /// not match or the value does not fit.
    fn from_scalar(s: Scalar) -> Option<Self>;
}

macro_rules! impl_data_element {
    ($t:ty, $kind:ident, $repr:ty) => {
        impl DataElement for $t {
            const KIND: ElementKind = ElementKind::$kind;

            fn to_scalar(self) -> Scalar {
                Scalar::$kind(self as $repr)
            }

            fn from_scalar(s: Scalar) -> Option<Self> {
                match s {
                    Scalar::$kind(v) => <$t>::try_from(v).ok(),
                    _ => None,
                }
            }
        }
    };
}

impl_data_element!(i64, Int, i64);
impl_data_element!(i32, Int, i64);
impl_data_element!(u64, UInt, u64);
impl_data_element!(u32, UInt, u64);
impl_data_element!(usize, UInt, u64);

impl DataElement for f64 {
    const KIND: ElementKind = ElementKind::Float;

    fn to_scalar(self) -> Scalar {
        Scalar::Float(self)
    }

    fn from_scalar(s: Scalar) -> Option<Self> {
        match s {
            Scalar::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl DataElement for f32 {
    const KIND: ElementKind = ElementKind::Float;

    fn to_scalar(self) -> Scalar {
        Scalar::Float(f64::from(self))
    }

    fn from_scalar(s: Scalar) -> Option<Self> {
        match s {
            Scalar::Float(v) => Some(v as f32),
            _ => None,
        }
    }
}

impl DataElement for bool {
    const KIND: ElementKind = ElementKind::Bool;

    fn to_scalar(self) -> Scalar {
        Scalar::Bool(self)
    }

    fn from_scalar(s: Scalar) -> Option<Self> {
        match s {
            Scalar::Bool(v) => Some(v),
            _ => None,
        }
    }
}

/// Opaque reference to a dataset created in a [`DataSink`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DatasetHandle(pub usize);

/// Destination for output data.
///
/// A dataset is created once with the shape of a single record; every
/// [`write`](DataSink::write) then appends one record (typically one
/// per written time step).
///
/// All arrays use one axis order: the first axis varies fastest. A record
/// of shape `[dim, num_cells]` therefore lists the components of each
/// cell together, and records stack along a new last axis, so a dataset
/// read back has the shape `[record_shape..., num_records]`.
pub trait DataSink {
    /// Create a dataset at `path` whose records have `record_shape`.
    fn create_dataset(
        &mut self,
        path: &str,
        record_shape: &[usize],
        kind: ElementKind,
    ) -> Result<DatasetHandle, DataError>;

    /// Append one record. `values.len()` must equal the record size.
    fn write<T: DataElement>(&mut self, handle: DatasetHandle, values: &[T])
        -> Result<(), DataError>;
}

/// An array loaded from an external source.
///
/// `values` is flat, with the first axis varying fastest (the order
/// [`DataSink`] uses), so that a grid-shaped array lists its elements in
/// cell-index order.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedArray<T> {
    /// Per-axis extents.
    pub shape: Vec<usize>,
    /// The elements.
    pub values: Vec<T>,
}

/// Source of external arrays, e.g. initial cell states.
pub trait StateSource {
    /// Load the array stored at `path`.
    fn load<T: DataElement>(&self, path: &str) -> Result<LoadedArray<T>, DataError>;
}
