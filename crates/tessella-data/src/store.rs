//! The in-memory data store.

use indexmap::IndexMap;
use tessella_core::{
    DataBuffer, DataElement, DataError, DataSink, DatasetHandle, ElementKind, LoadedArray,
    StateSource,
};
use tracing::debug;

use crate::path::DataPath;

/// One stored dataset.
#[derive(Clone, Debug, PartialEq)]
enum Entry {
    /// Records appended through [`DataSink::write`].
    Records {
        record_shape: Vec<usize>,
        num_records: usize,
        buffer: DataBuffer,
    },
    /// A complete array inserted with [`MemoryStore::insert_array`].
    Array { shape: Vec<usize>, buffer: DataBuffer },
}

impl Entry {
    fn buffer(&self) -> &DataBuffer {
        match self {
            Self::Records { buffer, .. } | Self::Array { buffer, .. } => buffer,
        }
    }

    fn shape(&self) -> Vec<usize> {
        match self {
            Self::Records {
                record_shape,
                num_records,
                ..
            } => record_shape
                .iter()
                .copied()
                .chain(std::iter::once(*num_records))
                .collect(),
            Self::Array { shape, .. } => shape.clone(),
        }
    }
}

/// Datasets held in memory, in creation order.
///
/// Dataset handles are creation indices and stay valid for the store's
/// lifetime.
///
/// # Examples
///
/// ```
/// use tessella_core::{DataSink, ElementKind};
/// use tessella_data::MemoryStore;
///
/// let mut store = MemoryStore::new();
/// let h = store.create_dataset("cells/state", &[3], ElementKind::Float).unwrap();
/// store.write(h, &[1.0, 2.0, 3.0]).unwrap();
/// store.write(h, &[4.0, 5.0, 6.0]).unwrap();
///
/// let data = store.read::<f64>("cells/state").unwrap();
/// assert_eq!(data.shape, vec![3, 2]);
/// assert_eq!(data.values[3], 4.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: IndexMap<DataPath, Entry>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a dataset exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        DataPath::parse(path).is_ok_and(|p| self.entries.contains_key(&p))
    }

    /// All dataset paths, in creation order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(DataPath::as_str)
    }

    /// Dataset paths inside `group`, in creation order.
    pub fn paths_in<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .keys()
            .filter(move |p| p.is_in(group))
            .map(DataPath::as_str)
    }

    /// Number of records written to the dataset at `path`; `None` for
    /// unknown paths and for inserted arrays.
    pub fn num_records(&self, path: &str) -> Option<usize> {
        match self.entry(path).ok()? {
            Entry::Records { num_records, .. } => Some(*num_records),
            Entry::Array { .. } => None,
        }
    }

    /// Store a complete array at `path`, e.g. initial states.
    ///
    /// `values` is flat with the first axis varying fastest.
    pub fn insert_array<T: DataElement>(
        &mut self,
        path: &str,
        shape: &[usize],
        values: &[T],
    ) -> Result<(), DataError> {
        let key = self.vacant(path)?;
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(DataError::RecordSizeMismatch {
                path: key.to_string(),
                expected,
                actual: values.len(),
            });
        }
        let mut buffer = DataBuffer::new(T::KIND);
        for v in values {
            buffer.push(v.to_scalar());
        }
        debug!(path = %key, shape = ?shape, "inserted array");
        self.entries.insert(
            key,
            Entry::Array {
                shape: shape.to_vec(),
                buffer,
            },
        );
        Ok(())
    }

    /// Read a dataset as a shaped array.
    ///
    /// Written datasets have the shape `[record_shape..., num_records]`;
    /// inserted arrays have the shape they were inserted with.
    pub fn read<T: DataElement>(&self, path: &str) -> Result<LoadedArray<T>, DataError> {
        let entry = self.entry(path)?;
        let buffer = entry.buffer();
        if buffer.kind() != T::KIND {
            return Err(DataError::TypeMismatch {
                path: path.to_owned(),
                stored: buffer.kind(),
                requested: T::KIND,
            });
        }
        let values = (0..buffer.len())
            .map(|i| buffer.get(i).and_then(T::from_scalar))
            .collect::<Option<Vec<T>>>()
            .ok_or_else(|| DataError::InvalidDataset {
                path: path.to_owned(),
                reason: format!(
                    "values do not fit into the requested type {}",
                    std::any::type_name::<T>()
                ),
            })?;
        Ok(LoadedArray {
            shape: entry.shape(),
            values,
        })
    }

    fn entry(&self, path: &str) -> Result<&Entry, DataError> {
        let key = DataPath::parse(path)?;
        self.entries.get(&key).ok_or_else(|| DataError::LoadFailed {
            path: path.to_owned(),
            reason: "no such dataset".into(),
        })
    }

    fn vacant(&self, path: &str) -> Result<DataPath, DataError> {
        let key = DataPath::parse(path)?;
        if self.entries.contains_key(&key) {
            return Err(DataError::DuplicatePath {
                path: key.to_string(),
            });
        }
        Ok(key)
    }
}

impl DataSink for MemoryStore {
    fn create_dataset(
        &mut self,
        path: &str,
        record_shape: &[usize],
        kind: ElementKind,
    ) -> Result<DatasetHandle, DataError> {
        let key = self.vacant(path)?;
        debug!(path = %key, record_shape = ?record_shape, kind = ?kind, "created dataset");
        let (index, _) = self.entries.insert_full(
            key,
            Entry::Records {
                record_shape: record_shape.to_vec(),
                num_records: 0,
                buffer: DataBuffer::new(kind),
            },
        );
        Ok(DatasetHandle(index))
    }

    fn write<T: DataElement>(
        &mut self,
        handle: DatasetHandle,
        values: &[T],
    ) -> Result<(), DataError> {
        let (path, entry) = self
            .entries
            .get_index_mut(handle.0)
            .ok_or(DataError::UnknownHandle { handle: handle.0 })?;
        let Entry::Records {
            record_shape,
            num_records,
            buffer,
        } = entry
        else {
            return Err(DataError::InvalidDataset {
                path: path.to_string(),
                reason: "inserted arrays cannot be appended to".into(),
            });
        };
        if buffer.kind() != T::KIND {
            return Err(DataError::TypeMismatch {
                path: path.to_string(),
                stored: buffer.kind(),
                requested: T::KIND,
            });
        }
        let expected: usize = record_shape.iter().product();
        if values.len() != expected {
            return Err(DataError::RecordSizeMismatch {
                path: path.to_string(),
                expected,
                actual: values.len(),
            });
        }
        for v in values {
            buffer.push(v.to_scalar());
        }
        *num_records += 1;
        Ok(())
    }
}

impl StateSource for MemoryStore {
    fn load<T: DataElement>(&self, path: &str) -> Result<LoadedArray<T>, DataError> {
        self.read(path)
    }
}
