//! Writing cell data to a [`DataSink`].
//!
//! Every record covers all cells in ID order. Per-cell vectors, such as
//! positions, are stored with the vector component varying fastest.

use tessella_core::{DataElement, DataError, DataSink, DatasetHandle, ElementKind};
use tracing::debug;

use crate::cell::Cell;
use crate::error::CellManagerError;
use crate::manager::CellManager;

impl<S, L, R> CellManager<S, L, R> {
    /// Create a dataset at `path` holding one `T` per cell and record.
    pub fn create_cell_dataset<T: DataElement, D: DataSink>(
        &self,
        sink: &mut D,
        path: &str,
    ) -> Result<DatasetHandle, DataError> {
        debug!(path, num_cells = self.len(), "creating cell dataset");
        sink.create_dataset(path, &[self.len()], T::KIND)
    }

    /// Append one record to `handle`: `adaptor` applied to every cell.
    pub fn write_cell_data<T, D>(
        &self,
        sink: &mut D,
        handle: DatasetHandle,
        adaptor: impl Fn(&Cell<S, L>) -> T,
    ) -> Result<(), DataError>
    where
        T: DataElement,
        D: DataSink,
    {
        let values: Vec<T> = self.cells().iter().map(adaptor).collect();
        sink.write(handle, &values)
    }

    /// Write the barycenters of all cells as a single record of shape
    /// `[dim, num_cells]` at `path`. With the first axis varying fastest,
    /// the components of each barycenter are adjacent.
    pub fn write_positions<D: DataSink>(
        &self,
        sink: &mut D,
        path: &str,
    ) -> Result<(), CellManagerError> {
        let dim = self.space().dim();
        let mut values = Vec::with_capacity(dim * self.len());
        for cell in self.cells() {
            values.extend_from_slice(&self.barycenter_of(cell.id())?);
        }
        let handle = sink.create_dataset(path, &[dim, self.len()], ElementKind::Float)?;
        sink.write(handle, &values)?;
        Ok(())
    }

    /// Write the IDs of all cells as a single record at `path`.
    pub fn write_ids<D: DataSink>(&self, sink: &mut D, path: &str) -> Result<(), DataError> {
        let handle = sink.create_dataset(path, &[self.len()], ElementKind::UInt)?;
        let ids: Vec<usize> = self.cells().iter().map(|c| c.id().index()).collect();
        sink.write(handle, &ids)
    }
}
