//! [`Memory`] database connection definitions.

use std::{
    future::Future,
    sync::{self, Arc, RwLock},
};

use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::infra::database::{self, memory::Error};
#[cfg(doc)]
use crate::infra::database::Memory;

use super::Tables;

/// Committed state of a [`Memory`] database shared by all its connections.
#[derive(Debug, Default)]
pub(crate) struct Storage {
    /// Last committed [`Tables`].
    tables: RwLock<Tables>,

    /// Lock serializing all the writers.
    writer: Arc<Mutex<()>>,
}

/// Generic [`Memory`] database connection.
pub trait Connection {
    /// Runs the provided function over the [`Tables`] visible to this
    /// [`Connection`].
    ///
    /// # Errors
    ///
    /// If the [`Tables`] cannot be accessed.
    fn read<T>(
        &self,
        f: impl FnOnce(&Tables) -> T,
    ) -> Result<T, Traced<database::Error>>;

    /// Runs the provided function mutating the [`Tables`] visible to this
    /// [`Connection`].
    ///
    /// # Errors
    ///
    /// If the [`Tables`] cannot be accessed, or the provided function fails.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, Error>,
    ) -> impl Future<Output = Result<T, Traced<database::Error>>>;
}

/// Non-transactional [`Memory`] database connection.
///
/// Reads the last committed [`Tables`], while every write is committed
/// immediately.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`Storage`] of this connection.
    storage: Arc<Storage>,
}

impl NonTx {
    /// Creates a new [`NonTx`] connection to the provided [`Storage`].
    #[must_use]
    pub(crate) fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }
}

impl Connection for NonTx {
    fn read<T>(
        &self,
        f: impl FnOnce(&Tables) -> T,
    ) -> Result<T, Traced<database::Error>> {
        let tables = self
            .storage
            .tables
            .read()
            .map_err(|_| tracerr::new!(Error::Poisoned))
            .map_err(tracerr::map_from)?;
        Ok(f(&tables))
    }

    async fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, Error>,
    ) -> Result<T, Traced<database::Error>> {
        let _writer = self.storage.writer.lock().await;
        let mut tables = self
            .storage
            .tables
            .write()
            .map_err(|_| tracerr::new!(Error::Poisoned))
            .map_err(tracerr::map_from)?;
        f(&mut tables)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// Transactional [`Memory`] database connection.
///
/// Holds the writer lock of its [`Storage`] until committed or dropped, and
/// stages all the changes on a snapshot of the [`Tables`]. Dropping a [`Tx`]
/// without committing discards its changes.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Storage`] to commit the staged [`Tables`] into.
    storage: Arc<Storage>,

    /// Staged changes, if not committed yet.
    staged: Arc<sync::Mutex<Option<Staged>>>,
}

/// Changes staged by a [`Tx`].
#[derive(Debug)]
struct Staged {
    /// Snapshot of the [`Tables`] with the changes applied.
    tables: Tables,

    /// Guard of the [`Storage`] writer lock.
    _writer: OwnedMutexGuard<()>,
}

impl Tx {
    /// Begins a new [`Tx`] over the provided [`NonTx`] connection, waiting
    /// for the previous writers to finish.
    ///
    /// # Errors
    ///
    /// If the committed [`Tables`] cannot be accessed.
    pub(crate) async fn begin(
        non_tx: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let storage = Arc::clone(&non_tx.storage);
        let writer = Arc::clone(&storage.writer).lock_owned().await;
        let tables = non_tx.read(Tables::clone).map_err(tracerr::wrap!())?;
        Ok(Self {
            storage,
            staged: Arc::new(sync::Mutex::new(Some(Staged {
                tables,
                _writer: writer,
            }))),
        })
    }

    /// Publishes the changes of this [`Tx`] and releases the writer lock.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already.
    pub(crate) fn commit(&self) -> Result<(), Traced<database::Error>> {
        let staged = self
            .staged
            .lock()
            .map_err(|_| tracerr::new!(Error::Poisoned))
            .map_err(tracerr::map_from)?
            .take()
            .ok_or_else(|| tracerr::new!(Error::Finished))
            .map_err(tracerr::map_from)?;

        let mut tables = self
            .storage
            .tables
            .write()
            .map_err(|_| tracerr::new!(Error::Poisoned))
            .map_err(tracerr::map_from)?;
        *tables = staged.tables;
        Ok(())
    }

    /// Runs the provided function over the [`Staged`] changes.
    fn with_staged<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, Error>,
    ) -> Result<T, Traced<database::Error>> {
        let mut staged = self
            .staged
            .lock()
            .map_err(|_| tracerr::new!(Error::Poisoned))
            .map_err(tracerr::map_from)?;
        let staged = staged
            .as_mut()
            .ok_or_else(|| tracerr::new!(Error::Finished))
            .map_err(tracerr::map_from)?;
        f(&mut staged.tables)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Connection for Tx {
    fn read<T>(
        &self,
        f: impl FnOnce(&Tables) -> T,
    ) -> Result<T, Traced<database::Error>> {
        self.with_staged(|tables| Ok(f(tables)))
    }

    async fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, Error>,
    ) -> Result<T, Traced<database::Error>> {
        self.with_staged(f)
    }
}
