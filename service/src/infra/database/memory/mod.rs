//! In-memory [`Database`] implementation.

pub mod connection;
mod impls;

use std::sync::Arc;

use derive_more::{Deref, Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{Client, Contract, Hotel, Offer, Pilot, Trip},
    infra::database,
};
#[cfg(doc)]
use crate::infra::Database;

pub use self::connection::{Connection, NonTx, Tx};

use self::connection::Storage;

/// In-memory [`Database`] client.
///
/// Tables keep their rows in insertion order.
#[derive(Clone, Debug, Deref)]
pub struct Memory<C = NonTx>(C);

impl Memory {
    /// Creates a new empty [`Memory`] database.
    #[must_use]
    pub fn new() -> Self {
        Self(NonTx::new(Arc::new(Storage::default())))
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection> Memory<C> {
    /// Returns the [`Record`] of the provided `key`, if any.
    fn find<T: Record>(
        &self,
        key: &T::Key,
    ) -> Result<Option<T>, Traced<database::Error>> {
        self.filter(|r: &T| r.key() == key)
            .map(|found| found.into_iter().next())
    }

    /// Returns all the [`Record`]s satisfying the provided predicate.
    fn filter<T: Record>(
        &self,
        predicate: impl Fn(&T) -> bool,
    ) -> Result<Vec<T>, Traced<database::Error>> {
        self.read(|tables| {
            T::table(tables)
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect()
        })
        .map_err(tracerr::wrap!())
    }
}

/// All the tables of a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    /// [`Client`]s table.
    clients: Vec<Client>,

    /// [`Contract`]s table.
    contracts: Vec<Contract>,

    /// [`Hotel`]s table.
    hotels: Vec<Hotel>,

    /// [`Offer`]s table.
    offers: Vec<Offer>,

    /// [`Pilot`]s table.
    pilots: Vec<Pilot>,

    /// [`Trip`]s table.
    trips: Vec<Trip>,
}

/// Row of some table in [`Tables`].
pub trait Record: Clone {
    /// Name of this [`Record`] used in errors.
    const NAME: &'static str;

    /// Unique key of this [`Record`].
    type Key: Eq + Display;

    /// Returns the [`Record::Key`] of this [`Record`].
    fn key(&self) -> &Self::Key;

    /// Returns the table of this [`Record`].
    fn table(tables: &Tables) -> &Vec<Self>;

    /// Returns the mutable table of this [`Record`].
    fn table_mut(tables: &mut Tables) -> &mut Vec<Self>;

    /// Describes this [`Record`] for errors.
    fn describe(&self) -> String {
        format!("`{}({})`", Self::NAME, self.key())
    }
}

/// [`Memory`] database [`Error`].
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// [`Record`] with the same key exists already.
    #[display("{_0} already exists")]
    Duplicate(#[error(not(source))] String),

    /// Sequence has no values left.
    #[display("{_0} sequence is exhausted")]
    Exhausted(#[error(not(source))] String),

    /// Transaction is committed already.
    #[display("transaction is finished already")]
    Finished,

    /// [`Record`] to be updated does not exist.
    #[display("{_0} does not exist")]
    NotFound(#[error(not(source))] String),

    /// Some writer panicked while holding [`Tables`].
    #[display("tables are poisoned by a panicked writer")]
    Poisoned,
}
