//! [`Command`] for starting a [`Trip`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::trip::Status;
use crate::{
    domain::{trip, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Status::Planned`] [`Trip`] to
/// [`Status::InProgress`].
#[derive(Clone, Copy, Debug, From)]
pub struct StartTrip {
    /// ID of the [`Trip`] to start.
    pub trip_id: trip::Id,
}

impl<Db> Command<StartTrip> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Trip>, trip::Id>>,
            Ok = Option<Trip>,
            Err = Traced<database::Error>,
        > + Database<Update<Trip>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Trip;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: StartTrip) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let StartTrip { trip_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut trip = tx
            .execute(Select(By::<Option<Trip>, _>::new(trip_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TripNotExists(trip_id))
            .map_err(tracerr::wrap!())?;

        trip.start().map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Trip(id: {trip_id})` started");
        Ok(trip)
    }
}

/// Error of [`StartTrip`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Trip`] cannot be started.
    #[display("Start refused: {_0}")]
    #[from]
    Trip(trip::Error),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    TripNotExists(#[error(not(source))] trip::Id),
}
