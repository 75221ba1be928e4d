//! [`Command`] for releasing a [`Pilot`] from a [`Trip`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Pilot;
use crate::{
    domain::{trip, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for releasing the [`Pilot`] guiding a [`Trip`].
#[derive(Clone, Copy, Debug, From)]
pub struct UnassignPilot {
    /// ID of the [`Trip`] to release the [`Pilot`] from.
    pub trip_id: trip::Id,
}

impl<Db> Command<UnassignPilot> for Service<Db>
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

    async fn execute(
        &self,
        cmd: UnassignPilot,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UnassignPilot { trip_id } = cmd;

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

        let Some(pilot_id) = trip
            .unassign_pilot()
            .map_err(tracerr::from_and_wrap!(=> E))?
        else {
            return Ok(trip);
        };

        tx.execute(Update(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Pilot(id: {pilot_id})` released from `Trip(id: {trip_id})`",
        );
        Ok(trip)
    }
}

/// Error of [`UnassignPilot`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Trip`] is completed already.
    #[display("Release refused: {_0}")]
    #[from]
    Trip(trip::Error),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    TripNotExists(#[error(not(source))] trip::Id),
}
