//! [`Command`] for lodging a [`Trip`] in a [`Hotel`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{hotel, trip, Hotel, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for lodging a [`Trip`] in a partner [`Hotel`].
#[derive(Clone, Copy, Debug)]
pub struct AssignHotel {
    /// ID of the [`Trip`] to lodge.
    pub trip_id: trip::Id,

    /// ID of the [`Hotel`] lodging the [`Trip`].
    pub hotel_id: hotel::Id,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<AssignHotel> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Trip>, trip::Id>>,
            Ok = Option<Trip>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Trip>, hotel::Id>>,
            Ok = Vec<Trip>,
            Err = Traced<database::Error>,
        > + Database<Update<Trip>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Trip;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AssignHotel,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AssignHotel {
            trip_id,
            hotel_id,
            today,
        } = cmd;

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
        let hotel = tx
            .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::HotelNotExists(hotel_id))
            .map_err(tracerr::wrap!())?;
        let trips = tx
            .execute(Select(By::<Vec<Trip>, _>::new(hotel_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        hotel.lodge(&mut trip, &trips, today).map_err(|e| {
            log::warn!(
                "`Hotel(id: {hotel_id})` cannot lodge `Trip(id: {trip_id})`: \
                 {e}",
            );
            tracerr::new!(E::from(e))
        })?;

        tx.execute(Update(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Trip(id: {trip_id})` lodged in `{}`", hotel.full_name());
        Ok(trip)
    }
}

/// Error of [`AssignHotel`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Hotel`] cannot lodge the [`Trip`].
    #[display("Lodging refused: {_0}")]
    #[from]
    Hotel(hotel::Error),

    /// [`Hotel`] doesn't exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    HotelNotExists(#[error(not(source))] hotel::Id),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    TripNotExists(#[error(not(source))] trip::Id),
}
