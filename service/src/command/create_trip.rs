//! [`Command`] for planning a new [`Trip`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    Period,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{contact::Text, offer, Contract, Offer, Trip},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for planning a new [`Trip`] realizing an [`Offer`].
#[derive(Clone, Debug)]
pub struct CreateTrip {
    /// ID of the [`Offer`] the [`Trip`] realizes.
    pub offer_id: offer::Id,

    /// [`Period`] of the [`Trip`].
    ///
    /// The departure and the return of the [`Offer`] are used if [`None`].
    pub period: Option<Period>,

    /// Notes of the [`Trip`], if any.
    pub notes: Option<Text>,
}

impl<Db> Command<CreateTrip> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Contract>, offer::Id>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Trip>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Trip;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateTrip) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateTrip {
            offer_id,
            period,
            notes,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let offer = tx
            .execute(Select(By::<Option<Offer>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(offer_id))
            .map_err(tracerr::wrap!())?;
        let period = period
            .or_else(|| offer.period())
            .ok_or(E::InvalidPeriod(offer_id))
            .map_err(tracerr::wrap!())?;

        let contracts = tx
            .execute(Select(By::<Vec<Contract>, _>::new(offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut trip = Trip::new(offer_id, period);
        trip.participants = contracts
            .iter()
            .filter(|c| c.is_reserving())
            .map(|c| c.participants)
            .fold(0, u32::saturating_add);
        trip.notes = notes;

        tx.execute(Insert(trip.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "`Trip(id: {})` of `Offer(id: {offer_id})` planned within {} for \
             {} participant(s)",
            trip.id,
            trip.period,
            trip.participants,
        );
        Ok(trip)
    }
}

/// Error of [`CreateTrip`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Offer`] returns before it departs.
    #[display("`Offer(id: {_0})` returns before its departure")]
    InvalidPeriod(#[error(not(source))] offer::Id),

    /// [`Offer`] doesn't exist.
    #[display("`Offer(id: {_0})` does not exist")]
    OfferNotExists(#[error(not(source))] offer::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::{reason, service},
        domain::{
            contract::spec::contract,
            offer::{
                self,
                spec::{offer, today},
            },
            trip::{self, spec::period},
        },
        infra::Database as _,
    };

    use super::{Command as _, CreateTrip, ExecutionError};

    #[tokio::test]
    async fn counts_participants_of_reserving_contracts() {
        let svc = service();
        let mut o = offer(10, "1000", 30);
        let booked = contract(&o, 3);
        let mut cancelled = contract(&o, 2);
        cancelled.number = "UM/2025/0002".parse().unwrap();
        _ = cancelled.cancel(reason(), &mut o, today()).unwrap();
        svc.database().execute(Insert(o.clone())).await.unwrap();
        svc.database().execute(Insert(booked)).await.unwrap();
        svc.database().execute(Insert(cancelled)).await.unwrap();

        let t = svc
            .execute(CreateTrip {
                offer_id: o.id,
                period: None,
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(t.status, trip::Status::Planned);
        assert_eq!(t.participants, 3);
        assert_eq!(t.period, o.period().unwrap());
    }

    #[tokio::test]
    async fn uses_given_period() {
        let svc = service();
        let o = offer(10, "1000", 30);
        svc.database().execute(Insert(o.clone())).await.unwrap();

        let t = svc
            .execute(CreateTrip {
                offer_id: o.id,
                period: Some(period(31, 3)),
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(t.period, period(31, 3));
        assert_eq!(t.participants, 0);

        let err = svc
            .execute(CreateTrip {
                offer_id: offer::Id::new(),
                period: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::OfferNotExists(_)));
    }
}
