//! [`Query`] collection related to the multiple [`Pilot`]s.

use common::{
    operations::{By, Select},
    Date,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;

use crate::{
    domain::{
        destination::Requirements,
        offer,
        pilot::{self, matching},
        trip, Offer, Pilot, Trip,
    },
    infra::{database, Database},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries all the [`Pilot`]s.
pub type All = DatabaseQuery<By<Vec<Pilot>, ()>>;

/// [`Query`] for [`pilot::Status::Active`] [`Pilot`]s whose license expires
/// within the configured number of days, the soonest expiring first.
#[derive(Clone, Copy, Debug, From)]
pub struct ExpiringLicenses {
    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Query<ExpiringLicenses> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Pilot>, ()>>,
        Ok = Vec<Pilot>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Pilot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ExpiringLicenses { today }: ExpiringLicenses,
    ) -> Result<Self::Ok, Self::Err> {
        let days = self.config().pilots.license_reminder_days;
        let pilots = self
            .database()
            .execute(Select(By::<Vec<Pilot>, _>::new(())))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(pilots
            .into_iter()
            .filter(|p| {
                p.status == pilot::Status::Active
                    && p.license_expires_within(days, today)
            })
            .sorted_by_key(|p| p.license_expires_on)
            .collect())
    }
}

/// [`Pilot`] recommended to guide a [`Trip`].
#[derive(Clone, Debug)]
pub struct Recommendation {
    /// Recommended [`Pilot`].
    pub pilot: Pilot,

    /// [`matching::Score`] of the [`Pilot`].
    pub score: matching::Score,
}

impl From<matching::Candidate<'_>> for Recommendation {
    fn from(candidate: matching::Candidate<'_>) -> Self {
        Self {
            pilot: candidate.pilot.clone(),
            score: candidate.score,
        }
    }
}

/// [`Query`] for everything the matching of [`Pilot`]s to a [`Trip`] needs.
#[derive(Clone, Copy, Debug, From)]
pub struct MatchingPool {
    /// ID of the [`Trip`] to be guided.
    pub trip_id: trip::Id,
}

/// Output of the [`MatchingPool`] [`Query`].
#[derive(Clone, Debug)]
pub struct Pool {
    /// [`Trip`] to be guided.
    pub trip: Trip,

    /// [`Requirements`] of the [`Trip`] destination.
    pub requirements: Requirements,

    /// All the [`Pilot`]s, ordered by their names and IDs.
    pub pilots: Vec<Pilot>,

    /// All the [`Trip`]s, the guided ones included.
    pub trips: Vec<Trip>,
}

impl<Db> Query<MatchingPool> for Service<Db>
where
    Db: Database<
            Select<By<Option<Trip>, trip::Id>>,
            Ok = Option<Trip>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Offer>, offer::Id>>,
            Ok = Option<Offer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Pilot>, ()>>,
            Ok = Vec<Pilot>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Trip>, ()>>,
            Ok = Vec<Trip>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Pool;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        MatchingPool { trip_id }: MatchingPool,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let trip = self
            .database()
            .execute(Select(By::<Option<Trip>, _>::new(trip_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::TripNotExists(trip_id))
            .map_err(tracerr::wrap!())?;
        let offer = self
            .database()
            .execute(Select(By::<Option<Offer>, _>::new(trip.offer_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::OfferNotExists(trip.offer_id))
            .map_err(tracerr::wrap!())?;

        let pilots = self
            .database()
            .execute(Select(By::<Vec<Pilot>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .into_iter()
            .sorted_by_cached_key(|p| {
                (p.last_name.to_string(), p.first_name.to_string(), p.id)
            })
            .collect();
        let trips = self
            .database()
            .execute(Select(By::<Vec<Trip>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(Pool {
            trip,
            requirements: Requirements::from(&offer.country),
            pilots,
            trips,
        })
    }
}

/// [`Query`] for the [`Pilot`]s best suited to guide a [`Trip`].
#[derive(Clone, Copy, Debug)]
pub struct RecommendedPilots {
    /// ID of the [`Trip`] to be guided.
    pub trip_id: trip::Id,

    /// Maximum number of [`Recommendation`]s.
    ///
    /// [`config::Pilots::recommendations`] if [`None`].
    ///
    /// [`config::Pilots::recommendations`]: crate::config::Pilots
    pub limit: Option<usize>,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Query<RecommendedPilots> for Service<Db>
where
    Self: Query<MatchingPool, Ok = Pool, Err = Traced<ExecutionError>>,
{
    type Ok = Vec<Recommendation>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RecommendedPilots {
            trip_id,
            limit,
            today,
        }: RecommendedPilots,
    ) -> Result<Self::Ok, Self::Err> {
        let pool = self
            .execute(MatchingPool::from(trip_id))
            .await
            .map_err(tracerr::wrap!())?;

        let limit = limit.unwrap_or(self.config().pilots.recommendations);
        Ok(matching::recommend(
            &pool.pilots,
            &pool.trip,
            &pool.trips,
            &pool.requirements,
            limit,
            today.year(),
        )
        .into_iter()
        .map(Recommendation::from)
        .collect())
    }
}

/// [`Query`] for the single [`Pilot`] best suited to guide a [`Trip`].
#[derive(Clone, Copy, Debug)]
pub struct BestPilot {
    /// ID of the [`Trip`] to be guided.
    pub trip_id: trip::Id,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Query<BestPilot> for Service<Db>
where
    Self: Query<MatchingPool, Ok = Pool, Err = Traced<ExecutionError>>,
{
    type Ok = Option<Recommendation>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        BestPilot { trip_id, today }: BestPilot,
    ) -> Result<Self::Ok, Self::Err> {
        let pool = self
            .execute(MatchingPool::from(trip_id))
            .await
            .map_err(tracerr::wrap!())?;

        Ok(matching::best(
            &pool.pilots,
            &pool.trip,
            &pool.trips,
            &pool.requirements,
            today.year(),
        )
        .map(Recommendation::from))
    }
}

/// Error of [`MatchingPool`], [`RecommendedPilots`] and [`BestPilot`]
/// [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Offer`] realized by the [`Trip`] doesn't exist.
    #[display("`Offer(id: {_0})` does not exist")]
    #[from(ignore)]
    OfferNotExists(#[error(not(source))] offer::Id),

    /// [`Trip`] doesn't exist.
    #[display("`Trip(id: {_0})` does not exist")]
    #[from(ignore)]
    TripNotExists(#[error(not(source))] trip::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::service,
        domain::{
            offer::spec::{offer, today},
            pilot::spec::{completed_trips, pilot},
            trip, Specialization, Trip,
        },
        infra::Database as _,
    };

    use super::{
        BestPilot, ExecutionError, ExpiringLicenses, Query as _,
        RecommendedPilots,
    };

    #[tokio::test]
    async fn lists_soon_expiring_licenses() {
        let svc = service();
        let mut later = pilot("Nowak", &[]);
        later.license_expires_on =
            today().checked_add_days(20).unwrap().coerce();
        let mut sooner = pilot("Lis", &[]);
        sooner.license_expires_on =
            today().checked_add_days(3).unwrap().coerce();
        let valid = pilot("Wolski", &[]);
        let mut expired = pilot("Kruk", &[]);
        expired.license_expires_on =
            today().checked_sub_days(1).unwrap().coerce();
        for p in [&later, &sooner, &valid, &expired] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }

        let expiring = svc.execute(ExpiringLicenses::from(today())).await;
        let ids = expiring.unwrap().iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids, [sooner.id, later.id]);
    }

    #[tokio::test]
    async fn recommends_by_score() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let t = Trip::new(o.id, o.period().unwrap());
        let plain = pilot("Adamski", &["Croatian"]);
        let mut specialist = pilot("Zielinski", &["Croatian"]);
        _ = specialist
            .add_specialization(Specialization::new("Balkans").unwrap());
        let mute = pilot("Bak", &[]);
        svc.database().execute(Insert(o)).await.unwrap();
        svc.database().execute(Insert(t.clone())).await.unwrap();
        for p in [&plain, &specialist, &mute] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }
        for past in completed_trips(&plain, 10, -50) {
            svc.database().execute(Insert(past)).await.unwrap();
        }

        let recommended = svc
            .execute(RecommendedPilots {
                trip_id: t.id,
                limit: None,
                today: today(),
            })
            .await
            .unwrap();
        let ranking = recommended
            .iter()
            .map(|r| (r.pilot.id, r.score))
            .collect::<Vec<_>>();
        assert_eq!(ranking, [(specialist.id, 25), (plain.id, 20)]);
    }

    #[tokio::test]
    async fn picks_best_pilot() {
        let svc = service();
        let o = offer(10, "1000", 30);
        let t = Trip::new(o.id, o.period().unwrap());
        let (first, second) =
            (pilot("Adamski", &["Croatian"]), pilot("Bialy", &["Croatian"]));
        svc.database().execute(Insert(o)).await.unwrap();
        svc.database().execute(Insert(t.clone())).await.unwrap();
        svc.database().execute(Insert(second)).await.unwrap();
        svc.database().execute(Insert(first.clone())).await.unwrap();

        let best = svc
            .execute(BestPilot {
                trip_id: t.id,
                today: today(),
            })
            .await
            .unwrap();
        assert_eq!(best.map(|r| r.pilot.id), Some(first.id));

        let err = svc
            .execute(BestPilot {
                trip_id: trip::Id::new(),
                today: today(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::TripNotExists(_)));
    }
}
