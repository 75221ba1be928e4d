//! [`Query`] collection related to the multiple [`Offer`]s.

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{database, Database},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries all the [`Offer`]s.
pub type All = DatabaseQuery<By<Vec<Offer>, ()>>;

/// Queries [`Offer`]s in the provided [`offer::Status`].
///
/// Use [`offer::Status::Active`] to list the [`Offer`]s on sale.
pub type WithStatus = DatabaseQuery<By<Vec<Offer>, offer::Status>>;

/// [`Query`] for [`Offer`]s bookable on the provided day and satisfying the
/// provided [`offer::Criteria`].
///
/// Departed [`Offer`]s are never found, even before being deactivated.
#[derive(Clone, Debug)]
pub struct Search {
    /// [`offer::Criteria`] to satisfy.
    pub criteria: offer::Criteria,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Query<Search> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Offer>, offer::Status>>,
        Ok = Vec<Offer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Search { criteria, today }: Search,
    ) -> Result<Self::Ok, Self::Err> {
        let mut offers = self
            .database()
            .execute(Select(By::<Vec<Offer>, _>::new(offer::Status::Active)))
            .await
            .map_err(tracerr::wrap!())?;
        offers.retain(|o| o.matches(&criteria, today));
        Ok(offers)
    }
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::{operations::Insert, Date};

    use crate::{
        command::spec::service,
        domain::{
            offer::{
                self,
                spec::{offer, today},
            },
            Country,
        },
        infra::Database as _,
    };

    use super::{Query as _, Search};

    #[tokio::test]
    async fn finds_bookable_offers_only() {
        let svc = service();
        let croatia = offer(5, "1000", 30);
        let mut sold_out = offer(2, "1000", 30);
        sold_out.remaining_seats = 0;
        let mut withdrawn = offer(2, "1000", 30);
        withdrawn.status = offer::Status::Inactive;
        for o in [&croatia, &sold_out, &withdrawn] {
            svc.database().execute(Insert(o.clone())).await.unwrap();
        }

        let found = svc
            .execute(Search {
                criteria: offer::Criteria {
                    country: Country::new("CROATIA"),
                    ..offer::Criteria::default()
                },
                today: today(),
            })
            .await
            .unwrap();
        let ids = found.iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids, [croatia.id]);
    }

    #[tokio::test]
    async fn skips_departed_offers_not_deactivated_yet() {
        let svc = service();
        let tomorrow = offer(10, "1000", 1);
        svc.database().execute(Insert(tomorrow.clone())).await.unwrap();

        let search = |today| Search {
            criteria: offer::Criteria::default(),
            today,
        };
        let found = svc.execute(search(today())).await.unwrap();
        assert_eq!(found.len(), 1);

        let later = Date::from_calendar_date(2026, 10, 19).unwrap();
        let found = svc.execute(search(later)).await.unwrap();
        assert!(found.is_empty());
    }
}
