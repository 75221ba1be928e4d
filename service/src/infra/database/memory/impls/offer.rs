//! [`Offer`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{offer, Offer},
    infra::{
        database::{
            self,
            memory::{Connection, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Offer {
    const NAME: &'static str = "Offer";

    type Key = offer::Id;

    fn key(&self) -> &Self::Key {
        &self.id
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.offers
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.offers
    }
}

impl<C: Connection> Database<Select<By<Option<Offer>, offer::Id>>>
    for Memory<C>
{
    type Ok = Option<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Offer>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Offer>(by.inner()).map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Offer>, offer::Status>>>
    for Memory<C>
{
    type Ok = Vec<Offer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Offer>, offer::Status>>,
    ) -> Result<Self::Ok, Self::Err> {
        let status = by.into_inner();
        self.filter(|o: &Offer| o.status == status)
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            offer::{self, spec::offer},
            Offer,
        },
        infra::{database::Memory, Database},
    };

    #[tokio::test]
    async fn selects_by_id_and_status() {
        let db = Memory::new();
        let active = offer(5, "1000", 30);
        let mut withdrawn = offer(2, "1000", 30);
        withdrawn.status = offer::Status::Inactive;
        for o in [&active, &withdrawn] {
            db.execute(Insert(o.clone())).await.unwrap();
        }

        let inactive = db
            .execute(Select(By::<Vec<Offer>, _>::new(offer::Status::Inactive)))
            .await
            .unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].id, withdrawn.id);

        let by_id = db
            .execute(Select(By::<Option<Offer>, _>::new(active.id)))
            .await
            .unwrap();
        assert_eq!(by_id.map(|o| o.id), Some(active.id));
    }
}
