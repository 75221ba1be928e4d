//! [`Client`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{client, Client},
    infra::{
        database::{
            self,
            memory::{Connection, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Client {
    const NAME: &'static str = "Client";

    type Key = client::Id;

    fn key(&self) -> &Self::Key {
        &self.id
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.clients
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.clients
    }
}

impl<C: Connection> Database<Select<By<Option<Client>, client::Id>>>
    for Memory<C>
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Client>(by.inner()).map_err(tracerr::wrap!())
    }
}

impl<'n, C> Database<Select<By<Option<Client>, &'n client::NationalId>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Client>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Client>, &'n client::NationalId>>,
    ) -> Result<Self::Ok, Self::Err> {
        let national_id = by.into_inner();
        self.filter(|c: &Client| c.national_id.as_ref() == Some(national_id))
            .map(|found| found.into_iter().next())
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        domain::{
            client::{spec::client, NationalId},
            Client,
        },
        infra::{database::Memory, Database},
    };

    #[tokio::test]
    async fn finds_by_national_id() {
        let db = Memory::new();
        let mut anonymous = client();
        anonymous.national_id = None;
        let known = client();
        db.execute(Insert(anonymous)).await.unwrap();
        db.execute(Insert(known.clone())).await.unwrap();

        let pesel = NationalId::new("44051401359").unwrap();
        let found = db
            .execute(Select(By::<Option<Client>, _>::new(&pesel)))
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(known.id));

        let other = NationalId::new("02070803628").unwrap();
        let found = db
            .execute(Select(By::<Option<Client>, _>::new(&other)))
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
