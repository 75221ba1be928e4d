//! [`Database`] implementations.

mod client;
mod contract;
mod hotel;
mod offer;
mod pilot;
mod trip;

use common::operations::{By, Commit, Insert, Select, Transact, Update};
use tracerr::Traced;

use crate::infra::{database, Database};

use super::{Connection, Error, Memory, NonTx, Record, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Tx::begin(&self.0)
            .await
            .map(Memory)
            .map_err(tracerr::wrap!())
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.commit().map_err(tracerr::wrap!())
    }
}

impl<C, T> Database<Insert<T>> for Memory<C>
where
    C: Connection,
    T: Record,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<T>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|tables| {
            let table = T::table_mut(tables);
            if table.iter().any(|r| r.key() == record.key()) {
                return Err(Error::Duplicate(record.describe()));
            }
            table.push(record);
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C, T> Database<Update<T>> for Memory<C>
where
    C: Connection,
    T: Record,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(record): Update<T>,
    ) -> Result<Self::Ok, Self::Err> {
        self.write(|tables| {
            let row = T::table_mut(tables)
                .iter_mut()
                .find(|r| r.key() == record.key())
                .ok_or_else(|| Error::NotFound(record.describe()))?;
            *row = record;
            Ok(())
        })
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C, T> Database<Select<By<Vec<T>, ()>>> for Memory<C>
where
    C: Connection,
    T: Record,
{
    type Ok = Vec<T>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<T>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.filter(|_: &T| true).map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Commit, Insert, Select, Transact, Update};

    use crate::{
        domain::{client::spec::client, Client},
        infra::{
            database::{self, memory},
            Database,
        },
    };

    use super::Memory;

    async fn clients(db: &Memory) -> Vec<Client> {
        db.execute(Select(By::<Vec<Client>, _>::new(())))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn inserts_in_order_and_rejects_duplicates() {
        let db = Memory::new();
        let (first, second) = (client(), client());

        db.execute(Insert(first.clone())).await.unwrap();
        db.execute(Insert(second.clone())).await.unwrap();
        let err = db.execute(Insert(first.clone())).await.unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::Duplicate(_)),
        ));
        let ids = clients(&db).await.iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, [first.id, second.id]);
    }

    #[tokio::test]
    async fn updates_existing_only() {
        let db = Memory::new();
        let mut c = client();

        let err = db.execute(Update(c.clone())).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::NotFound(_)),
        ));

        db.execute(Insert(c.clone())).await.unwrap();
        c.deactivate().unwrap();
        db.execute(Update(c.clone())).await.unwrap();

        assert!(!clients(&db).await[0].is_active());
    }

    #[tokio::test]
    async fn publishes_transaction_on_commit_only() {
        let db = Memory::new();
        let c = client();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(c.clone())).await.unwrap();
        assert_eq!(
            tx.execute(Select(By::<Vec<Client>, _>::new(())))
                .await
                .unwrap()
                .len(),
            1,
        );
        assert!(clients(&db).await.is_empty());

        tx.execute(Commit).await.unwrap();
        assert_eq!(clients(&db).await.len(), 1);

        let err = tx.execute(Commit).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(memory::Error::Finished),
        ));
    }

    #[tokio::test]
    async fn discards_dropped_transaction() {
        let db = Memory::new();

        let tx = db.execute(Transact).await.unwrap();
        tx.execute(Insert(client())).await.unwrap();
        drop(tx);

        assert!(clients(&db).await.is_empty());

        // Writer lock is released by the dropped transaction.
        db.execute(Insert(client())).await.unwrap();
        assert_eq!(clients(&db).await.len(), 1);
    }
}
