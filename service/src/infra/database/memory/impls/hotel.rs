//! [`Hotel`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{hotel, Hotel},
    infra::{
        database::{
            self,
            memory::{Connection, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Hotel {
    const NAME: &'static str = "Hotel";

    type Key = hotel::Id;

    fn key(&self) -> &Self::Key {
        &self.id
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.hotels
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.hotels
    }
}

impl<C: Connection> Database<Select<By<Option<Hotel>, hotel::Id>>>
    for Memory<C>
{
    type Ok = Option<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Hotel>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Hotel>(by.inner()).map_err(tracerr::wrap!())
    }
}
