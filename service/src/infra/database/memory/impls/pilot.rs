//! [`Pilot`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{pilot, Pilot},
    infra::{
        database::{
            self,
            memory::{Connection, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Pilot {
    const NAME: &'static str = "Pilot";

    type Key = pilot::Id;

    fn key(&self) -> &Self::Key {
        &self.id
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.pilots
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.pilots
    }
}

impl<C: Connection> Database<Select<By<Option<Pilot>, pilot::Id>>>
    for Memory<C>
{
    type Ok = Option<Pilot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Pilot>, pilot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Pilot>(by.inner()).map_err(tracerr::wrap!())
    }
}

impl<'n, C> Database<Select<By<Option<Pilot>, &'n pilot::LicenseNumber>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Pilot>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Pilot>, &'n pilot::LicenseNumber>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();
        self.filter(|p: &Pilot| &p.license_number == number)
            .map(|found| found.into_iter().next())
            .map_err(tracerr::wrap!())
    }
}
