//! [`Trip`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{hotel, pilot, trip, Trip},
    infra::{
        database::{
            self,
            memory::{Connection, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Trip {
    const NAME: &'static str = "Trip";

    type Key = trip::Id;

    fn key(&self) -> &Self::Key {
        &self.id
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.trips
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.trips
    }
}

impl<C: Connection> Database<Select<By<Option<Trip>, trip::Id>>>
    for Memory<C>
{
    type Ok = Option<Trip>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Trip>, trip::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Trip>(by.inner()).map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Trip>, pilot::Id>>>
    for Memory<C>
{
    type Ok = Vec<Trip>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Trip>, pilot::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let pilot_id = by.into_inner();
        self.filter(|t: &Trip| t.pilot_id == Some(pilot_id))
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Trip>, hotel::Id>>>
    for Memory<C>
{
    type Ok = Vec<Trip>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Trip>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let hotel_id = by.into_inner();
        self.filter(|t: &Trip| t.hotel_id == Some(hotel_id))
            .map_err(tracerr::wrap!())
    }
}
