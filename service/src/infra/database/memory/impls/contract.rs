//! [`Contract`]-related [`Database`] implementations.

use std::ops::RangeInclusive;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{client, contract, offer, Contract},
    infra::{
        database::{
            self,
            memory::{Connection, Error, Memory, Record, Tables},
        },
        Database,
    },
};

impl Record for Contract {
    const NAME: &'static str = "Contract";

    type Key = contract::Number;

    fn key(&self) -> &Self::Key {
        &self.number
    }

    fn table(tables: &Tables) -> &Vec<Self> {
        &tables.contracts
    }

    fn table_mut(tables: &mut Tables) -> &mut Vec<Self> {
        &mut tables.contracts
    }
}

impl<'n, C> Database<Select<By<Option<Contract>, &'n contract::Number>>>
    for Memory<C>
where
    C: Connection,
{
    type Ok = Option<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Contract>, &'n contract::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.find::<Contract>(by.into_inner())
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Contract>, client::Id>>>
    for Memory<C>
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, client::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let client_id = by.into_inner();
        self.filter(|c: &Contract| c.client_id == client_id)
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Contract>, offer::Id>>>
    for Memory<C>
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, offer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let offer_id = by.into_inner();
        self.filter(|c: &Contract| c.offer_id == offer_id)
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<Vec<Contract>, contract::Status>>>
    for Memory<C>
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Contract>, contract::Status>>,
    ) -> Result<Self::Ok, Self::Err> {
        let status = by.into_inner();
        self.filter(|c: &Contract| c.status == status)
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<
        Select<By<Vec<Contract>, RangeInclusive<contract::ConclusionDate>>>,
    > for Memory<C>
where
    C: Connection,
{
    type Ok = Vec<Contract>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<Contract>, RangeInclusive<contract::ConclusionDate>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let range = by.into_inner();
        self.filter(|c: &Contract| range.contains(&c.concluded_on))
            .map_err(tracerr::wrap!())
    }
}

impl<C: Connection> Database<Select<By<contract::Sequence, contract::Year>>>
    for Memory<C>
{
    type Ok = contract::Sequence;
    type Err = Traced<database::Error>;

    /// Selects the [`contract::Sequence`] following the last one used in the
    /// provided [`contract::Year`].
    async fn execute(
        &self,
        Select(by): Select<By<contract::Sequence, contract::Year>>,
    ) -> Result<Self::Ok, Self::Err> {
        let year = by.into_inner();
        let last = self
            .read(|tables| {
                Contract::table(tables)
                    .iter()
                    .filter(|c| c.number.year() == year)
                    .map(|c| c.number.sequence())
                    .max()
            })
            .map_err(tracerr::wrap!())?;

        match last {
            None => Ok(contract::Sequence::FIRST),
            Some(last) => last
                .next()
                .ok_or_else(|| {
                    tracerr::new!(Error::Exhausted(format!(
                        "`Contract` numbers of {year}",
                    )))
                })
                .map_err(tracerr::map_from),
        }
    }
}
