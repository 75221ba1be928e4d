//! [`MonthlySales`] definition.

use std::ops::RangeInclusive;

use common::{
    operations::{By, Select},
    Date, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] to summarize [`Contract`]s concluded within a calendar month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MonthlySales {
    /// Year of the month.
    pub year: i32,

    /// Month (`1..=12`) of the `year`.
    pub month: u8,
}

/// Output of the [`MonthlySales`] [`Query`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Output {
    /// Name of the reporting agency.
    pub agency: String,

    /// Number of [`Contract`]s concluded in the month, cancelled included.
    pub contracts: usize,

    /// Total value of the not cancelled [`Contract`]s.
    pub total: Money,

    /// Average value of a [`Contract`].
    pub average: Money,

    /// Sum of the deposits paid.
    pub deposits: Money,

    /// Value still to be paid after the deposits.
    pub remaining: Money,
}

impl<Db> Query<MonthlySales> for Service<Db>
where
    Db: Database<
        Select<By<Vec<Contract>, RangeInclusive<contract::ConclusionDate>>>,
        Ok = Vec<Contract>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        MonthlySales { year, month }: MonthlySales,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let range = month_range(year, month)
            .ok_or(E::InvalidMonth { year, month })
            .map_err(tracerr::wrap!())?;
        let contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(range)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let total = contracts
            .iter()
            .filter(|c| c.status != contract::Status::Cancelled)
            .map(|c| c.total_price.amount)
            .sum::<Decimal>();
        let deposits = contracts
            .iter()
            .filter(|c| c.deposit_paid_on.is_some())
            .map(|c| c.deposit.amount)
            .sum::<Decimal>();
        let average = if contracts.is_empty() {
            Decimal::ZERO
        } else {
            total / Decimal::from(contracts.len())
        };

        let agency = &self.config().agency;
        let money = Money::zero(agency.currency);
        Ok(Output {
            agency: agency.name.clone(),
            contracts: contracts.len(),
            total: money.with_amount(total),
            average: money.with_amount(average).round(),
            deposits: money.with_amount(deposits),
            remaining: money.with_amount(total - deposits),
        })
    }
}

/// Returns the range of days of the provided calendar month.
fn month_range(
    year: i32,
    month: u8,
) -> Option<RangeInclusive<contract::ConclusionDate>> {
    let first = Date::from_calendar_date(year, month, 1)?;
    let next = if month == 12 {
        Date::from_calendar_date(year.checked_add(1)?, 1, 1)?
    } else {
        Date::from_calendar_date(year, month + 1, 1)?
    };
    let last = next.checked_sub_days(1)?;
    Some(RangeInclusive::new(first.coerce(), last.coerce()))
}

/// Error of [`MonthlySales`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// Provided month doesn't exist.
    #[display("invalid month `{month}` of `{year}`")]
    #[from(ignore)]
    InvalidMonth {
        /// Provided year.
        year: i32,

        /// Provided month.
        month: u8,
    },
}
