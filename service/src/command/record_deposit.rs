//! [`Command`] for recording a deposit of a [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        contract::{self, payment},
        Contract,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for recording a deposit paid for a [`Contract`].
#[derive(Clone, Debug)]
pub struct RecordDeposit {
    /// [`contract::Number`] of the [`Contract`] the deposit is paid for.
    pub number: contract::Number,

    /// Paid amount.
    pub amount: Money,

    /// [`payment::Method`] the deposit is paid with.
    pub method: payment::Method,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RecordDeposit> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: for<'n> Database<
            Select<By<Option<Contract>, &'n contract::Number>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Update<Contract>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RecordDeposit,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordDeposit {
            number,
            amount,
            method,
            today,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or_else(|| E::ContractNotExists(number.clone()))
            .map_err(tracerr::wrap!())?;

        contract
            .record_deposit(amount, method, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "deposit of {amount} recorded for `Contract(number: {number})`, \
             now {}",
            contract.status,
        );
        Ok(contract)
    }
}

/// Error of [`RecordDeposit`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] refused the deposit.
    #[display("Deposit refused: {_0}")]
    #[from]
    Contract(contract::Error),

    /// [`Contract`] with the provided [`contract::Number`] does not exist.
    #[display("`Contract(number: {_0})` does not exist")]
    ContractNotExists(#[error(not(source))] contract::Number),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}
