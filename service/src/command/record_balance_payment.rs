//! [`Command`] for recording a balance payment of a [`Contract`].

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

/// [`Command`] for recording a payment of the remaining balance of a
/// [`Contract`].
#[derive(Clone, Debug)]
pub struct RecordBalancePayment {
    /// [`contract::Number`] of the [`Contract`] the balance is paid for.
    pub number: contract::Number,

    /// Paid amount.
    pub amount: Money,

    /// [`payment::Method`] the balance is paid with.
    pub method: payment::Method,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RecordBalancePayment> for Service<Db>
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
        cmd: RecordBalancePayment,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RecordBalancePayment {
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
            .record_balance_payment(amount, method, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "balance payment of {amount} recorded for \
             `Contract(number: {number})`, {} remaining",
            contract.remaining,
        );
        Ok(contract)
    }
}

/// Error of [`RecordBalancePayment`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] refused the payment.
    #[display("Balance payment refused: {_0}")]
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

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::{method, service},
        domain::{
            contract::{self, spec::contract},
            offer::spec::{offer, pln, today},
        },
        infra::Database as _,
    };

    use super::{Command as _, ExecutionError, RecordBalancePayment};

    #[tokio::test]
    async fn settles_contract_in_parts() {
        let svc = service();
        let mut k = contract(&offer(10, "1000", 30), 2);
        k.record_deposit(pln("600"), method(), today()).unwrap();
        svc.database().execute(Insert(k.clone())).await.unwrap();
        let pay = |amount| RecordBalancePayment {
            number: k.number.clone(),
            amount: pln(amount),
            method: method(),
            today: today(),
        };

        let err = svc.execute(pay("1400.01")).await.unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Contract(contract::Error::Overpayment { .. }),
        ));

        let partly = svc.execute(pay("400")).await.unwrap();
        assert_eq!(partly.status, contract::Status::DepositPaid);
        assert_eq!(partly.remaining, pln("1000"));

        let paid = svc.execute(pay("1000")).await.unwrap();
        assert_eq!(paid.status, contract::Status::Paid);
        assert_eq!(paid.payments.len(), 3);
    }
}
