//! [`Command`] for resolving a [`Cancellation`] of a [`Contract`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::contract::Cancellation;
use crate::{
    domain::{
        contact::Text,
        contract::{self, payment},
        Contract,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for moving a [`Cancellation`] of a [`Contract`] forward.
#[derive(Clone, Debug)]
pub struct ResolveCancellation {
    /// [`contract::Number`] of the cancelled [`Contract`].
    pub number: contract::Number,

    /// [`Resolution`] to apply.
    pub resolution: Resolution,
}

/// Resolution of a [`Cancellation`].
#[derive(Clone, Debug)]
pub enum Resolution {
    /// Approve the registered [`Cancellation`].
    Approve,

    /// Pay the refund of the approved [`Cancellation`].
    Refund {
        /// [`payment::Method`] the refund is paid with.
        method: payment::Method,

        /// Current [`Date`].
        today: Date,
    },

    /// Reject the registered [`Cancellation`].
    Reject {
        /// Reason of the rejection.
        reason: Text,
    },
}

impl<Db> Command<ResolveCancellation> for Service<Db>
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
        cmd: ResolveCancellation,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ResolveCancellation { number, resolution } = cmd;

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

        let cancellation = match resolution {
            Resolution::Approve => contract.approve_cancellation(),
            Resolution::Refund { method, today } => {
                contract.refund_cancellation(method, today)
            }
            Resolution::Reject { reason } => {
                contract.reject_cancellation(reason)
            }
        }
        .map_err(tracerr::from_and_wrap!(=> E))?;
        log::info!(
            "cancellation of `Contract(number: {number})` is {} now",
            cancellation.status,
        );

        tx.execute(Update(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        Ok(contract)
    }
}

/// Error of [`ResolveCancellation`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Contract`] refused the resolution.
    #[display("Resolution refused: {_0}")]
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
