//! [`Command`] for renewing the license of a [`Pilot`].

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot, Pilot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for prolonging the license of a [`Pilot`].
#[derive(Clone, Copy, Debug)]
pub struct RenewPilotLicense {
    /// ID of the [`Pilot`] whose license is renewed.
    pub pilot_id: pilot::Id,

    /// New expiration [`Date`] of the license.
    pub expires_on: pilot::LicenseExpirationDate,

    /// Current [`Date`].
    pub today: Date,
}

impl<Db> Command<RenewPilotLicense> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Option<Pilot>, pilot::Id>>,
            Ok = Option<Pilot>,
            Err = Traced<database::Error>,
        > + Database<Update<Pilot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Pilot;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: RenewPilotLicense,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RenewPilotLicense {
            pilot_id,
            expires_on,
            today,
        } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut pilot = tx
            .execute(Select(By::<Option<Pilot>, _>::new(pilot_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PilotNotExists(pilot_id))
            .map_err(tracerr::wrap!())?;

        pilot
            .renew_license(expires_on, today)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "license of `Pilot(id: {pilot_id})` renewed until {expires_on}",
        );
        Ok(pilot)
    }
}

/// Error of [`RenewPilotLicense`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Pilot`] refused the renewal.
    #[display("Renewal refused: {_0}")]
    #[from]
    Pilot(pilot::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    PilotNotExists(#[error(not(source))] pilot::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::service,
        domain::{
            offer::spec::today,
            pilot::{self, spec::pilot},
        },
        infra::Database as _,
    };

    use super::{Command as _, ExecutionError, RenewPilotLicense};

    #[tokio::test]
    async fn reactivates_suspended_pilot() {
        let svc = service();
        let mut p = pilot("Nowak", &[]);
        p.status = pilot::Status::LicenseInactive;
        svc.database().execute(Insert(p.clone())).await.unwrap();

        let next = today().checked_add_days(730).unwrap().coerce();
        let renewed = svc
            .execute(RenewPilotLicense {
                pilot_id: p.id,
                expires_on: next,
                today: today(),
            })
            .await
            .unwrap();
        assert_eq!(renewed.status, pilot::Status::Active);
        assert_eq!(renewed.license_expires_on, next);
    }

    #[tokio::test]
    async fn refuses_past_expiration() {
        let svc = service();
        let p = pilot("Nowak", &[]);
        svc.database().execute(Insert(p.clone())).await.unwrap();

        let err = svc
            .execute(RenewPilotLicense {
                pilot_id: p.id,
                expires_on: today().checked_sub_days(1).unwrap().coerce(),
                today: today(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Pilot(pilot::Error::LicenseExpired(_)),
        ));
    }
}
