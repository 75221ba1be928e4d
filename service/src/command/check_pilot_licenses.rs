//! [`Command`] for checking the licenses of all [`Pilot`]s.

use common::{
    operations::{By, Commit, Select, Transact, Transacted, Update},
    Date,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot::LicenseValidity, Pilot},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for checking the licenses of all [`Pilot`]s, suspending the
/// ones whose license has expired.
#[derive(Clone, Copy, Debug, From)]
pub struct CheckPilotLicenses {
    /// Current [`Date`].
    pub today: Date,
}

/// [`Pilot`] whose license is not [`LicenseValidity::Valid`] anymore.
#[derive(Clone, Debug)]
pub struct Reminder {
    /// [`Pilot`] after the check.
    pub pilot: Pilot,

    /// [`LicenseValidity`] of the [`Pilot`].
    pub validity: LicenseValidity,
}

impl<Db> Command<CheckPilotLicenses> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Select<By<Vec<Pilot>, ()>>,
            Ok = Vec<Pilot>,
            Err = Traced<database::Error>,
        > + Database<Update<Pilot>, Ok = (), Err = Traced<database::Error>>
        + Database<Commit, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Vec<Reminder>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CheckPilotLicenses,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CheckPilotLicenses { today } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let pilots = tx
            .execute(Select(By::<Vec<Pilot>, _>::new(())))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let mut reminders = vec![];
        for mut pilot in pilots {
            let status = pilot.status;
            let validity = pilot.check_license_validity(today);
            if pilot.status != status {
                tx.execute(Update(pilot.clone()))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?;
            }
            if validity != LicenseValidity::Valid {
                reminders.push(Reminder { pilot, validity });
            }
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("{} license reminder(s) issued", reminders.len());
        Ok(reminders)
    }
}

/// Error of [`CheckPilotLicenses`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::{By, Insert, Select};

    use crate::{
        command::spec::service,
        domain::{
            offer::spec::today,
            pilot::{self, spec::pilot, LicenseValidity},
            Pilot,
        },
        infra::Database as _,
    };

    use super::{CheckPilotLicenses, Command as _};

    #[tokio::test]
    async fn suspends_expired_and_reminds_expiring() {
        let svc = service();
        let valid = pilot("Adamski", &[]);
        let mut expiring = pilot("Borowski", &[]);
        expiring.license_expires_on =
            today().checked_add_days(10).unwrap().coerce();
        let mut expired = pilot("Cichy", &[]);
        expired.license_expires_on =
            today().checked_sub_days(1).unwrap().coerce();
        for p in [&valid, &expiring, &expired] {
            svc.database().execute(Insert(p.clone())).await.unwrap();
        }

        let reminders = svc
            .execute(CheckPilotLicenses::from(today()))
            .await
            .unwrap();

        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].pilot.id, expiring.id);
        assert_eq!(
            reminders[0].validity,
            LicenseValidity::ExpiresSoon { days_left: 10 },
        );
        assert_eq!(reminders[1].pilot.id, expired.id);
        assert_eq!(reminders[1].validity, LicenseValidity::Expired);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Pilot>, _>::new(expired.id)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, pilot::Status::LicenseInactive);
    }
}
