//! [`Command`] for adding a [`Specialization`] to a [`Pilot`].

use common::operations::{By, Commit, Select, Transact, Transacted, Update};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{pilot, Pilot, Specialization},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for adding a [`Specialization`] to a [`Pilot`].
#[derive(Clone, Debug)]
pub struct AddPilotSpecialization {
    /// ID of the [`Pilot`] having the [`Specialization`].
    pub pilot_id: pilot::Id,

    /// [`Specialization`] to add.
    pub specialization: Specialization,
}

impl<Db> Command<AddPilotSpecialization> for Service<Db>
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
        cmd: AddPilotSpecialization,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddPilotSpecialization { pilot_id, specialization } = cmd;

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
        if !pilot.add_specialization(specialization) {
            return Ok(pilot);
        }

        tx.execute(Update(pilot.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!("`Pilot(id: {pilot_id})` has a new specialization");
        Ok(pilot)
    }
}

/// Error of [`AddPilotSpecialization`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Pilot`] doesn't exist.
    #[display("`Pilot(id: {_0})` does not exist")]
    #[from(ignore)]
    PilotNotExists(#[error(not(source))] pilot::Id),
}

#[cfg(all(test, feature = "memory"))]
mod spec {
    use common::operations::Insert;

    use crate::{
        command::spec::service,
        domain::{pilot::spec::pilot, Specialization},
        infra::Database as _,
    };

    use super::{AddPilotSpecialization, Command as _};

    #[tokio::test]
    async fn adds_specialization_once() {
        let svc = service();
        let p = pilot("Nowak", &[]);
        svc.database().execute(Insert(p.clone())).await.unwrap();
        let add = |name: &str| AddPilotSpecialization {
            pilot_id: p.id,
            specialization: Specialization::new(name).unwrap(),
        };

        let updated = svc.execute(add("Balkans")).await.unwrap();
        assert_eq!(updated.specializations().len(), 1);

        let same = svc.execute(add("BALKANS")).await.unwrap();
        assert_eq!(same.specializations().len(), 1);
        assert!(same
            .has_specialization(&Specialization::new("balkans").unwrap()));
    }
}
