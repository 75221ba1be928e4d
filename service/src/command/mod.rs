//! [`Command`] definition.

pub mod add_hotel;
pub mod add_pilot_language;
pub mod add_pilot_specialization;
pub mod assign_hotel;
pub mod assign_pilot;
pub mod cancel_contract;
pub mod check_pilot_licenses;
pub mod complete_trip;
pub mod create_contract;
pub mod create_offer;
pub mod create_trip;
pub mod deactivate_pilot;
pub mod reactivate_pilot;
pub mod record_balance_payment;
pub mod record_deposit;
pub mod refresh_offers;
pub mod register_client;
pub mod register_pilot;
pub mod renew_pilot_license;
pub mod resolve_cancellation;
pub mod review_hotel;
pub mod set_pilot_availability;
pub mod start_trip;
pub mod unassign_pilot;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    add_hotel::AddHotel, add_pilot_language::AddPilotLanguage,
    add_pilot_specialization::AddPilotSpecialization,
    assign_hotel::AssignHotel, assign_pilot::AssignPilot,
    cancel_contract::CancelContract,
    check_pilot_licenses::CheckPilotLicenses, complete_trip::CompleteTrip,
    create_contract::CreateContract, create_offer::CreateOffer,
    create_trip::CreateTrip, deactivate_pilot::DeactivatePilot,
    reactivate_pilot::ReactivatePilot,
    record_balance_payment::RecordBalancePayment,
    record_deposit::RecordDeposit, refresh_offers::RefreshOffers,
    register_client::RegisterClient, register_pilot::RegisterPilot,
    renew_pilot_license::RenewPilotLicense,
    resolve_cancellation::ResolveCancellation, review_hotel::ReviewHotel,
    set_pilot_availability::SetPilotAvailability, start_trip::StartTrip,
    unassign_pilot::UnassignPilot,
};
