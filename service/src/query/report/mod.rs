//! [`Query`] collection of reports.
//!
//! [`Query`]: crate::Query

pub mod monthly_sales;
pub mod pilot_workload;
pub mod top_clients;

pub use self::{
    monthly_sales::MonthlySales, pilot_workload::PilotWorkload,
    top_clients::TopClients,
};
