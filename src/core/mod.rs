pub mod intake;
pub mod rate_limit;

pub use crate::domain::model::{Lead, LeadSubmission};
pub use crate::domain::ports::{LeadStore, Notifier};
pub use crate::utils::error::Result;
