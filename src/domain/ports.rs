use crate::domain::model::{Lead, LeadSubmission};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Append-only lead persistence.
pub trait LeadStore: Send + Sync {
    fn append(
        &self,
        submission: LeadSubmission,
        source_ip: &str,
    ) -> impl std::future::Future<Output = Result<Lead>> + Send;
    fn all(&self) -> impl std::future::Future<Output = Result<Vec<Lead>>> + Send;
}

/// Best-effort confirmation sender. Object safe so it can be shared with
/// detached tasks.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, email: &str, name: &str) -> Result<()>;

    fn kind(&self) -> &'static str;
}
