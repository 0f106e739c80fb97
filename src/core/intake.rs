use crate::core::rate_limit::{RateDecision, RateLimiter};
use crate::core::{LeadStore, Notifier};
use crate::domain::model::{mask_ip, Lead, LeadSubmission};
use crate::utils::error::{LeadError, Result};
use std::sync::Arc;

/// What happened to one submission. The rate decision is always present so the
/// HTTP layer can emit the limit headers on every response.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub rate: RateDecision,
    pub result: Result<Lead>,
}

/// Runs a submission through rate check, validation, honeypot check, storage
/// and notification dispatch, in that order.
pub struct LeadIntake<S: LeadStore> {
    store: S,
    notifier: Arc<dyn Notifier>,
    limiter: RateLimiter,
}

impl<S: LeadStore> LeadIntake<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>, limiter: RateLimiter) -> Self {
        Self {
            store,
            notifier,
            limiter,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// `rate_key` identifies the connection for limiting and must not come
    /// from request headers; `client_ip` is the address recorded with the lead.
    pub async fn submit(&self, rate_key: &str, client_ip: &str, body: &[u8]) -> IntakeOutcome {
        let rate = self.limiter.check(rate_key);
        let result = self.process(&rate, client_ip, body).await;
        IntakeOutcome { rate, result }
    }

    async fn process(&self, rate: &RateDecision, client_ip: &str, body: &[u8]) -> Result<Lead> {
        ensure_within_limit(rate).inspect_err(|_| {
            tracing::warn!("⏳ Rate limit hit for client {}", mask_ip(client_ip));
        })?;

        let submission = parse_submission(body).inspect_err(|e| {
            tracing::debug!("Rejected submission: {}", e);
        })?;

        reject_honeypot(&submission).inspect_err(|_| {
            tracing::warn!("🍯 Honeypot filled, dropping submission from {}", mask_ip(client_ip));
        })?;

        let lead = self
            .store
            .append(submission, client_ip)
            .await
            .inspect_err(|e| {
                tracing::error!("❌ Failed to store lead: {} ({})", e, e.recovery_suggestion());
            })?;

        tracing::info!("📥 Lead {} stored (ip {})", lead.id, lead.masked_ip);
        self.dispatch_notification(&lead);
        Ok(lead)
    }

    /// 寄信在背景執行，失敗只記錄不回傳
    fn dispatch_notification(&self, lead: &Lead) {
        let notifier = Arc::clone(&self.notifier);
        let email = lead.submission.email.clone();
        let name = lead.submission.name.clone();
        let lead_id = lead.id;

        tokio::spawn(async move {
            match notifier.notify(&email, &name).await {
                Ok(()) => tracing::info!(
                    "✉️ Confirmation for lead {} handled by {} notifier",
                    lead_id,
                    notifier.kind()
                ),
                Err(e) => tracing::error!(
                    "✉️ Failed to send confirmation email for lead {}: {}",
                    lead_id,
                    e
                ),
            }
        });
    }
}

pub fn ensure_within_limit(rate: &RateDecision) -> Result<()> {
    if rate.allowed {
        Ok(())
    } else {
        Err(LeadError::RateLimited {
            retry_after_secs: rate.reset_secs(),
        })
    }
}

pub fn parse_submission(body: &[u8]) -> Result<LeadSubmission> {
    LeadSubmission::from_json_slice(body).map_err(|details| LeadError::ValidationError { details })
}

pub fn reject_honeypot(submission: &LeadSubmission) -> Result<()> {
    if submission.is_honeypot_filled() {
        Err(LeadError::SpamRejected)
    } else {
        Ok(())
    }
}
