use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::collaborators::{Credentials, Transport, TransportRequest};
use crate::error::{CoreError, CoreResult};
use crate::model::{RouteSegment, SegmentClass, SegmentOutcome, SegmentStatus};
use crate::providers::classify_transport_error;

use super::profile::{profile_for, ExecutionProfile};
use super::SegmentExecutor;

#[derive(Debug, Deserialize)]
struct CreateResponse {
    txn_id: String,
}

#[derive(Debug, Deserialize)]
struct PollResponse {
    status: String,
    #[serde(default)]
    amount_out: Option<f64>,
}

/// Create→fund→poll against a provider's execution endpoint, retrying
/// transient failures with the class's backoff schedule. One instance
/// per segment class; the provider id to call against comes from the
/// segment itself, since different providers of the same class share the
/// same execution shape.
pub struct RetryingExecutor {
    segment_class: SegmentClass,
    profile: ExecutionProfile,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn Credentials>,
}

impl RetryingExecutor {
    pub fn new(segment_class: SegmentClass, transport: Arc<dyn Transport>, credentials: Arc<dyn Credentials>) -> Self {
        RetryingExecutor { segment_class, profile: profile_for(segment_class), transport, credentials }
    }

    async fn create(&self, segment: &RouteSegment, amount_in: f64, api_key: &str) -> CoreResult<String> {
        let mut attempt = 0usize;
        loop {
            let body = serde_json::to_vec(&serde_json::json!({
                "from": segment.from.to_string(),
                "to": segment.to.to_string(),
                "amount": amount_in,
            }))
            .map_err(|e| CoreError::Internal(e.to_string()))?;

            let request = TransportRequest::post(
                format!("https://{}.example/segments/execute", segment.provider),
                body,
                Duration::from_secs(10),
            )
            .with_header("Authorization", format!("Bearer {api_key}"));

            match self.transport.send(request).await {
                Ok(response) => {
                    let parsed: CreateResponse = serde_json::from_slice(&response.body)
                        .map_err(|e| CoreError::ProviderPermanent { provider: segment.provider.clone(), message: e.to_string() })?;
                    return Ok(parsed.txn_id);
                }
                Err(err) => {
                    let classified = classify_transport_error(&segment.provider, err);
                    let is_transient = matches!(classified, CoreError::ProviderTransient { .. } | CoreError::RateLimited { .. });
                    if is_transient && attempt < self.profile.retry_backoff.len() {
                        tokio::time::sleep(self.profile.retry_backoff[attempt]).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(classified);
                }
            }
        }
    }

    /// Separate "fund" call for the bank-rail family (§4.7): the provider
    /// requires this before a created transfer is actually live. Failure
    /// here is distinguished from a failed `create` so operators can tell
    /// "no transfer created" from "transfer created but not funded".
    async fn fund(&self, segment: &RouteSegment, txn_id: &str, api_key: &str) -> CoreResult<()> {
        let request = TransportRequest::post(
            format!("https://{}.example/segments/{}/fund", segment.provider, txn_id),
            Vec::new(),
            Duration::from_secs(10),
        )
        .with_header("Authorization", format!("Bearer {api_key}"));

        self.transport.send(request).await.map_err(|e| CoreError::FundingFailed {
            segment_index: 0,
            provider: segment.provider.clone(),
            message: classify_transport_error(&segment.provider, e).to_string(),
        })?;
        Ok(())
    }

    async fn poll(&self, segment: &RouteSegment, txn_id: &str, api_key: &str) -> CoreResult<f64> {
        for _ in 0..self.profile.confirmation_polls {
            let request = TransportRequest::get(
                format!("https://{}.example/segments/{}", segment.provider, txn_id),
                Duration::from_secs(10),
            )
            .with_header("Authorization", format!("Bearer {api_key}"));

            let response = self
                .transport
                .send(request)
                .await
                .map_err(|e| classify_transport_error(&segment.provider, e))?;

            let parsed: PollResponse = serde_json::from_slice(&response.body)
                .map_err(|e| CoreError::ProviderPermanent { provider: segment.provider.clone(), message: e.to_string() })?;

            match parsed.status.as_str() {
                "confirmed" => return Ok(parsed.amount_out.unwrap_or(0.0)),
                "failed" => {
                    return Err(CoreError::ProviderPermanent {
                        provider: segment.provider.clone(),
                        message: "provider reported failure during confirmation".into(),
                    })
                }
                _ => tokio::time::sleep(self.profile.poll_interval).await,
            }
        }
        Err(CoreError::ConfirmationTimeout { segment_index: 0, provider: segment.provider.clone() })
    }
}

#[async_trait]
impl SegmentExecutor for RetryingExecutor {
    async fn execute(&self, segment: &RouteSegment, amount_in: f64) -> CoreResult<SegmentOutcome> {
        let api_key = self
            .credentials
            .get(&segment.provider)
            .ok_or_else(|| CoreError::NotConfigured { provider: segment.provider.clone() })?;

        let txn_id = match self.create(segment, amount_in, &api_key).await {
            Ok(id) => id,
            Err(e) => {
                return Ok(SegmentOutcome {
                    provider_txn_id: None,
                    status: SegmentStatus::Failed,
                    amount_in,
                    amount_out: 0.0,
                    fees_paid: 0.0,
                    attempts: 1,
                    error: Some(format!("{}: {e}", e.kind())),
                    confirmed_at: None,
                })
            }
        };

        // Bank-rail family: a created transfer isn't live until funded.
        // A failure here is distinguished (FundingFailed) from both a
        // failed create and a failed/timed-out confirmation.
        if self.profile.requires_funding {
            if let Err(e) = self.fund(segment, &txn_id, &api_key).await {
                return Ok(SegmentOutcome {
                    provider_txn_id: Some(txn_id),
                    status: SegmentStatus::Failed,
                    amount_in,
                    amount_out: 0.0,
                    fees_paid: 0.0,
                    attempts: 1,
                    error: Some(format!("{}: {e}", e.kind())),
                    confirmed_at: None,
                });
            }
        }

        match self.poll(segment, &txn_id, &api_key).await {
            Ok(amount_out) => Ok(SegmentOutcome {
                provider_txn_id: Some(txn_id),
                status: SegmentStatus::Succeeded,
                amount_in,
                amount_out,
                fees_paid: amount_in - amount_out / segment.cost.effective_rate.max(f64::EPSILON),
                attempts: 1,
                error: None,
                confirmed_at: Some(chrono::Utc::now()),
            }),
            Err(e) => Ok(SegmentOutcome {
                provider_txn_id: Some(txn_id),
                status: SegmentStatus::Failed,
                amount_in,
                amount_out: 0.0,
                fees_paid: 0.0,
                attempts: 1,
                error: Some(format!("{}: {e}", e.kind())),
                confirmed_at: None,
            }),
        }
    }

    async fn cancel(&self, segment: &RouteSegment, outcome: &SegmentOutcome) -> CoreResult<SegmentOutcome> {
        if !self.profile.supports_cancel {
            return Err(CoreError::PreconditionFailed(format!(
                "{} segments cannot be cancelled once submitted",
                self.segment_class.as_str()
            )));
        }
        let api_key = self
            .credentials
            .get(&segment.provider)
            .ok_or_else(|| CoreError::NotConfigured { provider: segment.provider.clone() })?;
        let Some(txn_id) = &outcome.provider_txn_id else {
            return Err(CoreError::PreconditionFailed("no in-flight transfer to cancel".into()));
        };

        let request = TransportRequest::post(
            format!("https://{}.example/segments/{}/cancel", segment.provider, txn_id),
            Vec::new(),
            Duration::from_secs(10),
        )
        .with_header("Authorization", format!("Bearer {api_key}"));

        self.transport.send(request).await.map_err(|e| classify_transport_error(&segment.provider, e))?;

        Ok(SegmentOutcome {
            provider_txn_id: outcome.provider_txn_id.clone(),
            status: SegmentStatus::Cancelled,
            amount_in: outcome.amount_in,
            amount_out: 0.0,
            fees_paid: 0.0,
            attempts: outcome.attempts,
            error: None,
            confirmed_at: None,
        })
    }
}
