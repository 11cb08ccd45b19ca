//! `reqwest`-backed subscriber client.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::domain::signature::SIGNATURE_HEADER;
use crate::error::TransportError;
use crate::ports::outbound::{CallbackResponse, ChallengeParams, SignedNotification, SubscriberClient};

/// Content type of notification bodies.
pub const NOTIFICATION_CONTENT_TYPE: &str = "application/json";

/// Subscriber client sharing one connection pool, every request bounded by
/// the configured timeout.
#[derive(Debug, Clone)]
pub struct ReqwestSubscriberClient {
    client: Client,
    timeout: Duration,
}

impl ReqwestSubscriberClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(e.to_string())
    } else {
        TransportError::new(e.to_string())
    }
}

#[async_trait]
impl SubscriberClient for ReqwestSubscriberClient {
    async fn send_challenge(
        &self,
        callback: &str,
        params: &ChallengeParams,
    ) -> Result<CallbackResponse, TransportError> {
        let response = self
            .client
            .get(callback)
            .query(&[
                ("hub.mode", params.mode.as_str()),
                ("hub.topic", params.topic.as_str()),
                ("hub.challenge", params.challenge.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(CallbackResponse {
            status,
            body: body.to_vec(),
        })
    }

    async fn send_denial(
        &self,
        callback: &str,
        topic: &str,
        reason: &str,
    ) -> Result<u16, TransportError> {
        let response = self
            .client
            .get(callback)
            .query(&[("hub.mode", "denied"), ("topic", topic), ("reason", reason)])
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status().as_u16())
    }

    async fn deliver(
        &self,
        callback: &str,
        notification: &SignedNotification,
    ) -> Result<u16, TransportError> {
        let response = self
            .client
            .post(callback)
            .header(SIGNATURE_HEADER, notification.signature.as_str())
            .header(CONTENT_TYPE, NOTIFICATION_CONTENT_TYPE)
            .body(notification.body.clone())
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status().as_u16())
    }
}
