//! Web Push delivery through the `web-push` crate (VAPID + aes128gcm).

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};
use web_push::{
    ContentEncoding, IsahcWebPushClient, SubscriptionInfo, VapidSignature, VapidSignatureBuilder,
    WebPushClient, WebPushError, WebPushMessage, WebPushMessageBuilder, URL_SAFE_NO_PAD,
};

use crate::config::VapidConfig;
use crate::kernel::{BasePushNotificationService, PushOutcome, PushPayload, PushTarget};

/// Seconds a push service keeps an undelivered message.
const PUSH_TTL_SECONDS: u32 = 24 * 60 * 60;

pub struct WebPushService {
    client: IsahcWebPushClient,
    vapid: VapidConfig,
}

impl WebPushService {
    pub fn new(vapid: VapidConfig) -> Result<Self> {
        let client = IsahcWebPushClient::new().context("Failed to create web push client")?;
        Ok(Self { client, vapid })
    }

    /// VAPID private keys are the raw P-256 scalar, base64url without padding.
    fn sign(&self, subscription: &SubscriptionInfo) -> Result<VapidSignature> {
        let mut signature =
            VapidSignatureBuilder::from_base64(&self.vapid.private_key, URL_SAFE_NO_PAD, subscription)
                .context("Invalid VAPID private key")?;
        signature.add_claim("sub", self.vapid.subject.as_str());
        signature.build().context("Failed to sign VAPID claims")
    }

    fn build_message(&self, target: &PushTarget, payload: &PushPayload) -> Result<WebPushMessage> {
        let subscription = SubscriptionInfo::new(
            target.endpoint.clone(),
            target.p256dh.clone(),
            target.auth.clone(),
        );

        let body = serde_json::to_vec(payload)?;
        let mut message = WebPushMessageBuilder::new(&subscription);
        message.set_ttl(PUSH_TTL_SECONDS);
        message.set_payload(ContentEncoding::Aes128Gcm, &body);
        message.set_vapid_signature(self.sign(&subscription)?);

        message.build().context("Failed to build push message")
    }
}

/// Push services answer 404/410 for subscriptions the browser dropped.
fn is_gone(error: &WebPushError) -> bool {
    matches!(
        error,
        WebPushError::EndpointNotValid | WebPushError::EndpointNotFound
    )
}

#[async_trait]
impl BasePushNotificationService for WebPushService {
    fn public_key(&self) -> Option<String> {
        Some(self.vapid.public_key.clone())
    }

    async fn send(&self, target: &PushTarget, payload: &PushPayload) -> Result<PushOutcome> {
        let message = self.build_message(target, payload)?;

        match self.client.send(message).await {
            Ok(()) => {
                debug!(endpoint = %target.endpoint, "Push delivered");
                Ok(PushOutcome::Delivered)
            }
            Err(e) if is_gone(&e) => {
                info!(endpoint = %target.endpoint, "Push subscription expired");
                Ok(PushOutcome::Gone)
            }
            Err(e) => Err(anyhow::anyhow!("Web push failed: {}", e)),
        }
    }
}

/// Stand-in used when VAPID keys are not configured.
pub struct DisabledPushService;

#[async_trait]
impl BasePushNotificationService for DisabledPushService {
    fn public_key(&self) -> Option<String> {
        None
    }

    async fn send(&self, target: &PushTarget, _payload: &PushPayload) -> Result<PushOutcome> {
        debug!(endpoint = %target.endpoint, "Push disabled, skipping delivery");
        Ok(PushOutcome::Delivered)
    }
}
