//! # Integration Test Flows
//!
//! The hub service, dispatcher, and sweeper wired to the real reqwest client
//! and driven against loopback subscribers.
//!
//! ## Flows Tested:
//!
//! 1. **Verification**: echoing subscriber is stored, failing one is denied
//! 2. **Delivery**: signed JSON notification reaches the callback
//! 3. **Expiry**: lease elapses, sweep removes, dispatch stops

#[cfg(test)]
mod tests {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;
    use std::sync::Arc;
    use std::time::Duration;

    use websub_hub::{
        ExpirationSweeper, HubConfig, HubService, InMemoryTopicRegistry, ManualTimeSource,
        NotificationDispatcher, ReqwestSubscriberClient, SubscriptionApi, SubscriptionForm,
        SubscriptionStore,
    };

    use crate::integration::subscriber::{Reply, TestSubscriber};

    const TOPIC: &str = "oil-price";
    const START: u64 = 1_700_000_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Hub {
        service: HubService,
        dispatcher: NotificationDispatcher,
        sweeper: ExpirationSweeper,
        store: Arc<SubscriptionStore>,
        clock: Arc<ManualTimeSource>,
    }

    fn hub() -> Hub {
        let clock = Arc::new(ManualTimeSource::new(START));
        let store = Arc::new(SubscriptionStore::new(clock.clone()));
        let topics = Arc::new(InMemoryTopicRegistry::with_topics([TOPIC]));
        let client = Arc::new(ReqwestSubscriberClient::new(Duration::from_secs(2)).unwrap());
        let config = HubConfig::default();

        Hub {
            service: HubService::new(Arc::clone(&store), topics.clone(), client.clone(), &config),
            dispatcher: NotificationDispatcher::new(Arc::clone(&store), topics, client),
            sweeper: ExpirationSweeper::new(Arc::clone(&store)),
            store,
            clock,
        }
    }

    fn form(callback: &str, mode: &str, secret: &str, lease: Option<u64>) -> SubscriptionForm {
        SubscriptionForm {
            callback: Some(callback.to_string()),
            mode: Some(mode.to_string()),
            topic: Some(TOPIC.to_string()),
            secret: Some(secret.to_string()),
            lease_seconds: lease.map(|l| l.to_string()),
        }
    }

    fn expected_signature(secret: &str, body: &[u8]) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
    }

    // =============================================================================
    // VERIFICATION
    // =============================================================================

    #[tokio::test]
    async fn test_echoing_subscriber_is_stored() {
        let hub = hub();
        let subscriber = TestSubscriber::spawn(Reply::Echo).await;

        hub.service
            .handle_subscription_request(form(&subscriber.callback(), "subscribe", "s", None))
            .unwrap();
        hub.service.drain().await;

        let stored = hub.store.get(TOPIC, &subscriber.callback()).unwrap();
        assert_eq!(stored.secret, "s");
        assert_eq!(stored.expires_at, START + 864_000);

        let gets = subscriber.gets();
        assert_eq!(gets.len(), 1);
        assert_eq!(gets[0]["hub.mode"], "subscribe");
        assert_eq!(gets[0]["hub.topic"], TOPIC);
        let challenge = &gets[0]["hub.challenge"];
        assert_eq!(challenge.len(), 16);
        assert!(challenge.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_failing_subscriber_is_denied() {
        let hub = hub();
        let subscriber = TestSubscriber::spawn(Reply::Status(404)).await;

        hub.service
            .handle_subscription_request(form(&subscriber.callback(), "subscribe", "s", None))
            .unwrap();
        hub.service.drain().await;

        assert!(hub.store.is_empty());

        let gets = subscriber.gets();
        assert_eq!(gets.len(), 2);
        let denial = &gets[1];
        assert_eq!(denial["hub.mode"], "denied");
        assert_eq!(denial["topic"], TOPIC);
        assert!(denial["reason"].starts_with("Verification failed:"));
        assert!(denial["reason"].contains("(Code: 404)"));
    }

    #[tokio::test]
    async fn test_unsubscribe_removes_after_verification() {
        let hub = hub();
        let subscriber = TestSubscriber::spawn(Reply::Echo).await;
        hub.store.add(TOPIC, &subscriber.callback(), "s", 100);

        hub.service
            .handle_subscription_request(form(&subscriber.callback(), "unsubscribe", "", None))
            .unwrap();
        hub.service.drain().await;

        assert!(hub.store.is_empty());
        assert_eq!(subscriber.gets()[0]["hub.mode"], "unsubscribe");
    }

    #[tokio::test]
    async fn test_unreachable_callback_is_not_stored() {
        let hub = hub();

        hub.service
            .handle_subscription_request(form("http://127.0.0.1:1/cb", "subscribe", "s", None))
            .unwrap();
        hub.service.drain().await;

        assert!(hub.store.is_empty());
    }

    // =============================================================================
    // DELIVERY
    // =============================================================================

    #[tokio::test]
    async fn test_notification_is_signed_with_subscriber_secret() {
        let hub = hub();
        let subscriber = TestSubscriber::spawn(Reply::Echo).await;
        hub.store.add(TOPIC, &subscriber.callback(), "k", 100);

        let report = hub.dispatcher.dispatch_topic(TOPIC).await;
        assert_eq!(report.delivered, 1);

        let notifications = subscriber.notifications();
        assert_eq!(notifications.len(), 1);
        let received = &notifications[0];

        assert_eq!(
            received.signature.as_deref(),
            Some(expected_signature("k", &received.body).as_str())
        );
        assert_eq!(received.content_type.as_deref(), Some("application/json"));

        let payload: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({"data": "This is the topic that you're subscribed to: oil-price"})
        );
    }

    #[tokio::test]
    async fn test_one_dead_subscriber_does_not_block_others() {
        let hub = hub();
        let alive = TestSubscriber::spawn(Reply::Echo).await;
        hub.store.add(TOPIC, "http://127.0.0.1:1/cb", "k", 100);
        hub.store.add(TOPIC, &alive.callback(), "k", 100);

        let report = hub.dispatcher.dispatch_topic(TOPIC).await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(alive.notifications().len(), 1);
        assert_eq!(hub.store.len(), 2);
    }

    // =============================================================================
    // EXPIRY
    // =============================================================================

    #[tokio::test]
    async fn test_expired_lease_is_swept_and_no_longer_notified() {
        let hub = hub();
        let subscriber = TestSubscriber::spawn(Reply::Echo).await;

        hub.service
            .handle_subscription_request(form(&subscriber.callback(), "subscribe", "s", Some(100)))
            .unwrap();
        hub.service.drain().await;
        assert_eq!(hub.store.len(), 1);

        hub.clock.advance(100);
        assert_eq!(hub.sweeper.sweep(), 0);

        hub.clock.advance(1);
        assert_eq!(hub.sweeper.sweep(), 1);

        let report = hub.dispatcher.dispatch_topic(TOPIC).await;
        assert_eq!(report.attempted, 0);
        assert!(subscriber.notifications().is_empty());
    }
}
