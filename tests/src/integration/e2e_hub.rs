//! End-to-end: a running hub, a real form POST, a real subscriber.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hub_runtime::{HubRuntime, RuntimeConfig};

    use crate::integration::subscriber::{Reply, TestSubscriber};

    fn fast_config() -> RuntimeConfig {
        let mut config = RuntimeConfig {
            host: "127.0.0.1".into(),
            port: 0,
            ..RuntimeConfig::default()
        };
        config.hub.notify_interval_secs = 1;
        config.hub.http_timeout_secs = 2;
        config
    }

    #[tokio::test]
    async fn test_subscribe_over_http_then_receive_notification() {
        let runtime = HubRuntime::new(fast_config()).unwrap();
        let addr = runtime.start().await.unwrap();
        let subscriber = TestSubscriber::spawn(Reply::Echo).await;
        let http = reqwest::Client::new();

        let response = http
            .post(format!("http://{addr}/"))
            .form(&[
                ("hub.callback", subscriber.callback().as_str()),
                ("hub.mode", "subscribe"),
                ("hub.topic", "oil-price"),
                ("hub.secret", "k"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 202);
        let ack: serde_json::Value = response.json().await.unwrap();
        assert_eq!(
            ack["message"],
            "Subscription request received and will be processed."
        );

        runtime.service().drain().await;
        assert_eq!(runtime.store().len(), 1);

        // First dispatch tick fires one interval after start.
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        let notifications = subscriber.notifications();
        assert!(!notifications.is_empty());
        assert!(notifications[0]
            .signature
            .as_deref()
            .is_some_and(|s| s.starts_with("sha256=")));

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_topic_rejected_over_http() {
        let runtime = HubRuntime::new(fast_config()).unwrap();
        let addr = runtime.start().await.unwrap();

        let response = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .form(&[
                ("hub.callback", "http://127.0.0.1:1/cb"),
                ("hub.mode", "subscribe"),
                ("hub.topic", "gas-price"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["kind"], "validation");

        let health: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["topics"], 1);

        runtime.shutdown().await;
        assert!(runtime.store().is_empty());
    }
}
