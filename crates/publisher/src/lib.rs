use configuration::MediaConfig;
use core_types::{Product, PublishResult};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub mod error;
pub mod transport;

// --- Public API ---
pub use error::PublisherError;
pub use transport::{HttpResponse, MediaTransport, ReqwestTransport};

/// The identifier returned by the "create media object" endpoint.
#[derive(Debug, Deserialize)]
struct StageResponse {
    id: String,
}

/// Renders the promotional caption for a product.
///
/// The caption content is part of the published artifact, so its exact form
/// lives here rather than in the presentation layer. Price is always shown
/// with two decimals.
pub fn render_caption(product: &Product) -> String {
    format!(
        "Check out the amazing {}!\n\
         Price: ${:.2}\n\
         Rating: {} stars\n\n\
         Buy now: {}\n\
         Image: {}",
        product.name, product.price, product.rating, product.affiliate_link, product.image_url
    )
}

/// A client for the two-phase media posting protocol.
///
/// Phase 1 stages a media object from the product image and caption; phase 2
/// publishes the staged object. The two calls are not atomic and there is no
/// idempotency key upstream: publishing the same product twice creates two
/// independent remote media objects.
pub struct MediaPublisher {
    transport: Arc<dyn MediaTransport>,
    config: MediaConfig,
}

impl MediaPublisher {
    /// Creates a publisher backed by the live, timeout-hardened transport.
    pub fn new(config: MediaConfig) -> Result<Self, PublisherError> {
        Ok(Self::with_transport(
            config,
            Arc::new(ReqwestTransport::new()?),
        ))
    }

    pub fn with_transport(config: MediaConfig, transport: Arc<dyn MediaTransport>) -> Self {
        Self { transport, config }
    }

    /// Runs the stage-then-publish protocol for one product.
    ///
    /// Never fails hard: network errors and non-success statuses in either
    /// phase are logged and folded into the result, since one failed
    /// promotional post must not take the service down. `staging_id` is
    /// returned whenever phase 1 succeeded, even if phase 2 did not, so the
    /// caller can tell "never staged" from "staged but not published".
    pub async fn publish(&self, product: &Product) -> PublishResult {
        let stage_url = format!(
            "{}/{}/media",
            self.config.graph_base_url, self.config.user_id
        );
        let stage_body = json!({
            "image_url": product.image_url,
            "caption": render_caption(product),
            "access_token": self.config.access_token,
        });

        let response = match self
            .transport
            .post_json(&stage_url, &stage_body, &self.config.access_token)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(error = %e, "media staging request failed");
                return PublishResult::failed();
            }
        };
        if !response.is_success() {
            tracing::warn!(status = response.status, "media staging rejected");
            return PublishResult::failed();
        }
        let staging_id = match serde_json::from_str::<StageResponse>(&response.body) {
            Ok(stage) => stage.id,
            Err(e) => {
                tracing::warn!(error = %e, "staging response carried no media identifier");
                return PublishResult::failed();
            }
        };

        let publish_url = format!(
            "{}/{}/media_publish",
            self.config.graph_base_url, self.config.user_id
        );
        let publish_body = json!({
            "creation_id": staging_id,
            "access_token": self.config.access_token,
        });

        let succeeded = match self
            .transport
            .post_json(&publish_url, &publish_body, &self.config.access_token)
            .await
        {
            Ok(response) => {
                if !response.is_success() {
                    tracing::warn!(
                        status = response.status,
                        staging_id = %staging_id,
                        "staged media object was not published"
                    );
                }
                response.is_success()
            }
            Err(e) => {
                tracing::error!(error = %e, staging_id = %staging_id, "media publish request failed");
                false
            }
        };

        PublishResult {
            succeeded,
            staging_id: Some(staging_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a scripted sequence of responses and records each request.
    struct ScriptedTransport {
        responses: Mutex<Vec<Result<HttpResponse, PublisherError>>>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<Result<HttpResponse, PublisherError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MediaTransport for ScriptedTransport {
        async fn post_json(
            &self,
            url: &str,
            _body: &serde_json::Value,
            _bearer_token: &str,
        ) -> Result<HttpResponse, PublisherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn ok(status: u16, body: &str) -> Result<HttpResponse, PublisherError> {
        Ok(HttpResponse {
            status,
            body: body.to_string(),
        })
    }

    fn test_config() -> MediaConfig {
        MediaConfig {
            graph_base_url: "https://graph.example.com/v12.0".to_string(),
            user_id: "777".to_string(),
            access_token: "token".to_string(),
        }
    }

    fn test_product() -> Product {
        Product {
            name: "Quiet Mouse".to_string(),
            affiliate_link: "https://example.com/quiet".to_string(),
            image_url: "https://example.com/quiet.jpg".to_string(),
            rating: 4.5,
            price: 29.9,
        }
    }

    #[test]
    fn caption_formats_price_to_two_decimals() {
        let caption = render_caption(&test_product());

        assert!(caption.contains("Quiet Mouse"));
        assert!(caption.contains("Price: $29.90"));
        assert!(caption.contains("Rating: 4.5 stars"));
        assert!(caption.contains("Buy now: https://example.com/quiet"));
        assert!(caption.contains("Image: https://example.com/quiet.jpg"));
    }

    #[tokio::test]
    async fn both_phases_succeed() {
        let transport = ScriptedTransport::new(vec![
            ok(200, r#"{"id":"abc"}"#),
            ok(200, r#"{"id":"post-1"}"#),
        ]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(result.succeeded);
        assert_eq!(result.staging_id.as_deref(), Some("abc"));
        assert_eq!(transport.call_count(), 2);

        let urls = transport.urls.lock().unwrap();
        assert_eq!(urls[0], "https://graph.example.com/v12.0/777/media");
        assert_eq!(urls[1], "https://graph.example.com/v12.0/777/media_publish");
    }

    #[tokio::test]
    async fn missing_staging_id_short_circuits_before_phase_two() {
        let transport = ScriptedTransport::new(vec![ok(200, r#"{"error":"no id"}"#)]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(!result.succeeded);
        assert!(result.staging_id.is_none());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn non_success_staging_status_short_circuits() {
        let transport = ScriptedTransport::new(vec![ok(400, r#"{"id":"abc"}"#)]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(!result.succeeded);
        assert!(result.staging_id.is_none());
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn staged_but_unpublished_keeps_staging_id() {
        let transport = ScriptedTransport::new(vec![
            ok(200, r#"{"id":"abc"}"#),
            ok(500, "server error"),
        ]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(!result.succeeded);
        assert_eq!(result.staging_id.as_deref(), Some("abc"));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn network_error_during_publish_keeps_staging_id() {
        let failing = reqwest::Client::builder().build().unwrap();
        let err = failing.get("http://").send().await.unwrap_err();
        let transport = ScriptedTransport::new(vec![
            ok(200, r#"{"id":"abc"}"#),
            Err(PublisherError::Request(err)),
        ]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(!result.succeeded);
        assert_eq!(result.staging_id.as_deref(), Some("abc"));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn network_error_during_staging_is_absorbed() {
        let failing = reqwest::Client::builder().build().unwrap();
        // Build a real reqwest error by hitting an invalid URL scheme.
        let err = failing.get("http://").send().await.unwrap_err();
        let transport = ScriptedTransport::new(vec![Err(PublisherError::Request(err))]);
        let publisher = MediaPublisher::with_transport(test_config(), transport.clone());

        let result = publisher.publish(&test_product()).await;

        assert!(!result.succeeded);
        assert!(result.staging_id.is_none());
        assert_eq!(transport.call_count(), 1);
    }
}
