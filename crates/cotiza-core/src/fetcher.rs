use std::sync::Arc;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::retry::RetryConfig;

/// Resilient GET against the upstream quotation page.
///
/// Each call is independent: attempts, delays and outcome of one fetch share
/// nothing with the next. There is no circuit breaker by design; the
/// retriever decides what an absent response means.
pub struct PageFetcher {
    client: Arc<dyn HttpClient>,
    retry: RetryConfig,
}

impl PageFetcher {
    pub fn new(client: Arc<dyn HttpClient>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// GET `url`, retrying up to the configured attempt budget.
    ///
    /// Only a 200 response counts as success; any other status or transport
    /// failure burns an attempt. Returns `None` once the budget is spent.
    pub async fn fetch(&self, url: &str) -> Option<HttpResponse> {
        let max_attempts = self.retry.max_attempts;

        for attempt in 1..=max_attempts {
            match self.client.execute(HttpRequest::get(url)).await {
                Ok(response) if response.is_success() => return Some(response),
                Ok(response) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        status = response.status,
                        url,
                        "intento fallido: status no exitoso"
                    );
                }
                Err(error) => {
                    tracing::error!(attempt, max_attempts, url, %error, "error en petición GET");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.retry.backoff.delay()).await;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::http_client::HttpError;

    /// Replays a scripted sequence of transport outcomes.
    struct SequenceClient {
        outcomes: Mutex<Vec<Result<HttpResponse, HttpError>>>,
        calls: AtomicUsize,
    }

    impl SequenceClient {
        fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl HttpClient for SequenceClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().expect("outcome script not poisoned");
            let outcome = if outcomes.is_empty() {
                Err(HttpError::new("script exhausted"))
            } else {
                outcomes.remove(0)
            };
            Box::pin(async move { outcome })
        }
    }

    fn status(code: u16) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse {
            status: code,
            body: String::new(),
        })
    }

    #[tokio::test]
    async fn returns_first_successful_response() {
        let client = Arc::new(SequenceClient::new(vec![Ok(HttpResponse::ok("<html>"))]));
        let fetcher = PageFetcher::new(client.clone(), RetryConfig::no_delay(3));

        let response = fetcher.fetch("https://upstream.test/").await;

        assert_eq!(response.expect("must succeed").body, "<html>");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn retries_non_200_status_until_success() {
        let client = Arc::new(SequenceClient::new(vec![
            status(503),
            status(500),
            Ok(HttpResponse::ok("ok at last")),
        ]));
        let fetcher = PageFetcher::new(client.clone(), RetryConfig::no_delay(3));

        let response = fetcher.fetch("https://upstream.test/").await;

        assert!(response.is_some());
        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn gives_up_after_attempt_budget() {
        let client = Arc::new(SequenceClient::new(vec![
            Err(HttpError::new("connection refused")),
            status(502),
            Err(HttpError::new("timeout")),
            Ok(HttpResponse::ok("never reached")),
        ]));
        let fetcher = PageFetcher::new(client.clone(), RetryConfig::no_delay(3));

        let response = fetcher.fetch("https://upstream.test/").await;

        assert!(response.is_none());
        assert_eq!(client.calls(), 3, "exactly max_attempts calls");
    }

    #[tokio::test]
    async fn redirect_status_is_not_success() {
        let client = Arc::new(SequenceClient::new(vec![status(301), status(301)]));
        let fetcher = PageFetcher::new(client.clone(), RetryConfig::no_delay(2));

        assert!(fetcher.fetch("https://upstream.test/").await.is_none());
        assert_eq!(client.calls(), 2);
    }
}
