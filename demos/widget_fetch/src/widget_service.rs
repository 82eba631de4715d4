use futures::future::BoxFuture;
use futures::stream::Once;
use futures::FutureExt;
use request_state::{track_request_cancellable, RequestStream};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub name: String,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("Simulated Failure")]
    SimulatedFailure,
    #[error("widget {0} not found")]
    NotFound(u32),
    #[error("backend task failed: {0}")]
    Backend(String),
}

#[derive(Debug, Clone)]
pub struct WidgetServiceConfig {
    /// Delay before the simulated backend answers.
    pub latency: Duration,
    pub simulate_failure: bool,
}

impl Default for WidgetServiceConfig {
    fn default() -> Self {
        WidgetServiceConfig {
            latency: Duration::from_millis(300),
            simulate_failure: false,
        }
    }
}

type WidgetFetch = BoxFuture<'static, Result<Widget, WidgetError>>;

/// Serves widgets from memory behind a simulated slow backend.
#[derive(Clone)]
pub struct WidgetService {
    latency: Duration,
    simulate_failure: Arc<AtomicBool>,
    widgets: Arc<HashMap<u32, Widget>>,
}

impl WidgetService {
    pub fn new(config: WidgetServiceConfig) -> Self {
        let widgets = HashMap::from([
            (
                1,
                Widget {
                    name: "My First Widget".to_string(),
                },
            ),
            (
                2,
                Widget {
                    name: "My Second Widget".to_string(),
                },
            ),
        ]);
        WidgetService {
            latency: config.latency,
            simulate_failure: Arc::new(AtomicBool::new(config.simulate_failure)),
            widgets: Arc::new(widgets),
        }
    }

    pub fn set_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    /// Tracked request for one widget. Every attempt runs the backend call on
    /// its own task, stopped when the attempt's token is cancelled.
    pub fn fetch(
        &self,
        id: u32,
    ) -> RequestStream<
        impl FnMut(CancellationToken) -> Once<WidgetFetch> + Send + 'static,
        Once<WidgetFetch>,
    > {
        let service = self.clone();
        track_request_cancellable(move |token: CancellationToken| {
            let service = service.clone();
            let backend = tokio::spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!(id, "backend call for widget cancelled");
                        Err(WidgetError::Backend("cancelled".to_string()))
                    }
                    result = service.load(id) => result,
                }
            });
            async move {
                match backend.await {
                    Ok(result) => result,
                    Err(error) => Err(WidgetError::Backend(error.to_string())),
                }
            }
            .boxed()
        })
    }

    async fn load(&self, id: u32) -> Result<Widget, WidgetError> {
        sleep(self.latency).await;
        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(WidgetError::SimulatedFailure);
        }
        self.widgets.get(&id).cloned().ok_or(WidgetError::NotFound(id))
    }
}
