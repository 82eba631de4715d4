use crate::tracing_setup::tracing_init;
use crate::widget_service::{Widget, WidgetError, WidgetService, WidgetServiceConfig};
use futures::StreamExt;
use futures_signals::signal::SignalExt;
use request_state::{RequestState, RequestStatus, RequestStore, RequestStreamExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

mod tracing_setup;
mod widget_service;

#[tokio::main]
async fn main() {
    tracing_init();

    let service = WidgetService::new(WidgetServiceConfig::default());

    info!("==========================================");
    warn!("example: fetch widget 1");

    service
        .fetch(1)
        .for_each(|state| async move { render(&state) })
        .await;

    sleep(Duration::from_millis(100)).await;

    info!("==========================================");
    warn!("example: simulated failure, retried from the screen");

    service.set_failure(true);
    let store = RequestStore::spawn(service.fetch(2));
    store
        .to_signal()
        .stop_if(|state| state.as_ref().is_some_and(RequestState::is_success))
        .for_each(|state| {
            if let Some(state) = &state {
                render(state);
                if state.has_error() {
                    service.set_failure(false);
                    info!("  Main | failure switched off, retrying");
                    if let Err(e) = state.retry() {
                        error!("  Main | retry rejected: {}", e);
                    }
                }
            }
            async {}
        })
        .await;

    sleep(Duration::from_millis(100)).await;

    info!("==========================================");
    warn!("example: unknown widget");

    service
        .fetch(42)
        .until_settled()
        .for_each(|state| async move { render(&state) })
        .await;

    info!("==========================================");
    info!("  Main | Finish");
}

fn render(state: &RequestState<Widget, WidgetError>) {
    match &state.status {
        RequestStatus::Loading => info!("  Main | attempt {}: loading...", state.attempt),
        RequestStatus::Success { value } => {
            info!("  Main | attempt {}: widget {:?}", state.attempt, value.name)
        }
        RequestStatus::Error { error } => {
            warn!("  Main | attempt {}: {} (retry available)", state.attempt, error)
        }
    }
}
