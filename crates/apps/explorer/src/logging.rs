use runtime::event_bus::Event;
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, filtered by `RUST_LOG`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Forwards library trace events to `tracing`.
pub fn log_events(events: Vec<Event>) {
    for event in events {
        tracing::debug!(
            target: "wordspace::events",
            t = event.time.as_secs(),
            kind = event.kind,
            "{}",
            event.message
        );
    }
}
