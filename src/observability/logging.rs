use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::UtcTime},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

pub const DEFAULT_DIRECTIVES: &str = "topic_expander=debug";

/// Console logging: `RUST_LOG` when set, otherwise this crate at DEBUG and
/// everything else at WARN.
pub fn init_default_tracing() {
    // A global subscriber may already be installed (tests, host application).
    let _ = Registry::default()
        .with(console_layer().with_filter(console_filter()))
        .try_init();
}

pub(super) fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .parse_lossy(DEFAULT_DIRECTIVES)
    })
}

pub(super) fn console_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
}
