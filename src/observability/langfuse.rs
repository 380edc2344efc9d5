use opentelemetry::{global, trace::TracerProvider as _, KeyValue};
use opentelemetry_langfuse::ExporterBuilder;
use opentelemetry_sdk::trace::span_processor_with_async_runtime::BatchSpanProcessor;
use opentelemetry_sdk::{resource::Resource, runtime, trace::SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use tracing::{Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Filter, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

use super::logging::{console_filter, console_layer};

type InitError = Box<dyn std::error::Error + Send + Sync>;

const SERVICE: &str = "topic-expander";

/// Langfuse project keys and host. Without both keys spans are sent
/// unauthenticated.
#[derive(Debug, Clone, Default)]
pub struct LangfuseOptions<'a> {
    pub public_key: Option<&'a str>,
    pub secret_key: Option<&'a str>,
    pub host: Option<&'a str>,
}

/// Exports only this crate's spans; HTTP internals stay on the console.
#[derive(Debug, Clone)]
struct CrateSpanFilter;

impl<S: Subscriber> Filter<S> for CrateSpanFilter {
    fn enabled(&self, meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        meta.target().starts_with("topic_expander")
    }
}

/// Installs console logging plus a Langfuse exporter.
///
/// Keep the returned provider alive and call `shutdown` on it before exit so
/// buffered spans are flushed.
pub fn init(options: LangfuseOptions) -> Result<SdkTracerProvider, InitError> {
    let provider = tracer_provider(&options)?;
    global::set_tracer_provider(provider.clone());

    let otel_layer = tracing_opentelemetry::layer()
        .with_tracer(provider.tracer(SERVICE))
        .with_filter(CrateSpanFilter);

    Registry::default()
        .with(console_layer().with_filter(console_filter()))
        .with(otel_layer)
        .try_init()?;

    Ok(provider)
}

fn tracer_provider(options: &LangfuseOptions) -> Result<SdkTracerProvider, InitError> {
    let mut exporter = ExporterBuilder::default();
    if let (Some(pk), Some(sk)) = (options.public_key, options.secret_key) {
        exporter = exporter.with_basic_auth(pk, sk);
    }
    if let Some(host) = options.host {
        exporter = exporter.with_host(host);
    }

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new(SERVICE_NAME, SERVICE),
            KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
        ])
        .build();

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_span_processor(BatchSpanProcessor::builder(exporter.build()?, runtime::Tokio).build())
        .build())
}
