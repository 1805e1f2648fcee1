use std::fs::OpenOptions;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LogConfig;
use crate::util::dates;
use crate::{fmt, Error};

const DIRECTIVES: [&str; 3] = ["sqlx=warn", "omniboard=debug", "omniboard::database=info"];

pub fn init(config: &LogConfig) -> Result<(), Error> {
    let timer = tracing_subscriber::fmt::time::OffsetTime::local_rfc_3339()
        .map_err(|e| fmt!("local time offset must be available: {e}"))?;

    let env_filter = build_filter(&config.level);

    let stdout_layer = default_layer()
        .with_writer(std::io::stdout)
        .with_timer(timer.clone());

    let text_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)?;
    let text_file_layer = default_layer()
        .pretty()
        .with_writer(Arc::new(text_file))
        .with_timer(timer.clone())
        .with_ansi(false);

    let json_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.json_path)?;
    let json_file_layer = default_layer()
        .json()
        .with_writer(Arc::new(json_file))
        .with_timer(timer)
        .with_ansi(false);

    let seq_layer = config.seq_endpoint.as_ref().map(|endpoint| SeqLayer {
        endpoint: endpoint.clone(),
    });

    Registry::default()
        .with(env_filter)
        .with(stdout_layer)
        .with(text_file_layer)
        .with(json_file_layer)
        .with(seq_layer)
        .try_init()?;

    Ok(())
}

/// `RUST_LOG` wins over the configured level; the fixed per-target
/// directives are layered on top of either.
fn build_filter(level: &str) -> EnvFilter {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    for directive in DIRECTIVES {
        if let Ok(parsed) = directive.parse::<Directive>() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    env_filter
}

fn default_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: Subscriber,
{
    tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
}

struct SeqLayer {
    endpoint: String,
}

struct SeqVisitor {
    fields: serde_json::Map<String, Value>,
}

impl SeqVisitor {
    fn new() -> Self {
        Self {
            fields: serde_json::Map::new(),
        }
    }
}

impl Visit for SeqVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.fields
            .insert(field.name().to_string(), json!(fmt!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), json!(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), json!(value));
    }
}

fn seq_level(level: &tracing::Level) -> &'static str {
    match *level {
        tracing::Level::TRACE => "Verbose",
        tracing::Level::DEBUG => "Debug",
        tracing::Level::INFO => "Information",
        tracing::Level::WARN => "Warning",
        tracing::Level::ERROR => "Error",
    }
}

/// Builds one CLEF event for Seq's raw ingestion endpoint.
fn clef_payload(
    metadata: &tracing::Metadata<'_>,
    mut fields: serde_json::Map<String, Value>,
) -> Value {
    let message_template = fields
        .remove("message")
        .and_then(|v| v.as_str().map(String::from))
        .unwrap_or_else(|| fmt!("{}", metadata.name()));

    let mut payload = json!({
        "@t": dates::clef_timestamp(chrono::Utc::now()),
        "@mt": message_template,
        "@l": seq_level(metadata.level()),
        "SourceContext": metadata.target(),
    });

    if let Some(obj) = payload.as_object_mut() {
        if let Some(file) = metadata.file() {
            obj.insert("SourceFile".to_string(), json!(file));
        }
        if let Some(line) = metadata.line() {
            obj.insert("SourceLine".to_string(), json!(line));
        }
        for (key, value) in fields {
            obj.insert(key, value);
        }
    }

    payload
}

impl<S: Subscriber> Layer<S> for SeqLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = SeqVisitor::new();
        event.record(&mut visitor);

        let payload = clef_payload(event.metadata(), visitor.fields);
        let endpoint = self.endpoint.clone();
        let json_string = payload.to_string();

        std::thread::spawn(move || {
            match ureq::post(&endpoint)
                .set("Content-Type", "application/vnd.serilog.clef")
                .send_string(&json_string)
            {
                Ok(_) => {}
                Err(ureq::Error::Status(code, response)) => {
                    eprintln!(
                        "Seq rejected log event (HTTP {}): {}",
                        code,
                        response.into_string().unwrap_or_default()
                    );
                }
                Err(e) => {
                    eprintln!("Failed to send log to Seq: {}", e);
                }
            }
        });
    }
}
