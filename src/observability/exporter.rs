//! Span exporter writing one JSON object per finished span.
//!
//! Each line carries the trace and span ids, so the session span and the
//! fetch spans it spawned can be stitched back together offline.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::future::BoxFuture;
use opentelemetry::trace::{SpanId, Status, TraceError};
use opentelemetry::Value;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use serde_json::{json, Map, Value as JsonValue};

/// Appends spans as JSON lines to a file opened on first export.
pub(crate) struct JsonLinesExporter {
    path: PathBuf,
    file: Mutex<Option<File>>,
    service: String,
}

impl JsonLinesExporter {
    pub(crate) fn new(path: PathBuf, service: impl Into<String>) -> Self {
        Self {
            path,
            file: Mutex::new(None),
            service: service.into(),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> std::io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| std::io::Error::other("trace file lock poisoned"))?;

        if guard.is_none() {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
            *guard = Some(file);
        }

        let Some(file) = guard.as_mut() else {
            return Ok(());
        };
        for span in batch {
            let line = span_to_json(&self.service, span);
            writeln!(file, "{line}")?;
        }
        file.flush()
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self
            .write_batch(&batch)
            .map_err(|e| TraceError::from(e.to_string()));
        Box::pin(std::future::ready(result))
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("path", &self.path)
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

fn unix_nanos(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_nanos())
}

fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(value.to_string()),
    }
}

fn span_to_json(service: &str, span: &SpanData) -> JsonValue {
    let attributes: Map<String, JsonValue> = span
        .attributes
        .iter()
        .map(|kv| (kv.key.to_string(), attribute_value(&kv.value)))
        .collect();

    let (status, status_message) = match &span.status {
        Status::Unset => ("unset", String::new()),
        Status::Ok => ("ok", String::new()),
        Status::Error { description } => ("error", description.to_string()),
    };

    let parent = if span.parent_span_id == SpanId::INVALID {
        JsonValue::Null
    } else {
        json!(format!("{:016x}", span.parent_span_id))
    };

    json!({
        "service": service,
        "name": span.name,
        "trace_id": format!("{:032x}", span.span_context.trace_id()),
        "span_id": format!("{:016x}", span.span_context.span_id()),
        "parent_span_id": parent,
        "start_unix_nano": unix_nanos(span.start_time).to_string(),
        "end_unix_nano": unix_nanos(span.end_time).to_string(),
        "attributes": attributes,
        "events": span.events.iter().map(|e| e.name.to_string()).collect::<Vec<_>>(),
        "status": status,
        "status_message": status_message,
    })
}

/// Builds a tracer provider exporting every finished span to `path`.
pub(crate) fn create_tracer_provider(path: PathBuf, service: &str) -> TracerProvider {
    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        service.to_string(),
    )]);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(JsonLinesExporter::new(path, service))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Span, Tracer, TracerProvider as _};

    #[test]
    fn finished_spans_are_written_as_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces").join("spans.jsonl");

        let provider = create_tracer_provider(path.clone(), "gifscout-test");
        let tracer = provider.tracer("test");
        let mut span = tracer.start("fetch_page");
        span.set_attribute(opentelemetry::KeyValue::new("offset", 25_i64));
        span.end();

        let contents = std::fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let value: JsonValue = serde_json::from_str(line).unwrap();
        assert_eq!(value["name"], "fetch_page");
        assert_eq!(value["service"], "gifscout-test");
        assert_eq!(value["attributes"]["offset"], 25);
        assert_eq!(value["trace_id"].as_str().unwrap().len(), 32);
        assert!(value["parent_span_id"].is_null());
    }
}
