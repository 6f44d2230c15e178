//! In-memory event capture for logging assertions
//!
//! Installs a recording layer as the global subscriber. Tests in one binary
//! share it, so assertions should filter on an op name (or a record id) no
//! other test uses.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use rollcall_core_types::schema::{EVENT_DUPLICATE_MERGED, FIELD_EVENT, FIELD_OP};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

/// One recorded event, every field rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    /// Lifecycle event `event` of operation `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op() == Some(op) && self.event() == Some(event)
    }
}

struct FieldText<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldText<'_> {
    // Integers and bools fall back here through the default impls
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldText(&mut fields));
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields,
        };
        if let Ok(mut sink) = self.sink.lock() {
            sink.push(captured);
        }
    }
}

/// Handle onto the shared capture buffer
#[derive(Clone)]
pub struct TestCapture {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Captured `event`s of operation `op`, oldest first
    pub fn lifecycle(&self, op: &str, event: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.is(op, event))
            .collect()
    }

    pub fn count(&self, op: &str, event: &str) -> usize {
        self.lifecycle(op, event).len()
    }

    /// Duplicate-merge warnings whose `id` field equals `id`
    pub fn duplicate_merges(&self, id: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.level == Level::WARN)
            .filter(|e| e.event() == Some(EVENT_DUPLICATE_MERGED))
            .filter(|e| e.field("id") == Some(id))
            .count()
    }

    /// # Panics
    ///
    /// Panics if no `event` was captured for `op`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let seen = self.events();
        assert!(
            seen.iter().any(|e| e.is(op, event)),
            "no {}/{} among {} captured events",
            op,
            event,
            seen.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            sink.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer on first call and return the shared handle
///
/// ```
/// use rollcall_core::logging_facility::test_capture::init_test_capture;
/// use rollcall_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_replay");
/// capture.assert_event_exists("doc_replay", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let sink = Arc::new(Mutex::new(Vec::new()));
            tracing_subscriber::registry()
                .with(CaptureLayer { sink: sink.clone() })
                .init();
            TestCapture { sink }
        })
        .clone()
}
