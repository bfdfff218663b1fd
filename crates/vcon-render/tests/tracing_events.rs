#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! Run with:
//!   cargo test -p vcon-render --features tracing --test tracing_events

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use vcon_core::config::DisplayConfig;
use vcon_render::headless::HeadlessEnvironment;
use vcon_render::surrogate::SurrogateNode;
use vcon_render::{Host, RingSurface, ScrollableSurface};

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: String,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn capture<R>(f: impl FnOnce() -> R) -> (R, EventCapture) {
    let layer = EventCapture::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, layer)
}

fn host() -> Host<HeadlessEnvironment> {
    let mut env = HeadlessEnvironment::new();
    env.add_root("screen");
    Host::new(env)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn construction_logs_at_debug() {
    let (_, events) = capture(|| {
        let mut host = host();
        RingSurface::new(
            SurrogateNode::root("screen"),
            &mut host,
            &DisplayConfig::with_size(6, 6),
        )
        .expect("surface")
    });

    let created = events.with_message("ring surface created");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].level, Level::DEBUG);
    assert_eq!(created[0].fields.get("parent").map(String::as_str), Some("#screen"));
    assert_eq!(created[0].fields.get("width").map(String::as_str), Some("6"));
}

#[test]
fn pan_logs_at_trace() {
    let (_, events) = capture(|| {
        let mut host = host();
        let mut surface = RingSurface::new(
            SurrogateNode::root("screen"),
            &mut host,
            &DisplayConfig::with_size(6, 6),
        )
        .expect("surface");
        surface.pan(&mut host, -3, -3).expect("pan");
    });

    let pans = events.with_message("ring surface pan");
    assert_eq!(pans.len(), 1);
    assert_eq!(pans[0].level, Level::TRACE);
    assert_eq!(pans[0].fields.get("top_left").map(String::as_str), Some("3"));
    assert_eq!(pans[0].fields.get("canvas_x").map(String::as_str), Some("-3"));
    // Construction plus the pan each reposition once.
    assert_eq!(events.with_message("ring surface repositioned").len(), 2);
}

#[test]
fn failed_resolution_logs_a_warning() {
    let (result, events) = capture(|| {
        let mut host = host();
        RingSurface::new(
            SurrogateNode::root("missing"),
            &mut host,
            &DisplayConfig::default(),
        )
    });

    assert!(result.is_err());
    let warnings: Vec<_> = events
        .events()
        .into_iter()
        .filter(|e| e.level == Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].message, "surrogate resolution failed");
    assert_eq!(warnings[0].fields.get("key").map(String::as_str), Some("#missing"));
}

#[test]
fn cache_reset_logs_entry_count() {
    let (_, events) = capture(|| {
        let mut host = host();
        let _surface = RingSurface::new(
            SurrogateNode::root("screen"),
            &mut host,
            &DisplayConfig::with_size(4, 4),
        )
        .expect("surface");
        host.addressing_mut().reset();
    });

    let resets = events.with_message("surrogate cache reset");
    assert_eq!(resets.len(), 1);
    assert_eq!(resets[0].level, Level::DEBUG);
    // Parent, container and four tiles.
    assert_eq!(resets[0].fields.get("entries").map(String::as_str), Some("6"));
}

#[test]
fn second_ring_logs_a_warning() {
    let (result, events) = capture(|| {
        let mut host = host();
        let config = DisplayConfig::with_size(4, 4);
        let _first =
            RingSurface::new(SurrogateNode::root("screen"), &mut host, &config).expect("first");
        RingSurface::new(SurrogateNode::root("screen"), &mut host, &config).map(|_| ())
    });

    assert!(result.is_err());
    let refused = events.with_message("ring surface refused");
    assert_eq!(refused.len(), 1);
    assert_eq!(refused[0].level, Level::WARN);
    assert_eq!(refused[0].fields.get("parent").map(String::as_str), Some("#screen"));
    assert_eq!(events.with_message("ring surface created").len(), 1);
}
