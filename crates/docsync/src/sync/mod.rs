//! Two-way synchronization between raw text and the document tree.
//!
//! # Overview
//!
//! [`SyncController`] owns the authoritative pair (text, document) and the
//! [`Format`] the text is written in. Two surfaces edit it:
//!
//! 1. The text surface reports every change through
//!    [`on_text_changed`](SyncController::on_text_changed). Parsing is
//!    deferred by a [`Debouncer`]; the host drives it with
//!    [`tick`](SyncController::tick) (or [`flush`](SyncController::flush)).
//!    A successful parse replaces the document, records the syntax that
//!    parsed, and republishes the text. A failed parse keeps the previous
//!    document and the user's text, and records the error.
//! 2. The form surface calls [`apply`](SyncController::apply) with a
//!    [`Mutation`]. The document is replaced at once and the text is
//!    republished.
//!
//! Every republish arms an [`EchoGuard`] so the text surface reporting the
//! published text back is not taken for a user edit.
//!
//! Everything runs on the caller's thread; nothing blocks.

mod debounce;
mod echo;
mod events;

pub use debounce::Debouncer;
pub use echo::EchoGuard;
pub use events::{ChangeOrigin, SyncEvent};

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::codec::{self, kind_name, Format, ParseError};
use crate::config::SyncConfig;
use crate::mutation::Mutation;
use crate::sample;

/// Which representation changed last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authority {
    Text,
    Tree,
}

/// Where the controller stands with respect to the text surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Text and document agree.
    Idle,
    /// A text edit is waiting for its quiet period before being parsed.
    Pending,
    /// The last parsed text was invalid; the document is the last valid one.
    ParseError,
}

/// What happened to a text-change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextChange {
    /// The notification was the controller's own published text.
    EchoSuppressed,
    /// A parse was scheduled. `coalesced` is true if it replaced one that
    /// had not fired yet.
    Scheduled { coalesced: bool },
}

type Listener = Box<dyn FnMut(&SyncEvent) + Send + Sync>;

pub struct SyncController {
    config: SyncConfig,
    text: String,
    document: Arc<Value>,
    format: Format,
    authority: Authority,
    parse_error: Option<ParseError>,
    echo: EchoGuard,
    pending: Debouncer<String>,
    next_listener_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl std::fmt::Debug for SyncController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncController")
            .field("format", &self.format)
            .field("authority", &self.authority)
            .field("state", &self.state())
            .field("echo", &self.echo)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl SyncController {
    /// Create a controller from initial text.
    ///
    /// The text is kept verbatim; it is only rewritten by later edits.
    pub fn new(text: impl Into<String>, config: SyncConfig) -> Result<Self, ParseError> {
        let text = text.into();
        let (document, format) = parse_document(&text, &config)?;
        debug!(%format, bytes = text.len(), "loaded initial document");
        Ok(Self::from_parts(text, document, format, config))
    }

    /// Create a controller from the built-in sample description.
    pub fn with_sample(config: SyncConfig) -> Result<Self, ParseError> {
        Self::new(sample::PETSTORE_YAML, config)
    }

    fn from_parts(text: String, document: Value, format: Format, config: SyncConfig) -> Self {
        let pending = Debouncer::new(config.debounce());
        Self {
            config,
            text,
            document: Arc::new(document),
            format,
            authority: Authority::Text,
            parse_error: None,
            echo: EchoGuard::default(),
            pending,
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The text the text surface should display.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The current document snapshot. Later edits never change it.
    pub fn document(&self) -> Arc<Value> {
        Arc::clone(&self.document)
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn authority(&self) -> Authority {
        self.authority
    }

    pub fn parse_error(&self) -> Option<&ParseError> {
        self.parse_error.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_pending()
    }

    /// When the pending parse becomes due, for hosts that schedule
    /// [`tick`](Self::tick) instead of polling it.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.deadline()
    }

    pub fn is_echo_armed(&self) -> bool {
        self.echo.is_armed()
    }

    pub fn state(&self) -> SyncState {
        if self.pending.is_pending() {
            SyncState::Pending
        } else if self.parse_error.is_some() {
            SyncState::ParseError
        } else {
            SyncState::Idle
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // ── Listeners ─────────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(&SyncEvent) + Send + Sync + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn unsubscribe(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    fn emit(&mut self, event: SyncEvent) {
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }

    // ── Text surface ──────────────────────────────────────────────────────

    /// Report that the text surface now holds `text`.
    ///
    /// Parsing is deferred until the configured quiet period has passed
    /// without another change; call [`tick`](Self::tick) to fire it.
    pub fn on_text_changed(&mut self, text: impl Into<String>, now: Instant) -> TextChange {
        let text = text.into();
        if self.echo.consume(&text) {
            debug!("ignored echo of published text");
            return TextChange::EchoSuppressed;
        }
        self.text.clone_from(&text);
        self.authority = Authority::Text;
        let coalesced = self.pending.schedule(text, now);
        if coalesced {
            debug!("coalesced text edit into pending parse");
        }
        TextChange::Scheduled { coalesced }
    }

    /// Fire the pending parse if its quiet period has elapsed at `now`.
    ///
    /// Returns `None` when nothing was parsed.
    pub fn tick(&mut self, now: Instant) -> Option<Result<Format, ParseError>> {
        let text = self.pending.poll(now)?;
        Some(self.apply_text(text))
    }

    /// Fire the pending parse immediately.
    pub fn flush(&mut self) -> Option<Result<Format, ParseError>> {
        let text = self.pending.take()?;
        Some(self.apply_text(text))
    }

    /// Replace the text wholesale (file load, paste, sample) and parse it
    /// right away.
    pub fn load_text(&mut self, text: impl Into<String>) -> Result<Format, ParseError> {
        let text = text.into();
        self.pending.cancel();
        self.echo.disarm();
        self.text.clone_from(&text);
        self.authority = Authority::Text;
        self.apply_text(text)
    }

    fn apply_text(&mut self, text: String) -> Result<Format, ParseError> {
        match parse_document(&text, &self.config) {
            Ok((document, format)) => {
                debug!(%format, bytes = text.len(), "parsed text into document");
                self.parse_error = None;
                self.format = format;
                self.replace_document(document, ChangeOrigin::Text);
                Ok(format)
            }
            Err(error) => {
                debug!(%error, "text did not parse; keeping last valid document");
                self.parse_error = Some(error.clone());
                self.emit(SyncEvent::ParseFailed {
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    // ── Tree surface ──────────────────────────────────────────────────────

    /// Apply a structural edit and republish the text.
    ///
    /// A parse still waiting for its quiet period is dropped: the edit was
    /// made against the document the user saw, which is newer than that text.
    pub fn apply(&mut self, mutation: &Mutation) {
        if self.pending.cancel() {
            debug!(op = mutation.name(), "structural edit superseded pending parse");
        }
        let next = mutation.apply(&self.document);
        debug!(
            op = mutation.name(),
            path = %docsync_pointer::format_path(mutation.path()),
            "applied structural edit"
        );
        self.authority = Authority::Tree;
        self.parse_error = None;
        self.replace_document(next, ChangeOrigin::Tree);
    }

    /// Replace the whole document from the tree side.
    pub fn set_document(&mut self, document: Value) {
        self.pending.cancel();
        self.authority = Authority::Tree;
        self.parse_error = None;
        self.replace_document(document, ChangeOrigin::Tree);
    }

    /// Rewrite the text in another syntax.
    ///
    /// A pending text edit is parsed first. While the text does not parse,
    /// the user's text is kept and the parse error returned.
    pub fn set_format(&mut self, format: Format) -> Result<(), ParseError> {
        if let Some(Err(error)) = self.flush() {
            return Err(error);
        }
        if let Some(error) = &self.parse_error {
            return Err(error.clone());
        }
        self.format = format;
        self.publish(ChangeOrigin::Tree);
        Ok(())
    }

    // ── Shared ────────────────────────────────────────────────────────────

    fn replace_document(&mut self, document: Value, origin: ChangeOrigin) {
        self.document = Arc::new(document);
        self.emit(SyncEvent::DocumentReplaced {
            document: Arc::clone(&self.document),
            origin,
        });
        self.publish(origin);
    }

    fn publish(&mut self, origin: ChangeOrigin) {
        let options = self.config.serialize_options();
        match codec::serialize(&self.document, self.format, &options) {
            Ok(text) => {
                self.echo.arm(text.clone());
                self.text.clone_from(&text);
                self.emit(SyncEvent::TextPublished {
                    text,
                    format: self.format,
                    origin,
                });
            }
            Err(error) => {
                warn!(
                    %error,
                    format = %self.format,
                    "failed to serialize document; keeping previous text"
                );
                self.emit(SyncEvent::SerializeFailed {
                    message: error.to_string(),
                });
            }
        }
    }
}

fn parse_document(text: &str, config: &SyncConfig) -> Result<(Value, Format), ParseError> {
    let (document, format) = codec::parse(text)?;
    if config.require_mapping_root && !document.is_object() {
        return Err(ParseError::RootNotMapping {
            found: kind_name(&document),
        });
    }
    Ok((document, format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsync_pointer::Step;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;

    fn compact() -> SyncConfig {
        SyncConfig {
            json_indent: 0,
            ..SyncConfig::default()
        }
    }

    #[test]
    fn initial_text_is_kept_verbatim() {
        let ctl = SyncController::new("{ \"a\" : 1 }", compact()).unwrap();
        assert_eq!(ctl.text(), "{ \"a\" : 1 }");
        assert_eq!(*ctl.document(), json!({"a": 1}));
        assert_eq!(ctl.format(), Format::Json);
        assert_eq!(ctl.state(), SyncState::Idle);
    }

    #[test]
    fn non_mapping_root_rejected() {
        let err = SyncController::new("[1, 2]", compact()).unwrap_err();
        assert_eq!(err, ParseError::RootNotMapping { found: "sequence" });

        let config = SyncConfig {
            require_mapping_root: false,
            ..compact()
        };
        assert!(SyncController::new("[1, 2]", config).is_ok());
    }

    #[test]
    fn text_edit_parses_after_quiet_period() {
        let t0 = Instant::now();
        let mut ctl = SyncController::new("{}", compact()).unwrap();
        assert_eq!(
            ctl.on_text_changed("a: 1\n", t0),
            TextChange::Scheduled { coalesced: false }
        );
        assert_eq!(ctl.state(), SyncState::Pending);
        assert_eq!(ctl.next_deadline(), Some(t0 + Duration::from_millis(300)));
        assert_eq!(ctl.tick(t0 + Duration::from_millis(100)), None);
        assert_eq!(*ctl.document(), json!({}));

        let res = ctl.tick(t0 + Duration::from_millis(300));
        assert_eq!(res, Some(Ok(Format::Yaml)));
        assert_eq!(ctl.next_deadline(), None);
        assert_eq!(*ctl.document(), json!({"a": 1}));
        assert_eq!(ctl.text(), "a: 1\n");
        assert_eq!(ctl.authority(), Authority::Text);
        assert!(ctl.is_echo_armed());
    }

    #[test]
    fn echo_of_parse_republish_is_suppressed_once() {
        let t0 = Instant::now();
        let mut ctl = SyncController::new("{}", compact()).unwrap();
        ctl.on_text_changed("{\"a\": 1}", t0);
        ctl.flush().unwrap().unwrap();
        let published = ctl.text().to_string();
        assert_eq!(published, r#"{"a":1}"#);

        assert_eq!(ctl.on_text_changed(published.clone(), t0), TextChange::EchoSuppressed);
        assert!(!ctl.is_pending());
        assert!(!ctl.is_echo_armed());
        assert_eq!(
            ctl.on_text_changed(published, t0),
            TextChange::Scheduled { coalesced: false }
        );
    }

    #[test]
    fn parse_error_keeps_document_and_user_text() {
        let mut ctl = SyncController::new("{\"a\": 1}", compact()).unwrap();
        ctl.on_text_changed("{\"a\": ", Instant::now());
        let res = ctl.flush().unwrap();
        assert!(res.is_err());
        assert_eq!(*ctl.document(), json!({"a": 1}));
        assert_eq!(ctl.text(), "{\"a\": ");
        assert_eq!(ctl.state(), SyncState::ParseError);
        assert!(!ctl.parse_error().unwrap().to_string().is_empty());
        assert!(!ctl.is_echo_armed());
    }

    #[test]
    fn structural_edit_republishes_in_current_format() {
        let mut ctl = SyncController::new("a:\n  b: 1\n", compact()).unwrap();
        ctl.apply(&Mutation::Update {
            path: vec![Step::key("a"), Step::key("b")],
            value: json!(2),
        });
        assert_eq!(ctl.format(), Format::Yaml);
        assert_eq!(ctl.text(), "a:\n  b: 2\n");
        assert_eq!(ctl.authority(), Authority::Tree);
    }

    #[test]
    fn structural_edit_cancels_pending_parse() {
        let t0 = Instant::now();
        let mut ctl = SyncController::new("{\"a\": 1}", compact()).unwrap();
        ctl.on_text_changed("{\"a\": 5}", t0);
        ctl.apply(&Mutation::Update {
            path: vec![Step::key("b")],
            value: json!(true),
        });
        assert!(!ctl.is_pending());
        assert_eq!(ctl.tick(t0 + Duration::from_secs(1)), None);
        assert_eq!(*ctl.document(), json!({"a": 1, "b": true}));
    }

    #[test]
    fn prior_snapshots_are_untouched() {
        let mut ctl = SyncController::new("{\"a\": 1}", compact()).unwrap();
        let before = ctl.document();
        ctl.apply(&Mutation::Update {
            path: vec![Step::key("a")],
            value: json!(2),
        });
        assert_eq!(*before, json!({"a": 1}));
        assert_eq!(*ctl.document(), json!({"a": 2}));
    }

    #[test]
    fn set_format_converts_text() {
        let mut ctl = SyncController::new("{\"a\": [1]}", compact()).unwrap();
        ctl.set_format(Format::Yaml).unwrap();
        assert_eq!(ctl.text(), "a:\n- 1\n");
        ctl.set_format(Format::Json).unwrap();
        assert_eq!(ctl.text(), r#"{"a":[1]}"#);
    }

    #[test]
    fn set_format_refused_while_text_is_invalid() {
        let mut ctl = SyncController::new("{}", compact()).unwrap();
        ctl.on_text_changed("{", Instant::now());
        assert!(ctl.set_format(Format::Yaml).is_err());
        assert_eq!(ctl.text(), "{");
    }

    #[test]
    fn listeners_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut ctl = SyncController::new("{}", compact()).unwrap();
        let id = ctl.subscribe(move |event| {
            let label = match event {
                SyncEvent::TextPublished { .. } => "text",
                SyncEvent::DocumentReplaced { .. } => "document",
                SyncEvent::ParseFailed { .. } => "parse_failed",
                SyncEvent::SerializeFailed { .. } => "serialize_failed",
            };
            sink.lock().unwrap().push(label);
        });
        ctl.apply(&Mutation::Update {
            path: vec![Step::key("x")],
            value: json!(1),
        });
        ctl.load_text("{").unwrap_err();
        assert!(ctl.unsubscribe(id));
        ctl.load_text("{}").unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["document", "text", "parse_failed"]
        );
    }

    #[test]
    fn sample_loads() {
        let ctl = SyncController::with_sample(SyncConfig::default()).unwrap();
        assert_eq!(ctl.format(), Format::Yaml);
        assert!(ctl.document().get("openapi").is_some());
    }
}
