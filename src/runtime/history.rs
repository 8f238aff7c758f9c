use serde_json::{Value, json};

use crate::codec::decode;
use crate::domain::UtcDatetime;
use crate::error::{CodecError, ErrorKind};

/// One durable fact about a workflow run.
///
/// The event log is the workflow's source of truth: replaying it through
/// the same workflow code reconstructs the exact pre-crash state without
/// re-executing any side effect.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Run began with this codec-encoded input payload.
    WorkflowStarted { input: Value },
    /// An activity reached a final successful result (retries are not
    /// recorded; only the settled outcome is).
    ActivityCompleted { name: String, output: Value },
    /// An activity failed terminally: retries exhausted or the error
    /// kind was non-retryable.
    ActivityFailed {
        name: String,
        kind: ErrorKind,
        message: String,
    },
    /// A signal was consumed by a waiting workflow.
    SignalReceived { payload: Value },
    /// A signal wait elapsed without a signal.
    WaitTimedOut,
}

impl EventKind {
    fn label(&self) -> &'static str {
        match self {
            EventKind::WorkflowStarted { .. } => "WorkflowStarted",
            EventKind::ActivityCompleted { .. } => "ActivityCompleted",
            EventKind::ActivityFailed { .. } => "ActivityFailed",
            EventKind::SignalReceived { .. } => "SignalReceived",
            EventKind::WaitTimedOut => "WaitTimedOut",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEvent {
    pub seq: u64,
    /// Wall time at which the runtime recorded the event. Replay feeds
    /// this back as the workflow's logical clock.
    pub timestamp: UtcDatetime,
    pub kind: EventKind,
}

/// Append-only event log for one workflow run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct History {
    events: Vec<HistoryEvent>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, timestamp: UtcDatetime, kind: EventKind) -> &HistoryEvent {
        let seq = self.events.len() as u64;
        self.events.push(HistoryEvent {
            seq,
            timestamp,
            kind,
        });
        self.events.last().expect("just pushed")
    }

    pub fn events(&self) -> &[HistoryEvent] {
        &self.events
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEvent> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The input payload recorded at the start of the run, if any.
    pub fn start_input(&self) -> Option<&Value> {
        match self.events.first().map(|e| &e.kind) {
            Some(EventKind::WorkflowStarted { input }) => Some(input),
            _ => None,
        }
    }

    /// Persistable JSON form of the log.
    pub fn encode(&self) -> Value {
        let events: Vec<Value> = self
            .events
            .iter()
            .map(|event| {
                let mut obj = json!({
                    "seq": event.seq,
                    "timestamp": event.timestamp.to_rfc3339(),
                    "event": event.kind.label(),
                });
                match &event.kind {
                    EventKind::WorkflowStarted { input } => {
                        obj["input"] = input.clone();
                    }
                    EventKind::ActivityCompleted { name, output } => {
                        obj["name"] = json!(name);
                        obj["output"] = output.clone();
                    }
                    EventKind::ActivityFailed {
                        name,
                        kind,
                        message,
                    } => {
                        obj["name"] = json!(name);
                        obj["kind"] = json!(kind.to_string());
                        obj["message"] = json!(message);
                    }
                    EventKind::SignalReceived { payload } => {
                        obj["payload"] = payload.clone();
                    }
                    EventKind::WaitTimedOut => {}
                }
                obj
            })
            .collect();
        Value::Array(events)
    }

    pub fn decode(value: &Value) -> Result<Self, CodecError> {
        let raw = decode::array(value, "History")?;
        let mut history = History::new();
        for entry in raw {
            let seq = entry
                .get("seq")
                .and_then(Value::as_u64)
                .ok_or(CodecError::MissingField {
                    type_name: "HistoryEvent",
                    field: "seq",
                })?;
            let timestamp = decode::datetime(
                entry.get("timestamp").ok_or(CodecError::MissingField {
                    type_name: "HistoryEvent",
                    field: "timestamp",
                })?,
                "HistoryEvent",
            )?;
            let label = decode::string(
                entry.get("event").ok_or(CodecError::MissingField {
                    type_name: "HistoryEvent",
                    field: "event",
                })?,
                "HistoryEvent",
            )?;
            let kind = match label {
                "WorkflowStarted" => EventKind::WorkflowStarted {
                    input: field(entry, "input")?.clone(),
                },
                "ActivityCompleted" => EventKind::ActivityCompleted {
                    name: decode::string(field(entry, "name")?, "HistoryEvent")?.to_string(),
                    output: field(entry, "output")?.clone(),
                },
                "ActivityFailed" => EventKind::ActivityFailed {
                    name: decode::string(field(entry, "name")?, "HistoryEvent")?.to_string(),
                    kind: decode::string(field(entry, "kind")?, "HistoryEvent")?
                        .parse::<ErrorKind>()
                        .map_err(|_| CodecError::UnknownEnumValue {
                            type_name: "ErrorKind",
                            value: entry["kind"].to_string(),
                        })?,
                    message: decode::string(field(entry, "message")?, "HistoryEvent")?
                        .to_string(),
                },
                "SignalReceived" => EventKind::SignalReceived {
                    payload: field(entry, "payload")?.clone(),
                },
                "WaitTimedOut" => EventKind::WaitTimedOut,
                other => {
                    return Err(CodecError::InvalidValue {
                        context: "HistoryEvent",
                        message: format!("unknown event label '{other}'"),
                    });
                }
            };
            let event = history.push(timestamp, kind);
            if event.seq != seq {
                return Err(CodecError::InvalidValue {
                    context: "History",
                    message: format!("non-contiguous seq {seq}, expected {}", event.seq),
                });
            }
        }
        Ok(history)
    }
}

fn field<'a>(entry: &'a Value, name: &'static str) -> Result<&'a Value, CodecError> {
    entry.get(name).ok_or(CodecError::MissingField {
        type_name: "HistoryEvent",
        field: name,
    })
}
