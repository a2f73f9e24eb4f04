use foundation::time::Time;

/// Structured trace event.
///
/// Library crates record what happened here instead of logging; the host
/// drains the bus into its logger.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub time: Time,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, time: Time, kind: &'static str, message: impl Into<String>) {
        self.events.push(Event {
            time,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
