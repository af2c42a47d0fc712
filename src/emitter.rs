use crate::event::{EntityType, Event, Operation, Payload};
use log::trace;

/// Sole writer of the event sequence for one synthesis run.
#[derive(Debug)]
pub struct EventEmitter {
    next_id: u64,
    events: Vec<Event>,
    state_emitted: bool,
}

impl Default for EventEmitter {
    fn default() -> Self {
        EventEmitter::new()
    }
}

impl EventEmitter {
    pub fn new() -> Self {
        EventEmitter {
            next_id: 1,
            events: Vec::new(),
            state_emitted: false,
        }
    }

    pub fn emit(&mut self, data: Payload, op: Operation) -> &Event {
        let id = self.next_id.to_string();
        self.next_id += 1;
        trace!("Emitting {} {} {}", id, data.entity_type().as_str(), op.as_str());
        self.events.push(Event { id, op, data });
        &self.events[self.events.len() - 1]
    }

    pub fn create(&mut self, data: Payload) -> &Event {
        self.emit(data, Operation::Create)
    }

    /// The first state event creates the entity, every later one updates it.
    pub fn state(&mut self, data: Payload) -> &Event {
        debug_assert_eq!(data.entity_type(), EntityType::State);
        let op = if self.state_emitted {
            Operation::Update
        } else {
            Operation::Create
        };
        self.state_emitted = true;
        self.emit(data, op)
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }
}
