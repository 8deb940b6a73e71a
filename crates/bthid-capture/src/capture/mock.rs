//! Scripted input source for tests.

use std::collections::VecDeque;

use crate::capture::{CaptureError, InputEvent, InputSource};

/// Plays back a fixed sequence of events, then reports disconnection.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedSource {
    fn next_event(&mut self) -> Result<InputEvent, CaptureError> {
        self.events.pop_front().ok_or(CaptureError::Disconnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_source_plays_back_then_disconnects() {
        let mut source = ScriptedSource::new([
            InputEvent::Key {
                code: 30,
                pressed: true,
            },
            InputEvent::Key {
                code: 30,
                pressed: false,
            },
        ]);

        assert!(matches!(
            source.next_event(),
            Ok(InputEvent::Key { code: 30, pressed: true })
        ));
        assert!(matches!(
            source.next_event(),
            Ok(InputEvent::Key { code: 30, pressed: false })
        ));
        assert!(matches!(
            source.next_event(),
            Err(CaptureError::Disconnected)
        ));
    }
}
