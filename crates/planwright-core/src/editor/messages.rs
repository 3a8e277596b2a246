//! User-facing text: expiring messages plus the per-tick hint, info and
//! status lines.

use crate::geometry::Vertex;
use kurbo::Point;
use std::collections::VecDeque;
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
struct Message {
    text: String,
    posted: Instant,
}

/// Stack of timestamped messages, oldest first.
#[derive(Debug, Clone)]
pub struct MessageStack {
    lifetime: Duration,
    messages: VecDeque<Message>,
}

impl MessageStack {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            lifetime,
            messages: VecDeque::new(),
        }
    }

    pub fn push(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        log::debug!("Message: {}", text);
        self.messages.push_back(Message { text, posted: now });
    }

    /// Drop every message older than the lifetime.
    pub fn expire(&mut self, now: Instant) {
        let lifetime = self.lifetime;
        self.messages
            .retain(|m| now.saturating_duration_since(m.posted) < lifetime);
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.text.clone()).collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.messages.back().map(|m| m.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Lines of text rewritten every tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLines {
    /// How to use the active tool.
    pub hint: String,
    /// Hovered entity, projected length or text being typed.
    pub info: String,
    /// Pointer position and zoom.
    pub status: String,
}

impl TextLines {
    /// Clear the per-tick lines; the status line is always rewritten.
    pub fn reset(&mut self) {
        self.hint.clear();
        self.info.clear();
    }
}

/// Format the status line for a pointer at model position `world`.
pub fn status_line(world: Point, zoom: f64) -> String {
    let at = Vertex::trunc(world);
    let zoom = (zoom * 1e10).round() / 1e10;
    format!("X: {} Y: {} Zoom: {}", at.x, at.y, zoom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_expire() {
        let mut stack = MessageStack::new(Duration::from_secs(5));
        let t = Instant::now();

        stack.push("first", t);
        stack.push("second", t + Duration::from_secs(3));
        stack.expire(t + Duration::from_secs(4));
        assert_eq!(stack.texts(), vec!["first", "second"]);

        stack.expire(t + Duration::from_secs(5));
        assert_eq!(stack.texts(), vec!["second"]);
        assert_eq!(stack.latest(), Some("second"));

        stack.expire(t + Duration::from_secs(9));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_status_line() {
        assert_eq!(status_line(Point::new(12.7, -3.2), 1.0), "X: 12 Y: -3 Zoom: 1");
        assert_eq!(status_line(Point::ZERO, 1.05), "X: 0 Y: 0 Zoom: 1.05");
        assert_eq!(status_line(Point::ZERO, 0.1 + 0.2), "X: 0 Y: 0 Zoom: 0.3");
    }
}
