//! Outbound label channel to the overlay window.
//!
//! Labels are published fire-and-forget. The overlay may drain slower than the
//! engine produces, so only the latest message matters: a `watch` channel
//! keeps exactly one value and every send replaces it.

use tokio::sync::watch;

use super::screen::Point;

/// One piece of text pinned to a screen anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub offset: Option<(i32, i32)>,
}

impl Label {
    pub fn new(text: impl Into<String>, anchor: Point) -> Self {
        Label { text: text.into(), anchor, offset: None }
    }

    pub fn with_offset(mut self, dx: i32, dy: i32) -> Self {
        self.offset = Some((dx, dy));
        self
    }
}

/// A message for the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayMessage {
    #[default]
    Clear,
    Labels(Vec<Label>),
}

/// Latest-wins sender side of the overlay channel.
#[derive(Debug)]
pub struct DisplayChannel {
    tx: watch::Sender<DisplayMessage>,
}

impl DisplayChannel {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DisplayMessage::Clear);
        DisplayChannel { tx }
    }

    /// Returns a receiver that observes the most recent message.
    pub fn subscribe(&self) -> watch::Receiver<DisplayMessage> {
        self.tx.subscribe()
    }

    pub fn labels(&self, labels: Vec<Label>) {
        self.tx.send_replace(DisplayMessage::Labels(labels));
    }

    pub fn clear(&self) {
        self.tx.send_replace(DisplayMessage::Clear);
    }

    /// The message currently held by the channel.
    pub fn latest(&self) -> DisplayMessage {
        self.tx.borrow().clone()
    }
}

impl Default for DisplayChannel {
    fn default() -> Self {
        Self::new()
    }
}
