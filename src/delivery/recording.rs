//! In-memory sink that records every outbound action.
//!
//! Used for dry runs and by front-end tests. Failures can be scripted per
//! call to exercise image fallback and dead sessions.

use async_trait::async_trait;
use parking_lot::Mutex;

use super::sink::{Controls, MessageId, NotificationSink, TransportError};
use crate::cards::ImageRef;

type TextPredicate = Box<dyn Fn(&str) -> bool + Send + Sync>;
type ImagePredicate = Box<dyn Fn(&ImageRef) -> bool + Send + Sync>;

/// One recorded outbound action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkEvent {
    Text {
        id: MessageId,
        text: String,
        controls: Option<Controls>,
    },
    Edit {
        id: MessageId,
        text: String,
    },
    Image {
        id: MessageId,
        image: ImageRef,
        caption: String,
    },
}

impl SinkEvent {
    /// Text or caption carried by the event.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            SinkEvent::Text { text, .. } | SinkEvent::Edit { text, .. } => text,
            SinkEvent::Image { caption, .. } => caption,
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, SinkEvent::Image { .. })
    }
}

/// Sink that keeps every action in memory.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
    next_id: Mutex<i64>,
    fail_text: Option<TextPredicate>,
    fail_image: Option<ImagePredicate>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the session as gone for text sends and edits matching `predicate`.
    pub fn fail_text_when(mut self, predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        self.fail_text = Some(Box::new(predicate));
        self
    }

    /// Report images matching `predicate` as unavailable.
    pub fn fail_image_when(
        mut self,
        predicate: impl Fn(&ImageRef) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.fail_image = Some(Box::new(predicate));
        self
    }

    /// Snapshot of the recorded actions.
    pub fn events(&self) -> Vec<SinkEvent> {
        self.events.lock().clone()
    }

    fn allocate_id(&self) -> MessageId {
        let mut next = self.next_id.lock();
        *next += 1;
        MessageId(*next)
    }

    fn text_fails(&self, text: &str) -> bool {
        self.fail_text.as_ref().is_some_and(|p| p(text))
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn send_text(
        &self,
        text: &str,
        controls: Option<&Controls>,
    ) -> Result<MessageId, TransportError> {
        if self.text_fails(text) {
            return Err(TransportError::SessionGone);
        }
        let id = self.allocate_id();
        self.events.lock().push(SinkEvent::Text {
            id,
            text: text.to_string(),
            controls: controls.cloned(),
        });
        Ok(id)
    }

    async fn edit_text(&self, message: MessageId, text: &str) -> Result<(), TransportError> {
        if self.text_fails(text) {
            return Err(TransportError::SessionGone);
        }
        self.events.lock().push(SinkEvent::Edit {
            id: message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_image(
        &self,
        image: &ImageRef,
        caption: &str,
    ) -> Result<MessageId, TransportError> {
        if self.fail_image.as_ref().is_some_and(|p| p(image)) {
            return Err(TransportError::ImageUnavailable(image.to_string()));
        }
        let id = self.allocate_id();
        self.events.lock().push(SinkEvent::Image {
            id,
            image: image.clone(),
            caption: caption.to_string(),
        });
        Ok(id)
    }
}
