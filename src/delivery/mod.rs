//! Paced, staged delivery of resolved spreads to a chat transport.

pub mod recording;
pub mod sequencer;
pub mod sink;
pub mod split;
pub mod state;

pub use recording::{RecordingSink, SinkEvent};
pub use sequencer::{DeliveryReport, DeliverySequencer};
pub use sink::{Control, Controls, MessageId, NotificationSink, TransportError};
pub use split::{char_len, split_blocks};
pub use state::DeliveryState;
