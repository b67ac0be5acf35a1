//! Speech backend handoff.
//!
//! The driver hands each finished pass to a [`SpeechBackend`] as one
//! atomic batch of [`Utterance`] records and never waits for playback.
//! The bundled [`ChannelSpeech`] implementation forwards batches over a
//! bounded `crossbeam-channel`; a full queue drops the batch rather
//! than blocking the driver, since stale speech is worse than silence.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::warn;

use crate::logging::targets;
use crate::statement::Utterance;

/// Consumer of finished narration batches.
///
/// The backend owns voice selection, audio caching, and playback; the
/// narration core only ever calls [`enqueue`](Self::enqueue).
pub trait SpeechBackend {
    /// Accept one atomic batch of utterances.
    fn enqueue(&self, batch: Vec<Utterance>);
}

/// A speech backend that forwards batches over a channel.
#[derive(Debug, Clone)]
pub struct ChannelSpeech {
    tx: Sender<Vec<Utterance>>,
}

impl ChannelSpeech {
    /// Create a channel-backed speech handoff with the given capacity.
    ///
    /// Returns the backend for the driver and the receiving half for
    /// the playback task.
    pub fn channel(capacity: usize) -> (Self, Receiver<Vec<Utterance>>) {
        let (tx, rx) = bounded(capacity);
        (Self { tx }, rx)
    }
}

impl SpeechBackend for ChannelSpeech {
    fn enqueue(&self, batch: Vec<Utterance>) {
        match self.tx.try_send(batch) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!(target: targets::SPEECH, "speech queue full, dropping batch");
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: targets::SPEECH, "speech backend disconnected, dropping batch");
            }
        }
    }
}

/// A speech backend that records batches in memory, for tests.
#[derive(Debug, Default)]
pub struct CollectingSpeech {
    batches: Mutex<Vec<Vec<Utterance>>>,
}

impl CollectingSpeech {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches enqueued so far, in order.
    pub fn batches(&self) -> Vec<Vec<Utterance>> {
        self.batches.lock().clone()
    }

    /// All utterance texts across every batch, in order.
    pub fn spoken_texts(&self) -> Vec<String> {
        self.batches
            .lock()
            .iter()
            .flatten()
            .map(|u| u.text.clone())
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.batches.lock().clear();
    }
}

impl SpeechBackend for CollectingSpeech {
    fn enqueue(&self, batch: Vec<Utterance>) {
        self.batches.lock().push(batch);
    }
}
