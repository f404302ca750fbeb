//! Copy-to-clipboard acknowledgement flags.
//!
//! After a payee handle is copied, that channel's flag stays raised for
//! [`COPY_ACK_DURATION`] to drive a checkmark. Flags are independent per
//! channel. A later copy on the same channel restarts the window: each
//! raise bumps a generation counter, and a reset timer only lowers the flag
//! if no newer raise happened since it was armed.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::channel::TransferChannel;

pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, Default)]
struct Flag {
    raised: bool,
    generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct CopyFlags {
    inner: Arc<Mutex<HashMap<TransferChannel, Flag>>>,
}

impl CopyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_raised(&self, channel: TransferChannel) -> bool {
        let flags = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        flags.get(&channel).is_some_and(|flag| flag.raised)
    }

    /// Raise the flag and schedule its reset on the tokio clock.
    pub fn raise(&self, channel: TransferChannel) {
        let generation = {
            let mut flags = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let flag = flags.entry(channel).or_default();
            flag.raised = true;
            flag.generation += 1;
            flag.generation
        };

        let flags = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(COPY_ACK_DURATION).await;
            flags.lower(channel, generation);
        });
    }

    fn lower(&self, channel: TransferChannel, generation: u64) {
        let mut flags = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(flag) = flags.get_mut(&channel) {
            if flag.generation == generation {
                flag.raised = false;
            }
        }
    }
}
