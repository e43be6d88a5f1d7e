use tokio::sync::{mpsc, watch};

const PROMPT_QUEUE: usize = 4;

/// Game side of a socket's outbound queue.
///
/// Frames overwrite each other so a slow reader only ever holds the newest
/// one. Prompts are one-off messages and queue in a small bounded channel.
#[derive(Debug)]
pub struct OutboundTx {
    frames: watch::Sender<Option<String>>,
    prompts: mpsc::Sender<String>,
}

#[derive(Debug)]
pub struct OutboundRx {
    frames: watch::Receiver<Option<String>>,
    prompts: mpsc::Receiver<String>,
}

pub fn outbound() -> (OutboundTx, OutboundRx) {
    let (frames_tx, frames_rx) = watch::channel(None);
    let (prompts_tx, prompts_rx) = mpsc::channel(PROMPT_QUEUE);
    (
        OutboundTx {
            frames: frames_tx,
            prompts: prompts_tx,
        },
        OutboundRx {
            frames: frames_rx,
            prompts: prompts_rx,
        },
    )
}

impl OutboundTx {
    /// Replace the pending frame. `false` once the socket side is gone.
    pub fn frame(&self, payload: String) -> bool {
        self.frames.send(Some(payload)).is_ok()
    }

    pub async fn prompt(&self, payload: String) -> bool {
        self.prompts.send(payload).await.is_ok()
    }
}

impl OutboundRx {
    /// Next payload to write. A pending frame goes before queued prompts so
    /// the final frame of a game precedes its game-over prompt.
    pub async fn next(&mut self) -> Option<String> {
        loop {
            if matches!(self.frames.has_changed(), Ok(true)) {
                let latest = self.frames.borrow_and_update().clone();
                if latest.is_some() {
                    return latest;
                }
            }
            if let Ok(payload) = self.prompts.try_recv() {
                return Some(payload);
            }

            tokio::select! {
                changed = self.frames.changed() => {
                    if changed.is_err() {
                        return self.prompts.recv().await;
                    }
                }
                prompt = self.prompts.recv() => return prompt,
            }
        }
    }
}
