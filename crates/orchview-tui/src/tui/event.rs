use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Terminal events
#[derive(Clone, Debug)]
pub enum Event {
    /// Periodic tick (expires transient notices)
    Tick,
    /// Key press event
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Error reading the terminal
    Error(String),
}

/// Event handler reading terminal input on a background task
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventHandler {
    /// Start reading terminal events, ticking at `tick_rate`
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        {
            let cancel = cancel.clone();

            tokio::spawn(async move {
                let mut reader = event::EventStream::new();
                let mut tick_interval = tokio::time::interval(tick_rate);

                loop {
                    let tick = tick_interval.tick();
                    let crossterm_event = reader.next().fuse();

                    tokio::select! {
                        _ = cancel.cancelled() => break,

                        _ = tick => {
                            if sender.send(Event::Tick).is_err() {
                                break;
                            }
                        }

                        maybe_event = crossterm_event => {
                            let event = match maybe_event {
                                // Filter out release events (important for Windows)
                                Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                                    Event::Key(key)
                                }
                                Some(Ok(CrosstermEvent::Resize(w, h))) => Event::Resize(w, h),
                                Some(Ok(_)) => continue,
                                Some(Err(e)) => Event::Error(e.to_string()),
                                None => break,
                            };
                            if sender.send(event).is_err() {
                                break;
                            }
                        }
                    }
                }
            });
        }

        Self { receiver, cancel }
    }

    /// Receive the next event
    pub async fn next(&mut self) -> Option<Event> {
        self.receiver.recv().await
    }

    /// Stop the reader task
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
