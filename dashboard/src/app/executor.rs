//! Background execution of controller commands
//!
//! Commands run on a small tokio runtime owned by the executor. Each
//! finished command is sent back over a channel and the UI is woken so the
//! completion is applied on the next frame.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::client::CatalogClient;
use crate::controller::{Command, Completion};

use super::AppError;

/// Called after each completion is queued.
pub type Wake = Arc<dyn Fn() + Send + Sync>;

pub struct Executor {
    runtime: tokio::runtime::Runtime,
    client: CatalogClient,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
    wake: Wake,
}

impl Executor {
    pub fn new(client: CatalogClient, wake: Wake) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("nebula-net")
            .enable_all()
            .build()
            .map_err(|e| AppError::Runtime(e.to_string()))?;
        let (sender, receiver) = mpsc::channel();

        Ok(Self {
            runtime,
            client,
            sender,
            receiver,
            wake,
        })
    }

    /// Start every command; none of them blocks the caller.
    pub fn submit(&self, commands: Vec<Command>) {
        for command in commands {
            tracing::debug!(
                "Starting {} (generation {})",
                command.request.name(),
                command.generation
            );
            let client = self.client.clone();
            let sender = self.sender.clone();
            let wake = Arc::clone(&self.wake);
            self.runtime.spawn(async move {
                let completion = command.execute(&client).await;
                if sender.send(completion).is_err() {
                    tracing::debug!("Completion dropped, dashboard closed");
                    return;
                }
                wake();
            });
        }
    }

    /// Completions that finished since the last call.
    pub fn drain(&self) -> Vec<Completion> {
        self.receiver.try_iter().collect()
    }

    /// Wait for the next completion. Used where no UI loop is running.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Completion> {
        self.receiver.recv_timeout(timeout).ok()
    }
}
