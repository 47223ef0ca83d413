// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Sketchbridge-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Sketchbridge and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Headless canvas host.
//!
//! The sync engine is single-threaded, so the bridge runs it on a dedicated thread with a
//! current-thread runtime and a `LocalSet`, in front of a [`MemoryCanvas`]. Everything else talks
//! to it through a cloneable [`BridgeHandle`]. Like the owning application, the bridge feeds every
//! emitted state straight back in as the next inbound scene.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use tokio::sync::{mpsc, oneshot};

use crate::canvas::MemoryCanvas;
use crate::config::SyncConfig;
use crate::model::DiagramState;
use crate::schedule::LocalScheduler;
use crate::sync::{ApplyOutcome, CanvasSync, EmitterStats};

const COMMAND_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to start the canvas thread: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("canvas bridge has shut down")]
    Closed,
}

/// What the canvas has reported to its owner so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmittedSnapshot {
    pub state: Option<DiagramState>,
    pub count: u64,
    /// Hex fingerprint of the last emission, absent before the first one or after a fingerprint
    /// failure.
    pub fingerprint: Option<String>,
    pub stats: EmitterStats,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneSnapshot {
    pub state: DiagramState,
    pub renders: usize,
}

enum Command {
    Apply { state: Option<DiagramState>, reply: oneshot::Sender<ApplyOutcome> },
    Edit { state: DiagramState, reply: oneshot::Sender<()> },
    Scene { reply: oneshot::Sender<SceneSnapshot> },
    Emitted { reply: oneshot::Sender<EmittedSnapshot> },
    Flush { reply: oneshot::Sender<bool> },
    Shutdown { reply: oneshot::Sender<()> },
}

#[derive(Clone)]
pub struct BridgeHandle {
    commands: mpsc::Sender<Command>,
}

impl BridgeHandle {
    /// New scene from the assistant pipeline.
    pub async fn apply(&self, state: Option<DiagramState>) -> Result<ApplyOutcome, BridgeError> {
        self.request(|reply| Command::Apply { state, reply }).await
    }

    /// Simulates a user replacing the canvas contents.
    pub async fn edit(&self, state: DiagramState) -> Result<(), BridgeError> {
        self.request(|reply| Command::Edit { state, reply }).await
    }

    pub async fn scene(&self) -> Result<SceneSnapshot, BridgeError> {
        self.request(|reply| Command::Scene { reply }).await
    }

    pub async fn emitted(&self) -> Result<EmittedSnapshot, BridgeError> {
        self.request(|reply| Command::Emitted { reply }).await
    }

    /// Settles a pending burst immediately. Returns whether one was pending.
    pub async fn flush(&self) -> Result<bool, BridgeError> {
        self.request(|reply| Command::Flush { reply }).await
    }

    /// Flushes, tears the engine down and stops the canvas thread.
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, BridgeError> {
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).await.map_err(|_| BridgeError::Closed)?;
        response.await.map_err(|_| BridgeError::Closed)
    }
}

/// Starts the canvas thread.
pub fn spawn_bridge(config: SyncConfig) -> Result<BridgeHandle, BridgeError> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let (commands, inbox) = mpsc::channel(COMMAND_CAPACITY);

    std::thread::Builder::new().name("sketchbridge-canvas".to_owned()).spawn(move || {
        let local = tokio::task::LocalSet::new();
        local.block_on(&runtime, run(config, inbox));
        tracing::debug!("canvas thread stopped");
    })?;

    Ok(BridgeHandle { commands })
}

#[derive(Default)]
struct EmittedLog {
    latest: Option<DiagramState>,
    count: u64,
}

async fn run(config: SyncConfig, mut inbox: mpsc::Receiver<Command>) {
    let canvas = MemoryCanvas::new();
    let user = canvas.clone();
    let log = Rc::new(RefCell::new(EmittedLog::default()));
    let (echo, mut echoes) = mpsc::unbounded_channel();

    let sink_log = log.clone();
    let mut sync = CanvasSync::new(&config, LocalScheduler::new(), move |state: DiagramState| {
        {
            let mut log = sink_log.borrow_mut();
            log.latest = Some(state.clone());
            log.count += 1;
        }
        // The receiver lives as long as the loop below.
        let _ = echo.send(state);
    })
    .with_diagnostics(|diagnostic| tracing::info!(%diagnostic, "sync diagnostic"));
    sync.attach(canvas);
    tracing::info!(window_ms = config.quiescence_window_ms, "canvas bridge ready");

    loop {
        tokio::select! {
            biased;
            Some(state) = echoes.recv() => {
                let outcome = sync.apply(Some(state));
                tracing::debug!(outcome = outcome.as_str(), "owner echoed emitted scene");
            }
            command = inbox.recv() => {
                let Some(command) = command else {
                    break;
                };
                if handle(&mut sync, &user, &log, command).is_break() {
                    break;
                }
            }
        }
    }

    sync.teardown();
}

fn handle(
    sync: &mut CanvasSync<MemoryCanvas, LocalScheduler>,
    user: &MemoryCanvas,
    log: &RefCell<EmittedLog>,
    command: Command,
) -> ControlFlow<()> {
    // A dropped reply receiver only means the caller gave up waiting.
    match command {
        Command::Apply { state, reply } => {
            let _ = reply.send(sync.apply(state));
        }
        Command::Edit { state, reply } => {
            user.edit(state);
            let _ = reply.send(());
        }
        Command::Scene { reply } => {
            let _ = reply.send(SceneSnapshot { state: user.snapshot(), renders: user.renders() });
        }
        Command::Emitted { reply } => {
            let log = log.borrow();
            let _ = reply.send(EmittedSnapshot {
                state: log.latest.clone(),
                count: log.count,
                fingerprint: sync.emitter().last_emitted().map(|fingerprint| fingerprint.to_hex()),
                stats: sync.emitter().stats(),
            });
        }
        Command::Flush { reply } => {
            let _ = reply.send(sync.flush());
        }
        Command::Shutdown { reply } => {
            sync.flush();
            sync.teardown();
            let _ = reply.send(());
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
