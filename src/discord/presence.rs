//! Discord Rich Presence integration using discord-sdk

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use discord_sdk::{
    activity::{ActivityBuilder, Assets},
    wheel::{UserSpoke, UserState, Wheel},
    Discord, Subscriptions,
};
use parking_lot::Mutex;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::PresenceConfig;
use crate::error::PresenceError;
use crate::presence::{
    Completion, CompletionSender, PresenceBackend, PresencePayload, PresenceRequest, RequestKind,
};

/// Timeout for waiting for Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Time allowed for the disconnect to finish on shutdown
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

enum Command {
    Request {
        id: u64,
        request: PresenceRequest,
        completions: CompletionSender,
    },
    Flush(std::sync::mpsc::SyncSender<()>),
    Shutdown,
}

/// Manages the Discord connection and background task
pub struct DiscordState {
    command_tx: mpsc::UnboundedSender<Command>,
    runtime: Mutex<Option<Runtime>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DiscordState {
    /// Initialize Discord integration
    ///
    /// Creates a dedicated runtime for the connection, since the host drives
    /// this module from its own event thread, and spawns the task that owns
    /// the Discord client.
    pub fn init(config: &PresenceConfig) -> Result<Self, PresenceError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("discord-presence")
            .enable_all()
            .build()
            .map_err(|e| PresenceError::Init(format!("Failed to create runtime: {}", e)))?;

        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));
        let user_spoke = wheel.user();

        let discord = {
            let _guard = runtime.enter();
            Discord::new(config.client_id, Subscriptions::ACTIVITY, Box::new(handler))
                .map_err(|e| PresenceError::Init(e.to_string()))?
        };

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let task = runtime.spawn(Self::run_discord_task(discord, user_spoke, command_rx));

        Ok(Self {
            command_tx,
            runtime: Mutex::new(Some(runtime)),
            task: Mutex::new(Some(task)),
        })
    }

    /// Background task that maintains the Discord connection and processes presence requests
    async fn run_discord_task(
        discord: Discord,
        mut user_spoke: UserSpoke,
        mut command_rx: mpsc::UnboundedReceiver<Command>,
    ) {
        tracing::info!("Discord connecting...");

        match tokio::time::timeout(HANDSHAKE_TIMEOUT, wait_for_user(&mut user_spoke)).await {
            Ok(Ok(name)) => tracing::info!("Discord Rich Presence connected as {}", name),
            Ok(Err(e)) => tracing::warn!("{}", e),
            Err(_) => tracing::warn!("Discord handshake timed out"),
        }

        let mut pending: VecDeque<Command> = VecDeque::new();
        let mut warned_offline = false;

        loop {
            let command = match pending.pop_front() {
                Some(command) => command,
                None => match command_rx.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };

            match command {
                Command::Request {
                    id,
                    request,
                    completions,
                } => {
                    let kind = request.kind();

                    // Only the newest of several queued updates is worth sending
                    while let Ok(next) = command_rx.try_recv() {
                        pending.push_back(next);
                    }
                    if kind == RequestKind::Update && next_is_update(&pending) {
                        let _ = completions.send(Completion {
                            id,
                            kind,
                            result: Err(PresenceError::Superseded),
                        });
                        continue;
                    }

                    let connected =
                        matches!(*user_spoke.0.borrow(), UserState::Connected(_));
                    let result = if connected {
                        warned_offline = false;
                        send_request(&discord, &request).await
                    } else {
                        if !warned_offline {
                            tracing::warn!("Discord is not connected, skipping presence updates");
                            warned_offline = true;
                        }
                        Err(PresenceError::NotConnected)
                    };

                    let _ = completions.send(Completion { id, kind, result });
                }
                Command::Flush(ack) => {
                    let _ = ack.send(());
                }
                Command::Shutdown => break,
            }
        }

        discord.disconnect().await;
        tracing::info!("Discord Rich Presence disconnected");
    }

    fn send_command(&self, command: Command) -> bool {
        self.command_tx.send(command).is_ok()
    }

    /// Wait until every command sent so far has been processed
    pub fn flush(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = std::sync::mpsc::sync_channel(1);
        if !self.send_command(Command::Flush(ack_tx)) {
            return false;
        }
        ack_rx.recv_timeout(timeout).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.send_command(Command::Shutdown);

        let Some(runtime) = self.runtime.lock().take() else {
            return;
        };

        if let Some(task) = self.task.lock().take() {
            // The timer needs the runtime's reactor, so it is created inside block_on
            let stopped =
                runtime.block_on(async { tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await });
            if stopped.is_err() {
                tracing::warn!("Discord task did not stop within {:?}", SHUTDOWN_TIMEOUT);
            }
        }

        runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    }
}

async fn wait_for_user(user_spoke: &mut UserSpoke) -> Result<String, String> {
    if user_spoke.0.changed().await.is_err() {
        return Err("Discord connection closed".to_string());
    }

    match &*user_spoke.0.borrow() {
        UserState::Connected(user) => Ok(format!(
            "{}#{}",
            user.username,
            user.discriminator.unwrap_or(0)
        )),
        UserState::Disconnected(err) => Err(format!("Discord disconnected: {:?}", err)),
    }
}

fn next_is_update(pending: &VecDeque<Command>) -> bool {
    matches!(
        pending.front(),
        Some(Command::Request {
            request: PresenceRequest::Update(_),
            ..
        })
    )
}

async fn send_request(discord: &Discord, request: &PresenceRequest) -> Result<(), PresenceError> {
    let result = match request {
        PresenceRequest::Update(payload) => discord.update_activity(build_activity(payload)).await,
        PresenceRequest::Clear => discord.clear_activity().await,
    };

    result
        .map(|_| ())
        .map_err(|e| PresenceError::Rejected(e.to_string()))
}

/// The optional parts of an activity; Discord rejects empty strings
#[derive(Debug, PartialEq, Eq)]
struct ActivityFields<'a> {
    details: Option<&'a str>,
    state: Option<&'a str>,
    start: Option<SystemTime>,
}

impl<'a> ActivityFields<'a> {
    fn from_payload(payload: &'a PresencePayload) -> Self {
        Self {
            details: Some(payload.details.as_str()).filter(|s| !s.is_empty()),
            state: Some(payload.state.as_str()).filter(|s| !s.is_empty()),
            start: payload.start.map(SystemTime::from),
        }
    }
}

fn build_activity(payload: &PresencePayload) -> ActivityBuilder {
    let fields = ActivityFields::from_payload(payload);
    let mut activity = ActivityBuilder::new().assets(
        Assets::default().large(payload.large_image.as_str(), Some(payload.large_text.as_str())),
    );

    if let Some(details) = fields.details {
        activity = activity.details(details);
    }
    if let Some(state) = fields.state {
        activity = activity.state(state);
    }
    if let Some(start) = fields.start {
        activity = activity.start_timestamp(start);
    }

    activity
}

/// Discord presence backend implementing the generic PresenceBackend trait
pub struct DiscordPresence {
    state: Arc<DiscordState>,
}

impl DiscordPresence {
    /// Create a new Discord presence backend
    pub fn new(state: Arc<DiscordState>) -> Self {
        Self { state }
    }
}

impl PresenceBackend for DiscordPresence {
    fn name(&self) -> &'static str {
        "Discord"
    }

    fn submit(&self, id: u64, request: PresenceRequest, completions: CompletionSender) {
        let kind = request.kind();
        let command = Command::Request {
            id,
            request,
            completions: completions.clone(),
        };

        if !self.state.send_command(command) {
            let _ = completions.send(Completion {
                id,
                kind,
                result: Err(PresenceError::ChannelClosed),
            });
        }
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.state.flush(timeout)
    }

    fn shutdown(&self) {
        self.state.shutdown();
    }
}
