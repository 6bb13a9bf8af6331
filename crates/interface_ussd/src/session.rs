//! Session driver
//!
//! [`UssdSession`] feeds input to a [`MenuController`] and executes the
//! commands it emits. Contributions and votes run inline; claim filing is
//! spawned so the menu can show its loading screen while the advisory
//! service is consulted. The result is applied on the next turn (or
//! [`UssdSession::poll`]) and dropped if the menu has moved on.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot::error::TryRecvError;
use tokio::sync::{oneshot, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use core_kernel::MemberId;
use domain_claims::VoteOutcome;
use domain_pool::PoolService;

use crate::error::UssdError;
use crate::menu::{FilingOutcome, MenuCommand, MenuController, SessionContext, Ticket};
use crate::screens::{Screen, CONTRIBUTION_FAILED, VOTE_FAILED};

#[derive(Debug)]
struct PendingFiling {
    ticket: Ticket,
    result: oneshot::Receiver<FilingOutcome>,
}

#[derive(Debug)]
pub struct UssdSession {
    service: Arc<PoolService>,
    menu: MenuController,
    pending: Option<PendingFiling>,
}

impl UssdSession {
    /// Opens a session for a member of the group
    pub async fn start(service: Arc<PoolService>, member_id: MemberId) -> Result<Self, UssdError> {
        if !service.group().await.is_member(member_id) {
            return Err(UssdError::UnknownMember(member_id.to_string()));
        }

        Ok(Self {
            service,
            menu: MenuController::new(SessionContext::new(member_id)),
            pending: None,
        })
    }

    pub fn member_id(&self) -> MemberId {
        self.menu.context().member_id
    }

    pub fn menu(&self) -> &MenuController {
        &self.menu
    }

    /// Current screen, after applying any finished filing
    pub async fn screen(&mut self) -> Screen {
        self.poll();
        let group = self.service.group().await;
        Screen::of(&self.menu, &group)
    }

    /// Processes one line of input and returns the resulting screen
    pub async fn send(&mut self, input: &str) -> Screen {
        self.poll();
        let group = self.service.group().await;
        let transition = self.menu.handle(input, &group);
        drop(group);

        if let Some(command) = transition.command {
            self.execute(command).await;
        }
        self.screen().await
    }

    /// Applies a finished filing, if any; returns true when the menu changed
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let outcome = match pending.result.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => FilingOutcome::Failed,
        };
        let ticket = pending.ticket;
        self.pending = None;
        self.menu.complete_filing(ticket, outcome)
    }

    /// Waits for the in-flight filing and applies it
    pub async fn wait_for_filing(&mut self) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        let outcome = pending.result.await.unwrap_or(FilingOutcome::Failed);
        self.menu.complete_filing(pending.ticket, outcome)
    }

    /// Returns to a fresh main menu
    ///
    /// A filing in flight still completes against the pool, but its result
    /// no longer reaches this menu.
    pub fn restart(&mut self) {
        self.menu.reset();
    }

    async fn execute(&mut self, command: MenuCommand) {
        let member_id = self.member_id();
        match command {
            MenuCommand::FileClaim {
                ticket,
                amount,
                description,
            } => {
                let (tx, rx) = oneshot::channel();
                let service = self.service.clone();
                tokio::spawn(async move {
                    let outcome = match service.file_claim(member_id, &description, amount).await {
                        Ok(filed) => FilingOutcome::Submitted { notice: filed.notice },
                        Err(err) => {
                            warn!(error = %err, member = %member_id, "claim filing failed");
                            FilingOutcome::Failed
                        }
                    };
                    if tx.send(outcome).is_err() {
                        debug!(member = %member_id, "session closed before filing finished");
                    }
                });
                self.pending = Some(PendingFiling { ticket, result: rx });
            }
            MenuCommand::Contribute { amount } => {
                if let Err(err) = self.service.record_contribution(member_id, amount).await {
                    warn!(error = %err, member = %member_id, "contribution failed");
                    self.menu.show_message(CONTRIBUTION_FAILED);
                }
            }
            MenuCommand::Vote { claim_id, choice } => {
                match self.service.cast_vote(claim_id, member_id, choice).await {
                    Ok(result) => {
                        if let VoteOutcome::Ignored(reason) = result.outcome {
                            debug!(%claim_id, %reason, "menu vote not counted");
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, %claim_id, "vote failed");
                        self.menu.show_message(VOTE_FAILED);
                    }
                }
            }
        }
    }
}

type SharedSession = Arc<Mutex<UssdSession>>;

/// Sessions untouched for this long are dropped
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug)]
struct Entry {
    owner: MemberId,
    session: SharedSession,
    last_seen: Instant,
}

/// Live sessions keyed by the channel's session id
#[derive(Debug)]
pub struct SessionRegistry {
    service: Arc<PoolService>,
    sessions: Mutex<HashMap<String, Entry>>,
    idle_timeout: Duration,
}

impl SessionRegistry {
    pub fn new(service: Arc<PoolService>) -> Self {
        Self {
            service,
            sessions: Mutex::new(HashMap::new()),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Returns the session for `session_id`, opening one if needed
    ///
    /// Idle sessions are swept first, so an expired id starts over. A
    /// session id reused by a different member starts over too.
    pub async fn open(&self, session_id: &str, member_id: MemberId) -> Result<SharedSession, UssdError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(UssdError::InvalidSession("session id must not be empty".into()));
        }

        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < self.idle_timeout);
        if sessions.len() < before {
            debug!(expired = before - sessions.len(), "idle ussd sessions dropped");
        }

        if let Some(entry) = sessions.get_mut(session_id) {
            if entry.owner == member_id {
                entry.last_seen = now;
                return Ok(entry.session.clone());
            }
            info!(session_id, "session id reused by another member; starting over");
        }

        let session = Arc::new(Mutex::new(UssdSession::start(self.service.clone(), member_id).await?));
        sessions.insert(
            session_id.to_string(),
            Entry {
                owner: member_id,
                session: session.clone(),
                last_seen: now,
            },
        );
        info!(session_id, member = %member_id, "ussd session opened");
        Ok(session)
    }

    /// Runs one turn; empty input just shows the current screen
    pub async fn turn(&self, session_id: &str, member_id: MemberId, input: &str) -> Result<Screen, UssdError> {
        let session = self.open(session_id, member_id).await?;
        let mut session = session.lock().await;
        if input.trim().is_empty() {
            Ok(session.screen().await)
        } else {
            Ok(session.send(input).await)
        }
    }

    /// Drops a session; returns false if it did not exist
    pub async fn end(&self, session_id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(session_id.trim()).is_some();
        if removed {
            info!(session_id, "ussd session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
