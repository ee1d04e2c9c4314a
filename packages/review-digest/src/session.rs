//! Per-user state of the two-step comparison dialogue.
//!
//! The host asks for the first product, then the second, then runs the
//! comparison. The state lives here, next to the pipeline, so the pipeline
//! itself stays stateless.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::SessionError;
use crate::resolver::contains_marker;
use crate::types::record::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingFirst,
    AwaitingSecond { first: String },
}

/// What the host should do after a submitted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStep {
    /// First product stored; ask for the second.
    NeedSecond,
    /// Both products collected; the session is back to idle.
    Ready { first: String, second: String },
}

#[derive(Debug)]
struct Session {
    state: SessionState,
    touched: Instant,
}

pub struct ComparisonSessions {
    sessions: Mutex<HashMap<UserId, Session>>,
    timeout: Duration,
    markers: Vec<String>,
}

impl ComparisonSessions {
    pub fn new(timeout: Duration, markers: Vec<String>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timeout,
            markers,
        }
    }

    /// Start (or restart) a comparison for `user`.
    pub fn begin(&self, user: UserId) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(
            user,
            Session {
                state: SessionState::AwaitingFirst,
                touched: Instant::now(),
            },
        );
        debug!(user, "Comparison session started");
    }

    /// Current state; expired sessions read as idle.
    pub fn state(&self, user: UserId) -> SessionState {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut sessions, user);
        sessions
            .get(&user)
            .map(|s| s.state.clone())
            .unwrap_or(SessionState::Idle)
    }

    /// Feed the next product input into the session.
    ///
    /// Invalid input leaves the state unchanged so the user can retry.
    pub fn submit(&self, user: UserId, input: &str) -> Result<SessionStep, SessionError> {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut sessions, user);

        let session = sessions.get_mut(&user).ok_or(SessionError::NoActiveSession)?;

        let input = input.trim();
        if !self.looks_like_product(input) {
            return Err(SessionError::InvalidInput {
                input: input.to_string(),
            });
        }

        match std::mem::replace(&mut session.state, SessionState::Idle) {
            SessionState::AwaitingFirst => {
                session.state = SessionState::AwaitingSecond {
                    first: input.to_string(),
                };
                session.touched = Instant::now();
                Ok(SessionStep::NeedSecond)
            }
            SessionState::AwaitingSecond { first } => {
                sessions.remove(&user);
                Ok(SessionStep::Ready {
                    first,
                    second: input.to_string(),
                })
            }
            SessionState::Idle => {
                sessions.remove(&user);
                Err(SessionError::NoActiveSession)
            }
        }
    }

    /// Drop any session for `user`. Returns whether one was active.
    pub fn cancel(&self, user: UserId) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        self.evict_expired(&mut sessions, user);
        sessions.remove(&user).is_some()
    }

    /// An article number, or a link carrying a domain marker and a catalog path.
    pub fn looks_like_product(&self, input: &str) -> bool {
        let is_article = !input.is_empty() && input.chars().all(|c| c.is_ascii_digit());
        let is_link = contains_marker(input, &self.markers) && input.to_lowercase().contains("catalog");
        is_article || is_link
    }

    fn evict_expired(&self, sessions: &mut HashMap<UserId, Session>, user: UserId) {
        if sessions
            .get(&user)
            .is_some_and(|s| s.touched.elapsed() >= self.timeout)
        {
            sessions.remove(&user);
            debug!(user, "Comparison session expired");
        }
    }
}
