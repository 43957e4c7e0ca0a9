//! Session registry aggregate.
//!
//! Holds the live sessions together with the kick list and the ban list so
//! that every rule touching more than one of them is applied in a single
//! step. The registry is plain data; the repository puts it behind a mutex.

use std::collections::{HashMap, HashSet};

use super::{AdmissionError, ConnectionId, DisplayName, ModerationError, Session};

/// Result of settling a connection that stopped receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectOutcome {
    /// The session, if it was still registered
    pub session: Option<Session>,
    /// Whether a pending kick or a ban silences the disconnect notice
    pub notice_suppressed: bool,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<ConnectionId, Session>,
    /// Names kicked whose handler has not cleaned up yet
    kick_list: HashSet<DisplayName>,
    /// Names barred until restart
    ban_list: HashSet<DisplayName>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session whose name already passed [`DisplayName`] validation.
    ///
    /// A name held by a live session is `Taken`; otherwise a banned name is
    /// `Banned`.
    pub fn admit(&mut self, session: Session) -> Result<(), AdmissionError> {
        if self.find(session.name.as_str()).is_some() {
            return Err(AdmissionError::Taken(session.name.as_str().to_string()));
        }
        if self.ban_list.contains(&session.name) {
            return Err(AdmissionError::Banned(session.name.as_str().to_string()));
        }
        self.sessions.insert(session.connection_id, session);
        Ok(())
    }

    pub fn remove(&mut self, connection_id: ConnectionId) -> Option<Session> {
        self.sessions.remove(&connection_id)
    }

    pub fn lookup(&self, connection_id: ConnectionId) -> Option<&DisplayName> {
        self.sessions.get(&connection_id).map(|s| &s.name)
    }

    /// Every live session as `(connection, name)`, ordered by connection id.
    pub fn all(&self) -> Vec<(ConnectionId, DisplayName)> {
        let mut entries: Vec<(ConnectionId, DisplayName)> = self
            .sessions
            .values()
            .map(|s| (s.connection_id, s.name.clone()))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    pub fn find(&self, name: &str) -> Option<ConnectionId> {
        self.sessions
            .values()
            .find(|s| s.name.as_str() == name)
            .map(|s| s.connection_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn is_banned(&self, name: &str) -> bool {
        self.ban_list.iter().any(|n| n.as_str() == name)
    }

    /// Queue `name` in the kick list and drop its session.
    pub fn kick(&mut self, name: &str) -> Result<Session, ModerationError> {
        let connection_id = self
            .find(name)
            .ok_or_else(|| ModerationError::NotFound(name.to_string()))?;
        let session = self
            .sessions
            .remove(&connection_id)
            .ok_or_else(|| ModerationError::NotFound(name.to_string()))?;
        self.kick_list.insert(session.name.clone());
        Ok(session)
    }

    /// Add `name` to the ban list and drop its session.
    ///
    /// An already banned name is refused before the live-session lookup, so
    /// repeating a ban never touches the registry.
    pub fn ban(&mut self, name: &str) -> Result<Session, ModerationError> {
        if self.is_banned(name) {
            return Err(ModerationError::AlreadyBanned(name.to_string()));
        }
        let connection_id = self
            .find(name)
            .ok_or_else(|| ModerationError::NotFound(name.to_string()))?;
        let session = self
            .sessions
            .remove(&connection_id)
            .ok_or_else(|| ModerationError::NotFound(name.to_string()))?;
        self.ban_list.insert(session.name.clone());
        Ok(session)
    }

    /// Clean up after a connection whose handler stopped receiving.
    ///
    /// Removes the session if it is still registered and consumes one kick
    /// list entry for `name`. The notice is suppressed when such an entry was
    /// consumed or when `name` is banned.
    pub fn settle_disconnect(
        &mut self,
        connection_id: ConnectionId,
        name: &DisplayName,
    ) -> DisconnectOutcome {
        let session = self.sessions.remove(&connection_id);
        let kicked = self.kick_list.remove(name);
        let banned = self.ban_list.contains(name);
        DisconnectOutcome {
            session,
            notice_suppressed: kicked || banned,
        }
    }
}
