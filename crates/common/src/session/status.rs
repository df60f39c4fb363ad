use serde::Serialize;

/// Where the session is in its listing lifecycle
///
/// ```text
/// NoPar --set_par--> Listing --ok--> Ready --set_par | refresh--> Listing
///                      |
///                      +--err--> Ready { stale } (a tree was listed before)
///                      +--err--> NoPar { stale } (nothing listed yet)
/// ```
///
/// There is no terminal error state: the next refresh starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SessionState {
    NoPar { stale: bool },
    Listing,
    Ready { stale: bool },
}

/// Snapshot published on every session state change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub state: SessionState,
    /// Bumped each time a listing replaces the tree
    pub generation: u64,
    /// Message of the most recent listing failure, cleared by the next success
    pub last_error: Option<String>,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self {
            state: SessionState::NoPar { stale: false },
            generation: 0,
            last_error: None,
        }
    }
}

impl SessionStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    pub fn is_listing(&self) -> bool {
        matches!(self.state, SessionState::Listing)
    }
}
