//! Transport-level failures, kept strictly apart from the domain faults.
//!
//! A transport error means the other side could not be reached or did not
//! answer sensibly; it carries no verdict about the request itself. At the
//! two federation probe sites these are translated into the nearest domain
//! fault (`LinkFailed` on traversal, `NoSuchPlace` on link creation) so
//! callers see one uniform taxonomy.

use mudlink_domain::MudFault;
use thiserror::Error;

/// Failure to reach or understand a remote party.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer (or registry) could not be reached.
    #[error("peer unreachable: {0}")]
    Unreachable(String),

    /// The peer did not answer within the configured timeout.
    #[error("peer timed out")]
    Timeout,

    /// The peer answered, but not with anything this protocol allows.
    #[error("malformed peer reply: {0}")]
    Protocol(String),

    /// The local delivery channel behind an occupant handle is gone.
    #[error("delivery channel closed")]
    ChannelClosed,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Protocol(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

/// Outcome of a call to a peer server: either the peer rejected it for a
/// domain reason, or the call never completed.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error(transparent)]
    Fault(MudFault),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl PeerError {
    /// Collapse into a domain fault: domain rejections pass through,
    /// transport failures become `fallback`.
    pub fn into_fault(self, fallback: MudFault) -> MudFault {
        match self {
            Self::Fault(fault) => fault,
            Self::Transport(_) => fallback,
        }
    }
}
