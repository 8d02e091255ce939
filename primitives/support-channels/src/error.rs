use std::fmt;

use crate::directory::DirectoryError;

/// A mutating call made against a single channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Join,
    Leave,
    MarkRead,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Join => "join",
            Self::Leave => "leave",
            Self::MarkRead => "mark as read",
        })
    }
}

/// Fatal errors that end a run. None are retried.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("no slack auth key provided")]
    MissingCredential,

    #[error("authentication failed: {0}")]
    Auth(#[source] DirectoryError),

    #[error("listing channels failed: {0}")]
    List(#[source] DirectoryError),

    #[error("failed to {action} {channel}: {source}")]
    Action {
        action: Action,
        channel: String,
        #[source]
        source: DirectoryError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
