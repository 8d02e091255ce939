//! Channel directory contract and cursor pagination.
//!
//! The core only talks to the messaging platform through [`ChannelDirectory`].
//! [`fetch_all_channels`] turns the paged `list_channels` call into a lazy
//! stream of pages and folds it into one snapshot.

use async_trait::async_trait;
use futures::{TryStreamExt, stream};
use tracing::debug;

use crate::channel::{Channel, ChannelId, Identity};

/// Errors returned by a directory client.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("response missing field: {0}")]
    Missing(&'static str),
}

/// One page of `list_channels`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    /// Cursor for the next page. `None` or empty means this was the last page.
    pub next_cursor: Option<String>,
}

/// Remote channel directory operations consumed by the driver.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    /// Verify the credential the client was built with.
    async fn authenticate(&self) -> Result<Identity, DirectoryError>;

    /// Fetch one page of non-archived channels.
    async fn list_channels(&self, cursor: Option<&str>) -> Result<ChannelPage, DirectoryError>;

    /// Join a channel. `name` is for reporting only; the platform joins by id.
    async fn join_channel(&self, name: &str, id: &ChannelId) -> Result<(), DirectoryError>;

    async fn leave_channel(&self, id: &ChannelId) -> Result<(), DirectoryError>;

    /// Move the channel's read cursor to `ts`.
    async fn mark_read(&self, id: &ChannelId, ts: &str) -> Result<(), DirectoryError>;
}

/// Fetches every page of channels and concatenates them in page order.
///
/// All-or-nothing: if any page fails, the pages already fetched are dropped
/// and the error is returned. Archived channels are filtered out even if the
/// directory did not exclude them.
pub async fn fetch_all_channels<D>(directory: &D) -> Result<Vec<Channel>, DirectoryError>
where
    D: ChannelDirectory + ?Sized,
{
    // `Some(cursor)` means another page is due; `None` ends the stream.
    let pages = stream::try_unfold(Some(None::<String>), move |state| async move {
        let Some(cursor) = state else {
            return Ok(None);
        };

        let ChannelPage {
            channels,
            next_cursor,
        } = directory.list_channels(cursor.as_deref()).await?;
        debug!(cursor = ?cursor, count = channels.len(), "fetched channel page");

        let next = next_cursor.filter(|c| !c.is_empty()).map(Some);
        Ok::<_, DirectoryError>(Some((channels, next)))
    });

    pages
        .try_fold(Vec::new(), |mut all, page| async move {
            all.extend(page.into_iter().filter(|c| !c.is_archived));
            Ok::<_, DirectoryError>(all)
        })
        .await
}
