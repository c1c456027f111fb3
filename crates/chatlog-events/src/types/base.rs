//! Fields shared by every record variant.

use chatlog_core::{RecordId, ThreadId};

use super::content::{EditState, Expiration, RichContent, StoryContext, ViewOnce};

/// Base record: identity, timing, presentation state, and rich content.
///
/// Only the crate can build or mutate one. Application code gets a base by
/// calling a variant's narrow constructor; the storage layer gets one by
/// hydrating a row or decoding a legacy archive.
#[derive(Clone, Debug, PartialEq)]
pub struct InfoMessageBase {
    pub(crate) row_id: Option<i64>,
    pub(crate) unique_id: RecordId,
    pub(crate) thread_id: ThreadId,
    pub(crate) timestamp: u64,
    pub(crate) received_at_timestamp: u64,
    pub(crate) server_guid: Option<String>,
    pub(crate) read: bool,
    pub(crate) was_remotely_deleted: bool,
    pub(crate) expiration: Expiration,
    pub(crate) view_once: ViewOnce,
    pub(crate) content: RichContent,
    pub(crate) story: StoryContext,
    pub(crate) edit_state: EditState,
    pub(crate) custom_message: Option<String>,
}

impl InfoMessageBase {
    /// Defaults for a freshly created record: unread, no timer, no content,
    /// and a new record identifier.
    pub(crate) fn new(thread_id: &ThreadId, timestamp: u64) -> Self {
        Self {
            row_id: None,
            unique_id: RecordId::new(),
            thread_id: thread_id.clone(),
            timestamp,
            received_at_timestamp: timestamp,
            server_guid: None,
            read: false,
            was_remotely_deleted: false,
            expiration: Expiration::default(),
            view_once: ViewOnce::default(),
            content: RichContent::default(),
            story: StoryContext::default(),
            edit_state: EditState::default(),
            custom_message: None,
        }
    }

    /// Storage row identifier; `None` until persisted.
    #[must_use]
    pub fn row_id(&self) -> Option<i64> {
        self.row_id
    }

    /// Globally unique record identifier.
    #[must_use]
    pub fn unique_id(&self) -> &RecordId {
        &self.unique_id
    }

    /// Owning thread.
    #[must_use]
    pub fn thread_id(&self) -> &ThreadId {
        &self.thread_id
    }

    /// Creation timestamp (ms).
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Local receipt timestamp (ms).
    #[must_use]
    pub fn received_at_timestamp(&self) -> u64 {
        self.received_at_timestamp
    }

    /// Server-assigned GUID, if the record came from the server.
    #[must_use]
    pub fn server_guid(&self) -> Option<&str> {
        self.server_guid.as_deref()
    }

    /// Whether the record has been read.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.read
    }

    /// Whether the sender deleted the record for everyone.
    #[must_use]
    pub fn was_remotely_deleted(&self) -> bool {
        self.was_remotely_deleted
    }

    /// Disappearing-message timing.
    #[must_use]
    pub fn expiration(&self) -> &Expiration {
        &self.expiration
    }

    /// View-once flags.
    #[must_use]
    pub fn view_once(&self) -> &ViewOnce {
        &self.view_once
    }

    /// Rich content references.
    #[must_use]
    pub fn content(&self) -> &RichContent {
        &self.content
    }

    /// Story linkage.
    #[must_use]
    pub fn story(&self) -> &StoryContext {
        &self.story
    }

    /// Edit revision state.
    #[must_use]
    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    /// Free-form text overriding the kind's default description.
    #[must_use]
    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message.as_deref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
