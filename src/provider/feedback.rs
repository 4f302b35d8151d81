//! What a save reports to the user while it runs

use crate::item::VersionTag;

/// A step of [`Provider::save_with_feedback`](crate::Provider::save_with_feedback)
#[derive(Clone, Debug, PartialEq)]
pub enum SaveEvent {
    NotStarted,
    Started,
    /// The remote document has been read (`None` if there is none yet)
    Fetched { version: Option<VersionTag> },
    /// A table has been merged: `old` remote records and `new` in-memory ones gave `merged` records
    Merged { table: &'static str, old: usize, new: usize, merged: usize },
    /// The merged document is now the remote one
    Pushed { version: VersionTag },
    /// The save stopped. Neither the tracker nor the remote document have changed
    Failed { error: String },
}

impl Default for SaveEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<SaveEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<SaveEvent>;

/// Create a channel that always holds the last step of a save
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(SaveEvent::default())
}


/// Logs every step of a save, and forwards it to a listener if there is one
pub(crate) struct Reporter {
    sender: Option<FeedbackSender>,
}

impl Reporter {
    pub fn silent() -> Self {
        Self { sender: None }
    }

    pub fn to(sender: FeedbackSender) -> Self {
        Self { sender: Some(sender) }
    }

    pub fn report(&self, event: SaveEvent) {
        match &event {
            SaveEvent::NotStarted => (),
            SaveEvent::Started => log::info!("Starting a save"),
            SaveEvent::Fetched { version: None } => log::info!("No remote document yet, it will be created"),
            SaveEvent::Fetched { version: Some(version) } => log::debug!("Remote document is at version {}", version),
            SaveEvent::Merged { table, old, new, merged } => log::debug!("{}: {} remote and {} local records merged into {}", table, old, new, merged),
            SaveEvent::Pushed { version } => log::info!("Save ended, the remote document is now at version {}", version),
            SaveEvent::Failed { error } => log::error!("Save failed: {}", error),
        }

        if let Some(sender) = &self.sender {
            // nobody may be listening anymore
            let _ = sender.send(event);
        }
    }
}
