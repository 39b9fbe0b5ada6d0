//! Pull-refresh invalidation of cached views.
//!
//! Nothing here carries data to clients. A signal only says that the next
//! fetch of a path must recompute from persisted state.

use std::{collections::HashSet, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use ts_rs::TS;
use uuid::Uuid;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Logical view whose cached rendering can go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "view", content = "id")]
pub enum ViewPath {
    Editor(Uuid),
    PresenterLive(Uuid),
    AudienceLive(Uuid),
    PublicPoll(Uuid),
}

impl ViewPath {
    /// Every view that renders a presentation.
    pub fn all_for_presentation(id: Uuid) -> [ViewPath; 3] {
        [
            ViewPath::Editor(id),
            ViewPath::PresenterLive(id),
            ViewPath::AudienceLive(id),
        ]
    }
}

impl fmt::Display for ViewPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewPath::Editor(id) => write!(f, "/presentations/{id}/edit"),
            ViewPath::PresenterLive(id) => write!(f, "/presentations/{id}/present"),
            ViewPath::AudienceLive(id) => write!(f, "/live/{id}"),
            ViewPath::PublicPoll(id) => write!(f, "/poll/{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invalidation {
    pub paths: Vec<ViewPath>,
    pub at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct LiveSyncNotifier {
    sender: broadcast::Sender<Invalidation>,
    stale: RwLock<HashSet<ViewPath>>,
}

impl LiveSyncNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            stale: RwLock::new(HashSet::new()),
        }
    }

    /// Marks `paths` stale and tells any listener about it.
    pub async fn invalidate(&self, paths: impl IntoIterator<Item = ViewPath>) {
        let paths = paths.into_iter().collect::<Vec<_>>();
        if paths.is_empty() {
            return;
        }
        self.stale.write().await.extend(paths.iter().copied());

        tracing::debug!(paths = ?paths, "Invalidating views");
        self.broadcast(paths);
    }

    /// For views whose aggregate is gone: listeners still hear about them so
    /// they drop their copy, but there is nothing left to recompute.
    pub async fn retire(&self, paths: impl IntoIterator<Item = ViewPath>) {
        let paths = paths.into_iter().collect::<Vec<_>>();
        if paths.is_empty() {
            return;
        }
        {
            let mut stale = self.stale.write().await;
            for path in &paths {
                stale.remove(path);
            }
        }

        tracing::debug!(paths = ?paths, "Retiring views");
        self.broadcast(paths);
    }

    fn broadcast(&self, paths: Vec<ViewPath>) {
        // No receivers just means nobody is rendering right now.
        let _ = self.sender.send(Invalidation {
            paths,
            at: Utc::now(),
        });
    }

    pub async fn is_stale(&self, path: &ViewPath) -> bool {
        self.stale.read().await.contains(path)
    }

    /// Called by the renderer once it has recomputed `path`.
    /// Returns whether the path had been stale.
    pub async fn mark_fresh(&self, path: &ViewPath) -> bool {
        self.stale.write().await.remove(path)
    }

    pub async fn stale_paths(&self) -> Vec<ViewPath> {
        self.stale.read().await.iter().copied().collect()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.sender.subscribe()
    }
}

impl Default for LiveSyncNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
