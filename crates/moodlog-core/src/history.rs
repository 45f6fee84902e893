use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use moodlog_schema::{AnalysisResult, MoodHistoryEntry};
use tokio::sync::{Mutex, RwLock};

use crate::insights::INSIGHT_WINDOW;

/// Document store holding journal records.
///
/// `recent` returns one user's entries ordered by `created_at`, newest first.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, entry: MoodHistoryEntry) -> Result<()>;
    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodHistoryEntry>>;
}

fn select_recent(
    entries: &[MoodHistoryEntry],
    user_id: &str,
    limit: usize,
) -> Vec<MoodHistoryEntry> {
    let mut selected: Vec<MoodHistoryEntry> = entries
        .iter()
        .filter(|e| e.user_id == user_id)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected.truncate(limit);
    selected
}

/// Window of analyses the insight aggregator expects, newest first.
pub async fn recent_analyses(
    store: &dyn HistoryStore,
    user_id: &str,
) -> Result<Vec<AnalysisResult>> {
    let entries = store.recent(user_id, INSIGHT_WINDOW).await?;
    Ok(entries.into_iter().map(|e| e.analysis).collect())
}

#[derive(Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<MoodHistoryEntry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, entry: MoodHistoryEntry) -> Result<()> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodHistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(select_recent(&entries, user_id, limit))
    }
}

/// Journal kept as a single JSON array on disk. A missing file is an empty journal.
pub struct JsonFileHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<MoodHistoryEntry>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read journal: {}", self.path.display())
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse journal: {}", self.path.display()))
    }

    async fn save(&self, entries: &[MoodHistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("failed to create journal dir: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("failed to write journal: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace journal: {}", self.path.display()))
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn append(&self, entry: MoodHistoryEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.load().await?;
        entries.push(entry);
        self.save(&entries).await
    }

    async fn recent(&self, user_id: &str, limit: usize) -> Result<Vec<MoodHistoryEntry>> {
        let entries = self.load().await?;
        Ok(select_recent(&entries, user_id, limit))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use moodlog_schema::MoodLabel;

    use super::*;

    fn entry(user: &str, minutes_ago: i64, mood: MoodLabel) -> MoodHistoryEntry {
        let mut entry = MoodHistoryEntry::new(
            user,
            "text",
            AnalysisResult {
                mood,
                ..AnalysisResult::default()
            },
        );
        entry.created_at = Utc::now() - Duration::minutes(minutes_ago);
        entry
    }

    #[tokio::test]
    async fn in_memory_recent_is_newest_first_per_user() {
        let store = InMemoryHistoryStore::new();
        store.append(entry("a", 30, MoodLabel::Sad)).await.unwrap();
        store.append(entry("a", 10, MoodLabel::Happy)).await.unwrap();
        store.append(entry("b", 5, MoodLabel::Angry)).await.unwrap();
        store.append(entry("a", 20, MoodLabel::Calm)).await.unwrap();

        let recent = store.recent("a", 10).await.unwrap();
        let moods: Vec<_> = recent.iter().map(|e| e.analysis.mood).collect();
        assert_eq!(moods, vec![MoodLabel::Happy, MoodLabel::Calm, MoodLabel::Sad]);

        assert_eq!(store.recent("a", 2).await.unwrap().len(), 2);
        assert!(store.recent("nobody", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn recent_analyses_is_bounded_window() {
        let store = InMemoryHistoryStore::new();
        for i in 0..15 {
            store.append(entry("a", i, MoodLabel::Neutral)).await.unwrap();
        }
        let analyses = recent_analyses(&store, "a").await.unwrap();
        assert_eq!(analyses.len(), INSIGHT_WINDOW);
    }

    #[tokio::test]
    async fn json_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileHistoryStore::new(dir.path().join("journal.json"));
        assert!(store.recent("a", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn json_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.json");

        let store = JsonFileHistoryStore::new(&path);
        store.append(entry("a", 10, MoodLabel::Sad)).await.unwrap();
        store.append(entry("a", 1, MoodLabel::Excited)).await.unwrap();

        let reopened = JsonFileHistoryStore::new(&path);
        let recent = reopened.recent("a", 10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].analysis.mood, MoodLabel::Excited);
    }

    #[tokio::test]
    async fn json_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileHistoryStore::new(&path);
        let err = store.recent("a", 10).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse journal"));
    }
}
