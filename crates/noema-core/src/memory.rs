//! Operations over the episodic/semantic/procedural tiers: store, keyword
//! search, recall with access accounting, prune, and a read-only inventory.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{MemoryRecord, MemoryTier};
use crate::storage::{records, MemoryHome};

pub const DEFAULT_SEARCH_LIMIT: usize = 5;
pub const DEFAULT_PRUNE_DAYS: i64 = 30;

/// One search result: the record plus its keyword score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub score: usize,
    pub entry: MemoryRecord,
}

/// Reference to a freshly stored record.
#[derive(Debug, Clone, Serialize)]
pub struct StoredRef {
    pub id: String,
    #[serde(rename = "type")]
    pub tier: MemoryTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct PruneReport {
    pub pruned: BTreeMap<String, usize>,
    pub cutoff_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TierStats {
    pub count: usize,
    pub size_bytes: u64,
    pub size_human: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryStats {
    pub memory_home: String,
    pub types: BTreeMap<String, TierStats>,
}

/// File-backed store for the three durable memory tiers.
pub struct MemoryStore {
    home: MemoryHome,
}

impl MemoryStore {
    pub fn new(home: MemoryHome) -> Self {
        Self { home }
    }

    pub fn home(&self) -> &MemoryHome {
        &self.home
    }

    fn record_path(&self, tier: MemoryTier, id: &str) -> PathBuf {
        self.home.tier_dir(tier).join(format!("{id}.json"))
    }

    /// Persist a new record and return its id.
    pub fn store(
        &self,
        tier: MemoryTier,
        content: &str,
        tags: Vec<String>,
    ) -> Result<StoredRef, CoreError> {
        self.home.ensure_dirs()?;
        let record = MemoryRecord::new(tier, content, tags);
        records::write_json(&self.record_path(tier, &record.id), &record)?;
        Ok(StoredRef {
            id: record.id,
            tier,
        })
    }

    /// Keyword search over one tier. The score is the number of distinct
    /// query tokens occurring as substrings of the serialized record; this
    /// is a relevance heuristic, explicitly not semantic retrieval.
    pub fn search(
        &self,
        tier: MemoryTier,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>, CoreError> {
        self.home.ensure_dirs()?;
        let tokens: BTreeSet<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let mut hits = Vec::new();
        for path in records::list_json_files(&self.home.tier_dir(tier))? {
            let record: MemoryRecord = match records::read_json(&path) {
                Ok(record) => record,
                Err(err) => {
                    tracing::warn!("skipping malformed record {}: {err}", path.display());
                    continue;
                }
            };
            let haystack = serde_json::to_string(&record)?.to_lowercase();
            let score = tokens
                .iter()
                .filter(|token| haystack.contains(token.as_str()))
                .count();
            if score > 0 {
                hits.push(SearchHit {
                    id: record.id.clone(),
                    score,
                    entry: record,
                });
            }
        }

        // Ties broken by id so equal-score results are stable across runs.
        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(limit);
        Ok(hits)
    }

    /// Look an id up across every tier, bumping its access accounting.
    /// Tiers are disjoint namespaces, so each one is probed in turn.
    pub fn recall(&self, id: &str) -> Result<MemoryRecord, CoreError> {
        self.home.ensure_dirs()?;
        for tier in MemoryTier::ALL {
            let path = self.record_path(tier, id);
            if !path.exists() {
                continue;
            }
            let mut record: MemoryRecord = records::read_json(&path)?;
            record.mark_accessed();
            records::write_json(&path, &record)?;
            return Ok(record);
        }
        Err(CoreError::NotFound(format!("memory {id}")))
    }

    /// Delete never-recalled records older than the cutoff. A record with
    /// any access survives regardless of age, and records that fail to
    /// decode are kept, not deleted.
    pub fn prune(&self, days: i64) -> Result<PruneReport, CoreError> {
        self.home.ensure_dirs()?;
        let cutoff = Utc::now() - Duration::days(days);
        let mut pruned = BTreeMap::new();

        for tier in MemoryTier::ALL {
            let mut removed = 0usize;
            for path in records::list_json_files(&self.home.tier_dir(tier))? {
                let record: MemoryRecord = match records::read_json(&path) {
                    Ok(record) => record,
                    Err(err) => {
                        tracing::warn!("keeping malformed record {}: {err}", path.display());
                        continue;
                    }
                };
                if record.created_at < cutoff && record.access_count == 0 {
                    fs::remove_file(&path)?;
                    removed += 1;
                }
            }
            pruned.insert(tier.dir_name().to_string(), removed);
        }

        Ok(PruneReport {
            pruned,
            cutoff_days: days,
        })
    }

    /// Read-only inventory of every tier, the working directory included.
    pub fn stats(&self) -> Result<MemoryStats, CoreError> {
        self.home.ensure_dirs()?;
        let mut types = BTreeMap::new();

        let mut dirs = vec![("working".to_string(), self.home.working_dir())];
        for tier in MemoryTier::ALL {
            dirs.push((tier.dir_name().to_string(), self.home.tier_dir(tier)));
        }

        for (name, dir) in dirs {
            let files = records::list_json_files(&dir)?;
            let size_bytes: u64 = files
                .iter()
                .filter_map(|path| fs::metadata(path).ok())
                .map(|meta| meta.len())
                .sum();
            types.insert(
                name,
                TierStats {
                    count: files.len(),
                    size_bytes,
                    size_human: human_size(size_bytes),
                },
            );
        }

        Ok(MemoryStats {
            memory_home: self.home.root().display().to_string(),
            types,
        })
    }
}

fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}
