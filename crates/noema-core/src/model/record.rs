use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::codec;
use crate::error::CoreError;

/// The three durable memory tiers. Each tier is a disjoint storage
/// namespace: record ids are never shared across tiers. Working memory is
/// owned by the state store and is rejected by memory-record operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryTier {
    Episodic,
    Semantic,
    Procedural,
}

impl MemoryTier {
    /// Declaration order doubles as the probe order for recall.
    pub const ALL: [MemoryTier; 3] = [
        MemoryTier::Episodic,
        MemoryTier::Semantic,
        MemoryTier::Procedural,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            MemoryTier::Episodic => "episodic",
            MemoryTier::Semantic => "semantic",
            MemoryTier::Procedural => "procedural",
        }
    }

    pub fn parse(input: &str) -> Result<Self, CoreError> {
        match input.to_ascii_lowercase().as_str() {
            "episodic" => Ok(MemoryTier::Episodic),
            "semantic" => Ok(MemoryTier::Semantic),
            "procedural" => Ok(MemoryTier::Procedural),
            "working" => Err(CoreError::UnsupportedTier(
                "working (owned by the state store; use the state commands)".into(),
            )),
            other => Err(CoreError::UnsupportedTier(other.to_string())),
        }
    }
}

impl std::fmt::Display for MemoryTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// One durable memory entry, stored as a single JSON file keyed by id.
/// `access_count` and `last_accessed` are touched only by recall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub tier: MemoryTier,
    pub data: Value,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub access_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl MemoryRecord {
    /// Build a fresh record from raw content text. Structured-literal text
    /// becomes the record's data; anything else is wrapped as `{content}`.
    pub fn new(tier: MemoryTier, content: &str, tags: Vec<String>) -> Self {
        Self {
            id: generate_id(content),
            tier,
            data: codec::decode_or_wrap(content),
            tags,
            created_at: Utc::now(),
            access_count: 0,
            last_accessed: None,
        }
    }

    pub fn mark_accessed(&mut self) {
        self.access_count += 1;
        self.last_accessed = Some(Utc::now());
    }
}

/// 12-hex-char digest of the content plus the current timestamp. Folding
/// the timestamp in reduces collision probability; uniqueness is not
/// guaranteed.
pub fn generate_id(content: &str) -> String {
    let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
    let digest = format!("{:x}", Sha256::digest(format!("{content}{stamp}")));
    digest[..12].to_string()
}
