use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process KV backend with the same semantics as the hosted store.
///
/// Sorted-set members are unique: re-adding a member moves it to its new
/// score. Members with equal scores keep insertion order, matching the
/// lexicographic tie-break closely enough for an append-only time series.
#[derive(Default)]
pub struct MemoryKv {
    strings: RwLock<HashMap<String, String>>,
    zsets: RwLock<HashMap<String, Vec<(i64, String)>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.strings.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) {
        self.strings
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn zadd(&self, key: &str, score: i64, member: &str) {
        let mut zsets = self.zsets.write().await;
        let set = zsets.entry(key.to_string()).or_default();
        set.retain(|(_, m)| m != member);
        let pos = set.partition_point(|(s, _)| *s <= score);
        set.insert(pos, (score, member.to_string()));
    }

    pub async fn zrange_withscores(&self, key: &str) -> Vec<(String, i64)> {
        self.zsets
            .read()
            .await
            .get(key)
            .map(|set| set.iter().map(|(s, m)| (m.clone(), *s)).collect())
            .unwrap_or_default()
    }
}
