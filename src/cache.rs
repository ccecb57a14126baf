use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::parser::{parse_questions, ParsedQuestion};

/// Memoizes `parse_questions` by content hash.
///
/// Owned by whoever constructs it; there is no background cleanup, call
/// [`ParseCache::clear`] to release entries.
pub struct ParseCache {
    capacity: usize,
    entries: HashMap<u64, Vec<ParsedQuestion>>,
    order: VecDeque<u64>,
    hits: u64,
    misses: u64,
}

impl ParseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get_or_parse(&mut self, markdown: &str) -> &[ParsedQuestion] {
        let key = content_key(markdown);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
            if self.entries.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                }
            }
            self.entries.insert(key, parse_questions(markdown));
            self.order.push_back(key);
        }
        self.entries.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every entry. Returns how many were released.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.order.clear();
        debug!(dropped, hits = self.hits, misses = self.misses, "parse cache cleared");
        dropped
    }
}

fn content_key(markdown: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    markdown.hash(&mut hasher);
    hasher.finish()
}
