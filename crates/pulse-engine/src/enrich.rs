// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Content enrichment: keyword, category, style, and mood derivation.
//!
//! Enrichment prefers an external generative service when one is wired
//! in; any failure (or its absence) falls back to a deterministic
//! extractor so ingestion never blocks on the service. A TTL cache keyed
//! by (content type, prompt) sits in front of both paths.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use pulse_core::aggregate::KeywordProfile;
use pulse_core::error::EnrichError;
use pulse_core::types::ContentType;

/// Cache entries live for one hour.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Lower bound on keywords returned by enrichment.
const MIN_KEYWORDS: usize = 5;
/// Upper bound on keywords returned by enrichment.
const MAX_KEYWORDS: usize = 10;

/// Tokens dropped by the fallback extractor.
const STOPWORDS: [&str; 4] = ["the", "and", "with", "for"];

/// Generic fillers appended when extraction comes up short.
const FILLER_KEYWORDS: [&str; 5] = ["creative", "digital", "content", "generated", "artistic"];

// =============================================================================
// GenerativeClient Trait
// =============================================================================

/// The seam for the external text-generation service.
#[async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Extracts a keyword profile from a content prompt.
    async fn extract_keywords(
        &self,
        prompt: &str,
        content_type: ContentType,
    ) -> Result<KeywordProfile, EnrichError>;
}

// =============================================================================
// ContentEnricher
// =============================================================================

struct CacheEntry {
    profile: KeywordProfile,
    expires_at: Instant,
}

/// Derives keyword profiles for content prompts, with caching.
pub struct ContentEnricher {
    client: Option<Arc<dyn GenerativeClient>>,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ContentEnricher {
    /// Creates an enricher that always uses the deterministic fallback.
    pub fn new() -> Self {
        Self {
            client: None,
            cache: RwLock::new(HashMap::new()),
            ttl: CACHE_TTL,
        }
    }

    /// Attaches an external generative client.
    pub fn with_client(mut self, client: Arc<dyn GenerativeClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the cache TTL (used by tests).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Returns the keyword profile for a prompt, from cache when fresh.
    pub async fn enrich(&self, prompt: &str, content_type: ContentType) -> KeywordProfile {
        let key = cache_key(prompt, content_type);

        if let Some(profile) = self.cached(&key) {
            return profile;
        }

        let profile = match &self.client {
            Some(client) => match client.extract_keywords(prompt, content_type).await {
                Ok(profile) => normalize(profile, content_type),
                Err(error) => {
                    debug!(error = %error, "generative extraction failed, using fallback");
                    fallback_keywords(prompt, content_type)
                }
            },
            None => fallback_keywords(prompt, content_type),
        };

        self.insert(key, profile.clone());
        profile
    }

    /// Number of live (possibly expired) cache entries.
    pub fn cache_len(&self) -> usize {
        self.cache.read().len()
    }

    fn cached(&self, key: &str) -> Option<KeywordProfile> {
        let cache = self.cache.read();
        let entry = cache.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.profile.clone())
    }

    fn insert(&self, key: String, profile: KeywordProfile) {
        let mut cache = self.cache.write();

        // Expired entries are swept while the write lock is already held.
        let now = Instant::now();
        cache.retain(|_, entry| entry.expires_at > now);

        cache.insert(
            key,
            CacheEntry {
                profile,
                expires_at: now + self.ttl,
            },
        );
    }
}

impl Default for ContentEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentEnricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentEnricher")
            .field("has_client", &self.client.is_some())
            .field("cache_len", &self.cache_len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

fn cache_key(prompt: &str, content_type: ContentType) -> String {
    format!("keywords:{}:{}", content_type.as_str(), prompt)
}

// =============================================================================
// Deterministic Fallback
// =============================================================================

/// The deterministic keyword extractor.
///
/// Lower-cases and splits the prompt, drops stopwords and tokens of three
/// characters or fewer, prepends the content type and "ai-generated",
/// pads with generic fillers, and truncates to ten keywords. Category is
/// the content type; style and mood are fixed.
pub fn fallback_keywords(prompt: &str, content_type: ContentType) -> KeywordProfile {
    let mut keywords: Vec<String> =
        vec![content_type.as_str().to_string(), "ai-generated".to_string()];

    for word in prompt.to_lowercase().split_whitespace() {
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
        if word.len() > 3 && !STOPWORDS.contains(&word) {
            keywords.push(word.to_string());
        }
    }

    for filler in FILLER_KEYWORDS {
        if keywords.len() >= MAX_KEYWORDS {
            break;
        }
        keywords.push(filler.to_string());
    }

    keywords.truncate(MAX_KEYWORDS);

    KeywordProfile {
        keywords,
        category: content_type.as_str().to_string(),
        style: "general".to_string(),
        mood: "neutral".to_string(),
    }
}

/// Clamps an externally produced profile into the 5-10 keyword range.
fn normalize(mut profile: KeywordProfile, content_type: ContentType) -> KeywordProfile {
    if profile.keywords.len() < MIN_KEYWORDS {
        profile.keywords.push(content_type.as_str().to_string());
        profile.keywords.push("ai-generated".to_string());
        for filler in ["creative", "digital", "content"] {
            profile.keywords.push(filler.to_string());
        }
    }
    profile.keywords.truncate(MAX_KEYWORDS);
    profile
}

// =============================================================================
// Tests
// =============================================================================
