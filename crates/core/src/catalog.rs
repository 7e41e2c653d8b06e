use thiserror::Error;

use crate::model::{Lesson, LessonError, LessonHandle};
use crate::resolver::{self, Resolution};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Failure to read one tier source. Never fatal: the tier degrades to empty.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogLoadError {
    #[error("tier source unavailable: {0}")]
    Io(String),

    #[error("tier source is malformed: {0}")]
    Malformed(String),

    #[error("lesson #{index} is invalid: {source}")]
    InvalidLesson {
        index: usize,
        #[source]
        source: LessonError,
    },
}

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Something that yields the ordered lessons of one tier.
pub trait TierSource {
    /// Display name of the tier, e.g. `beginner`.
    fn name(&self) -> &str;

    /// Read and validate every lesson of the tier, in curriculum order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogLoadError` when the source is missing or malformed.
    fn load(&self) -> Result<Vec<Lesson>, CatalogLoadError>;
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tier {
    name: String,
    lessons: Vec<Lesson>,
}

impl Tier {
    #[must_use]
    pub fn new(name: impl Into<String>, lessons: Vec<Lesson>) -> Self {
        Self {
            name: name.into(),
            lessons,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

/// Immutable, ordered lesson sequences for every tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tiers: Vec<Tier>,
}

impl Catalog {
    #[must_use]
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self { tiers }
    }

    /// Load every source in order. A failing source becomes an empty tier and is
    /// logged; the remaining tiers still load.
    pub fn load<S>(sources: &[S]) -> Self
    where
        S: TierSource,
    {
        let tiers = sources
            .iter()
            .map(|source| match source.load() {
                Ok(lessons) => {
                    tracing::info!(tier = source.name(), lessons = lessons.len(), "tier loaded");
                    Tier::new(source.name(), lessons)
                }
                Err(err) => {
                    tracing::error!(tier = source.name(), error = %err, "tier failed to load, serving it empty");
                    Tier::new(source.name(), Vec::new())
                }
            })
            .collect();
        Self { tiers }
    }

    #[must_use]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    #[must_use]
    pub fn tier(&self, tier: usize) -> Option<&Tier> {
        self.tiers.get(tier)
    }

    #[must_use]
    pub fn tier_lengths(&self) -> Vec<usize> {
        self.tiers.iter().map(Tier::len).collect()
    }

    /// Total number of lessons across all tiers.
    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.tiers.iter().map(Tier::len).sum()
    }

    #[must_use]
    pub fn lesson(&self, handle: LessonHandle) -> Option<&Lesson> {
        self.tiers
            .get(handle.tier())
            .and_then(|tier| tier.lessons.get(handle.index()))
    }

    /// First global index of `tier`.
    #[must_use]
    pub fn tier_offset(&self, tier: usize) -> Option<usize> {
        resolver::tier_offset(tier, &self.tier_lengths())
    }

    /// Global cursor value of the lesson behind `handle`, if it exists.
    #[must_use]
    pub fn global_index(&self, handle: LessonHandle) -> Option<usize> {
        self.lesson(handle)?;
        self.tier_offset(handle.tier())
            .map(|offset| offset + handle.index())
    }

    #[must_use]
    pub fn resolve(&self, cursor: u32) -> Resolution {
        resolver::resolve(cursor, &self.tier_lengths())
    }

    /// Handles of every lesson that carries a task in tiers `0..=last_tier`.
    #[must_use]
    pub fn lessons_with_tasks(&self, last_tier: usize) -> Vec<LessonHandle> {
        self.tiers
            .iter()
            .enumerate()
            .take(last_tier.saturating_add(1))
            .flat_map(|(tier, t)| {
                t.lessons
                    .iter()
                    .enumerate()
                    .filter(|(_, lesson)| lesson.has_task())
                    .map(move |(index, _)| LessonHandle::new(tier, index))
            })
            .collect()
    }
}
