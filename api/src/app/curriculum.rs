//! Curriculum layout
//!
//! Which pages exist, which of them are sentinels (cover, final review) and
//! which pages make up each chapter. Loaded from JSON when configured,
//! otherwise the built-in course layout below.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Deserialize;

use crate::error::DomainError;

/// First and last page of the built-in course
pub const DEFAULT_FIRST_PAGE: i32 = 1;
pub const DEFAULT_LAST_PAGE: i32 = 36;

/// Cover/intro page and final review page
pub const DEFAULT_SENTINEL_PAGES: [i32; 2] = [1, 36];

/// Introduction and final-review chapters carry no quiz
pub const DEFAULT_SENTINEL_CHAPTERS: [i32; 2] = [0, 5];

/// (chapter, first page, last page) of the built-in course
pub const DEFAULT_CHAPTERS: [(i32, i32, i32); 4] = [(1, 2, 7), (2, 8, 17), (3, 18, 27), (4, 28, 35)];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chapter {
    pub id: i32,
    pub first_page: i32,
    pub last_page: i32,
}

impl Chapter {
    pub fn pages(&self) -> RangeInclusive<i32> {
        self.first_page..=self.last_page
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Curriculum {
    pub first_page: i32,
    pub last_page: i32,
    #[serde(default)]
    pub sentinel_pages: BTreeSet<i32>,
    #[serde(default)]
    pub sentinel_chapters: BTreeSet<i32>,
    pub chapters: Vec<Chapter>,
}

impl Default for Curriculum {
    fn default() -> Self {
        Self {
            first_page: DEFAULT_FIRST_PAGE,
            last_page: DEFAULT_LAST_PAGE,
            sentinel_pages: DEFAULT_SENTINEL_PAGES.into_iter().collect(),
            sentinel_chapters: DEFAULT_SENTINEL_CHAPTERS.into_iter().collect(),
            chapters: DEFAULT_CHAPTERS
                .into_iter()
                .map(|(id, first_page, last_page)| Chapter {
                    id,
                    first_page,
                    last_page,
                })
                .collect(),
        }
    }
}

impl Curriculum {
    /// Parse and validate a JSON curriculum
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let curriculum: Curriculum = serde_json::from_str(raw)?;
        curriculum.validate()?;
        Ok(curriculum)
    }

    /// Chapters must lie inside the page range and must not overlap
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.first_page > self.last_page {
            anyhow::bail!("first_page must not exceed last_page");
        }

        let mut seen_pages = BTreeSet::new();
        let mut seen_ids = BTreeSet::new();
        for chapter in &self.chapters {
            if !seen_ids.insert(chapter.id) || self.sentinel_chapters.contains(&chapter.id) {
                anyhow::bail!("chapter {} is defined twice", chapter.id);
            }
            if chapter.first_page > chapter.last_page
                || chapter.first_page < self.first_page
                || chapter.last_page > self.last_page
            {
                anyhow::bail!("chapter {} has an invalid page range", chapter.id);
            }
            for page in chapter.pages() {
                if !seen_pages.insert(page) {
                    anyhow::bail!("page {} belongs to more than one chapter", page);
                }
            }
        }

        Ok(())
    }

    pub fn is_sentinel_page(&self, page: i32) -> bool {
        self.sentinel_pages.contains(&page)
    }

    pub fn is_sentinel_chapter(&self, chapter: i32) -> bool {
        self.sentinel_chapters.contains(&chapter)
    }

    /// Reject pages outside the course
    pub fn check_page(&self, page: i32) -> Result<(), DomainError> {
        if (self.first_page..=self.last_page).contains(&page) {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "page {} is outside the curriculum ({}-{})",
                page, self.first_page, self.last_page
            )))
        }
    }

    /// Reject chapters the course does not define
    pub fn check_chapter(&self, chapter: i32) -> Result<(), DomainError> {
        if self.chapter(chapter).is_some() || self.is_sentinel_chapter(chapter) {
            Ok(())
        } else {
            Err(DomainError::Validation(format!(
                "chapter {} is not part of the curriculum",
                chapter
            )))
        }
    }

    pub fn chapter(&self, id: i32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn chapter_of_page(&self, page: i32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.pages().contains(&page))
    }

    /// Pages a learner must complete for the chapter, sentinels excluded
    pub fn required_pages(&self, chapter: &Chapter) -> Vec<i32> {
        chapter
            .pages()
            .filter(|p| !self.is_sentinel_page(*p))
            .collect()
    }
}
