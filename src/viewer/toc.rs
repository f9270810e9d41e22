//! Table of contents built from a rendered lesson

use crate::markdown::{HeadingId, LessonDocument};

/// Deepest heading level listed in the outline
pub const MAX_TOC_LEVEL: u8 = 3;

/// One outline entry, tied to its heading by id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: HeadingId,
    pub level: u8,
    pub text: String,
}

/// Outline of the current lesson with at most one active entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOfContents {
    entries: Vec<TocEntry>,
    active: Option<HeadingId>,
}

impl TableOfContents {
    /// Collect level 1-3 headings in document order
    pub fn build(document: &LessonDocument) -> Self {
        let entries = document
            .headings
            .iter()
            .filter(|h| (1..=MAX_TOC_LEVEL).contains(&h.level))
            .map(|h| TocEntry {
                id: h.id.clone(),
                level: h.level,
                text: h.text.clone(),
            })
            .collect();

        Self {
            entries,
            active: None,
        }
    }

    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry(&self, id: &HeadingId) -> Option<&TocEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    /// Ids of all entries, in outline order
    pub fn ids(&self) -> impl Iterator<Item = &HeadingId> {
        self.entries.iter().map(|e| &e.id)
    }

    pub fn active(&self) -> Option<&HeadingId> {
        self.active.as_ref()
    }

    pub fn is_active(&self, id: &HeadingId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Replace the active entry. Returns false (and changes nothing) for unknown ids.
    pub fn set_active(&mut self, id: &HeadingId) -> bool {
        if self.entry(id).is_none() {
            return false;
        }
        self.active = Some(id.clone());
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::LessonRenderer;

    fn toc(markdown: &str) -> TableOfContents {
        TableOfContents::build(&LessonRenderer::new().render(markdown))
    }

    #[test]
    fn test_build_in_document_order() {
        let toc = toc("# Intro\n\ntext\n\n## Setup\n\n## Usage\n");
        let texts: Vec<_> = toc.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Intro", "Setup", "Usage"]);
        let levels: Vec<_> = toc.entries().iter().map(|e| e.level).collect();
        assert_eq!(levels, vec![1, 2, 2]);
    }

    #[test]
    fn test_levels_four_and_deeper_are_skipped() {
        let toc = toc("# A\n\n#### B\n\n### C\n");
        assert_eq!(toc.len(), 2);
        assert_eq!(toc.entries()[1].text, "C");
    }

    #[test]
    fn test_duplicate_text_gives_distinct_entries() {
        let mut toc = toc("## Example\n\n## Example\n");
        assert_eq!(toc.len(), 2);
        let second = toc.entries()[1].id.clone();
        assert_ne!(toc.entries()[0].id, second);

        assert!(toc.set_active(&second));
        assert!(!toc.is_active(&toc.entries()[0].id.clone()));
        assert!(toc.is_active(&second));
    }

    #[test]
    fn test_single_active_entry() {
        let mut toc = toc("# A\n\n## B\n\n## C\n");
        let ids: Vec<_> = toc.ids().cloned().collect();
        for id in &ids {
            toc.set_active(id);
            let active: Vec<_> = ids.iter().filter(|i| toc.is_active(i)).collect();
            assert_eq!(active, vec![id]);
        }
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut toc = toc("# A\n");
        let first = toc.entries()[0].id.clone();
        toc.set_active(&first);

        let stranger = HeadingId {
            index: 99,
            slug: "nope".to_string(),
        };
        assert!(!toc.set_active(&stranger));
        assert!(toc.is_active(&first));
    }

    #[test]
    fn test_empty_document() {
        assert!(toc("just text").is_empty());
    }
}
