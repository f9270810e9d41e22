//! Sidebar state
//!
//! Tracks which course sections are expanded, which lesson is active, and the
//! lesson filter.

use crate::catalog::{Catalog, CourseId, LessonKey, LessonRef};
use std::collections::HashSet;

/// Sidebar state
#[derive(Debug, Clone)]
pub struct SidebarState {
    /// Courses whose lesson list is shown
    pub expanded_courses: HashSet<CourseId>,

    /// Currently active lesson
    pub active_lesson: Option<LessonKey>,

    /// Search/filter input text
    pub filter_text: String,

    /// Whether sidebar is visible
    pub visible: bool,

    /// Sidebar width in pixels
    pub width: u32,

    /// Whether the catalog is loading
    pub is_loading: bool,

    /// Error message from the last catalog load (if any)
    pub error_message: Option<String>,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarState {
    /// Create a new sidebar state; every section starts hidden
    pub fn new() -> Self {
        Self {
            expanded_courses: HashSet::new(),
            active_lesson: None,
            filter_text: String::new(),
            visible: true,
            width: 260,
            is_loading: false,
            error_message: None,
        }
    }

    /// Forget everything tied to the previous catalog
    pub fn reset(&mut self) {
        self.expanded_courses.clear();
        self.active_lesson = None;
        self.filter_text.clear();
        self.error_message = None;
    }

    /// Check if a course section is shown
    pub fn is_expanded(&self, course: CourseId) -> bool {
        self.expanded_courses.contains(&course)
    }

    /// Flip a course section between shown and hidden. Returns the new state.
    pub fn toggle_course(&mut self, course: CourseId) -> bool {
        if self.expanded_courses.remove(&course) {
            false
        } else {
            self.expanded_courses.insert(course);
            true
        }
    }

    /// Expand a course section
    pub fn expand_course(&mut self, course: CourseId) {
        self.expanded_courses.insert(course);
    }

    /// Mark a lesson active, replacing the previous one.
    ///
    /// Returns the lesson to load, or `None` for keys not in the catalog.
    pub fn activate_lesson(&mut self, catalog: &Catalog, key: LessonKey) -> Option<LessonRef> {
        let lesson = catalog.lesson(key)?.clone();
        self.active_lesson = Some(key);
        Some(lesson)
    }

    /// Check if a lesson is the active one
    pub fn is_active(&self, key: LessonKey) -> bool {
        self.active_lesson == Some(key)
    }

    /// Set filter text
    pub fn set_filter(&mut self, text: String) {
        self.filter_text = text;
    }

    /// Clear the filter
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
    }

    pub fn is_filtering(&self) -> bool {
        !self.filter_text.trim().is_empty()
    }

    /// Lessons of a course to list, with their indices.
    ///
    /// A hidden section lists nothing unless a filter is active, in which case
    /// every course shows its matching lessons.
    pub fn visible_lessons<'a>(
        &self,
        catalog: &'a Catalog,
        course: CourseId,
    ) -> Vec<(usize, &'a LessonRef)> {
        let lessons = match catalog.course(course) {
            Some(c) => &c.lessons,
            None => return Vec::new(),
        };

        if self.is_filtering() {
            let needle = self.filter_text.trim().to_lowercase();
            return lessons
                .iter()
                .enumerate()
                .filter(|(_, lesson)| lesson.title.to_lowercase().contains(&needle))
                .collect();
        }

        if self.is_expanded(course) {
            lessons.iter().enumerate().collect()
        } else {
            Vec::new()
        }
    }

    /// Whether a course header is listed at all under the current filter
    pub fn course_matches(&self, catalog: &Catalog, course: CourseId) -> bool {
        !self.is_filtering() || !self.visible_lessons(catalog, course).is_empty()
    }

    /// Toggle visibility
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    /// Set error message
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBase, Course, LessonPath};

    fn catalog() -> Catalog {
        let lesson = |title: &str| {
            LessonRef::new(
                Some(title.to_string()),
                LessonPath::Local(format!("/c/{}.md", title).into()),
            )
        };
        Catalog {
            title: "Cursos".to_string(),
            base: CatalogBase::None,
            courses: vec![
                Course {
                    title: "Rust".to_string(),
                    lessons: vec![lesson("Intro"), lesson("Ownership")],
                },
                Course {
                    title: "Python".to_string(),
                    lessons: vec![lesson("Basics")],
                },
            ],
        }
    }

    #[test]
    fn test_sections_start_hidden() {
        let sidebar = SidebarState::new();
        assert!(!sidebar.is_expanded(CourseId(0)));
        assert!(sidebar.visible_lessons(&catalog(), CourseId(0)).is_empty());
    }

    #[test]
    fn test_toggle_parity() {
        for n in 0..7 {
            let mut sidebar = SidebarState::new();
            for _ in 0..n {
                sidebar.toggle_course(CourseId(1));
            }
            assert_eq!(sidebar.is_expanded(CourseId(1)), n % 2 == 1, "after {} toggles", n);
            assert!(!sidebar.is_expanded(CourseId(0)));
        }
    }

    #[test]
    fn test_single_active_lesson() {
        let catalog = catalog();
        let mut sidebar = SidebarState::new();

        let lesson = sidebar.activate_lesson(&catalog, LessonKey::new(0, 1)).unwrap();
        assert_eq!(lesson.title, "Ownership");

        sidebar.activate_lesson(&catalog, LessonKey::new(1, 0));
        let active: Vec<_> = (0..2)
            .flat_map(|c| (0..2).map(move |l| LessonKey::new(c, l)))
            .filter(|k| sidebar.is_active(*k))
            .collect();
        assert_eq!(active, vec![LessonKey::new(1, 0)]);
    }

    #[test]
    fn test_unknown_lesson_is_ignored() {
        let catalog = catalog();
        let mut sidebar = SidebarState::new();
        sidebar.activate_lesson(&catalog, LessonKey::new(0, 0));

        assert!(sidebar.activate_lesson(&catalog, LessonKey::new(5, 0)).is_none());
        assert!(sidebar.is_active(LessonKey::new(0, 0)));
    }

    #[test]
    fn test_filter_shows_matches_in_hidden_sections() {
        let catalog = catalog();
        let mut sidebar = SidebarState::new();
        sidebar.set_filter("OWN".to_string());

        let rust = sidebar.visible_lessons(&catalog, CourseId(0));
        assert_eq!(rust.len(), 1);
        assert_eq!(rust[0].0, 1);
        assert!(!sidebar.course_matches(&catalog, CourseId(1)));

        sidebar.clear_filter();
        assert!(sidebar.course_matches(&catalog, CourseId(1)));
        assert!(!sidebar.is_expanded(CourseId(0)));
    }
}
