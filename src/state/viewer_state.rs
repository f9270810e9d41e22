//! Content pane state
//!
//! Owns the rendered lesson and everything derived from it: code blocks,
//! outline, layout estimate and scroll observer. A lesson load runs in two
//! halves. [`ViewerState::begin_load`] shows the placeholder and stamps a new
//! [`LoadGeneration`]; [`ViewerState::finish_load`] applies the fetch result
//! only if no newer load started in between.

use crate::catalog::LessonRef;
use crate::config::ViewerConfig;
use crate::error::{FetchError, FetchResult};
use crate::markdown::{CodeHighlighter, HeadingId, LessonDocument, LessonRenderer};
use crate::viewer::{
    CodeBlocks, DocumentLayout, LayoutMetrics, ObserverGeneration, ScrollObserver, SmoothScroll,
    TableOfContents, Viewport,
};
use std::fmt;
use std::time::{Duration, Instant};

/// Distance between a scroll report and the animated offset that counts as
/// the user taking over
const USER_SCROLL_TOLERANCE: f32 = 2.0;

/// Identifies one lesson load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LoadGeneration(pub u64);

impl fmt::Display for LoadGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the content pane shows
#[derive(Debug, Clone, Default)]
pub enum ContentState {
    /// Nothing selected yet
    #[default]
    Idle,
    /// Placeholder while the lesson is fetched
    Loading { lesson: LessonRef },
    /// Rendered lesson
    Loaded {
        lesson: LessonRef,
        document: LessonDocument,
    },
    /// Inline error in place of the lesson
    Failed { lesson: LessonRef, error: FetchError },
}

/// Handed to the fetch task and back with its result
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: LoadGeneration,
    pub lesson: LessonRef,
}

/// Result of applying a fetch completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Shown,
    Failed,
    /// A newer load started; the completion was dropped
    Stale,
}

/// Content pane state
#[derive(Debug, Clone)]
pub struct ViewerState {
    pub content: ContentState,
    generation: LoadGeneration,
    pub toc: TableOfContents,
    pub observer: ScrollObserver,
    pub code_blocks: CodeBlocks,
    pub layout: DocumentLayout,
    pub viewport: Viewport,
    scroll: Option<SmoothScroll>,
    /// Offset most recently applied by the animation
    applied_offset: Option<f32>,
    metrics: LayoutMetrics,
    threshold: f32,
}

impl ViewerState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            content: ContentState::Idle,
            generation: LoadGeneration::default(),
            toc: TableOfContents::default(),
            observer: ScrollObserver::new(),
            code_blocks: CodeBlocks::default(),
            layout: DocumentLayout::default(),
            viewport: Viewport::default(),
            scroll: None,
            applied_offset: None,
            metrics: LayoutMetrics::from_config(config, 1.0),
            threshold: config.scroll_threshold.clamp(0.0, 1.0),
        }
    }

    pub fn generation(&self) -> LoadGeneration {
        self.generation
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }

    pub fn document(&self) -> Option<&LessonDocument> {
        match &self.content {
            ContentState::Loaded { document, .. } => Some(document),
            _ => None,
        }
    }

    /// Lesson shown, loading or failed
    pub fn lesson(&self) -> Option<&LessonRef> {
        match &self.content {
            ContentState::Idle => None,
            ContentState::Loading { lesson }
            | ContentState::Loaded { lesson, .. }
            | ContentState::Failed { lesson, .. } => Some(lesson),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.content, ContentState::Loading { .. })
    }

    /// Show the placeholder for `lesson` and start a new generation.
    ///
    /// The previous document and everything derived from it is dropped here,
    /// including the observer.
    pub fn begin_load(&mut self, lesson: LessonRef) -> LoadTicket {
        self.generation = LoadGeneration(self.generation.0 + 1);
        log::info!("Loading lesson '{}' ({})", lesson.title, self.generation);

        self.observer.disconnect();
        self.toc.clear();
        self.code_blocks = CodeBlocks::default();
        self.layout = DocumentLayout::default();
        self.cancel_scroll();
        self.viewport.offset_y = 0.0;
        self.content = ContentState::Loading {
            lesson: lesson.clone(),
        };

        LoadTicket {
            generation: self.generation,
            lesson,
        }
    }

    /// Apply a fetch result: render, enhance code blocks, build the outline,
    /// and re-arm the observer. Stale completions are discarded.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: FetchResult<String>,
        renderer: &LessonRenderer,
        highlighter: &CodeHighlighter,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale load of '{}' ({}, current {})",
                ticket.lesson.title,
                ticket.generation,
                self.generation
            );
            return LoadOutcome::Stale;
        }

        let markdown = match result {
            Ok(markdown) => markdown,
            Err(error) => {
                log::warn!("Lesson '{}' failed to load: {}", ticket.lesson.title, error);
                self.content = ContentState::Failed {
                    lesson: ticket.lesson,
                    error,
                };
                return LoadOutcome::Failed;
            }
        };

        let document = renderer.render(&markdown);
        self.code_blocks = CodeBlocks::enhance(&document, highlighter, self.generation.0);
        self.toc = TableOfContents::build(&document);
        self.content = ContentState::Loaded {
            lesson: ticket.lesson,
            document,
        };
        self.rearm();

        log::debug!(
            "Lesson shown: {} headings in outline, {} code blocks",
            self.toc.len(),
            self.code_blocks.len()
        );
        LoadOutcome::Shown
    }

    /// Re-estimate the layout of the current document and re-arm the observer
    fn rearm(&mut self) {
        let layout = match self.document() {
            Some(document) => DocumentLayout::estimate(document, self.metrics),
            None => {
                self.observer.disconnect();
                return;
            }
        };
        self.layout = layout;
        self.observer
            .arm(&self.layout, self.toc.ids(), self.threshold);
    }

    /// Change font metrics (zoom, config reload)
    pub fn set_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics.with_width(self.metrics.width);
        self.rearm();
    }

    /// Handle a scroll or resize report from the content pane.
    ///
    /// Returns the heading whose outline entry became active. A viewport
    /// that has not been laid out yet (zero size) is ignored.
    pub fn on_viewport(
        &mut self,
        generation: ObserverGeneration,
        viewport: Viewport,
    ) -> Option<HeadingId> {
        if self.observer.generation() != Some(generation) {
            return None;
        }
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            log::trace!("Ignoring unsized viewport {:?}", viewport);
            return None;
        }

        let diverged = self
            .applied_offset
            .is_some_and(|applied| (viewport.offset_y - applied).abs() > USER_SCROLL_TOLERANCE);
        if self.scroll.is_some() && diverged {
            log::debug!("Smooth scroll interrupted at {}", viewport.offset_y);
            self.cancel_scroll();
        }
        self.viewport = viewport;

        let text_width = (viewport.width - 2.0 * self.metrics.padding).max(1.0);
        if (text_width - self.metrics.width).abs() > 1.0 {
            self.metrics = self.metrics.with_width(text_width);
            self.rearm();
        }

        let current = self.observer.generation()?;
        let heading = self.observer.observe(current, &self.viewport)?;
        self.toc.set_active(&heading).then_some(heading)
    }

    /// Start scrolling toward a heading. Returns the target offset.
    ///
    /// Only the scroll position changes; the document is untouched.
    pub fn scroll_to_heading(
        &mut self,
        id: &HeadingId,
        duration: Duration,
        now: Instant,
    ) -> Option<f32> {
        let target = self.layout.scroll_target(id, self.viewport.height)?;
        if duration.is_zero() {
            self.cancel_scroll();
        } else {
            self.scroll = Some(SmoothScroll::new(self.viewport.offset_y, target, duration, now));
            self.applied_offset = Some(self.viewport.offset_y);
        }
        Some(target)
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_some()
    }

    /// Advance the scroll animation; returns the offset to apply
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        let scroll = self.scroll?;
        let offset = scroll.position(now);
        if scroll.is_finished(now) {
            self.cancel_scroll();
        } else {
            self.applied_offset = Some(offset);
        }
        Some(offset)
    }

    /// Stop any animation, e.g. when the user scrolls by hand
    pub fn cancel_scroll(&mut self) {
        self.scroll = None;
        self.applied_offset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LessonPath;
    use std::path::PathBuf;

    const LESSON: &str = "# Intro\n\nHola.\n\n## Setup\n\n```sh\ncargo run\n```\n\n## Usage\n";

    fn lesson(name: &str) -> LessonRef {
        LessonRef::new(None, LessonPath::Local(PathBuf::from(format!("/l/{}.md", name))))
    }

    fn viewer() -> ViewerState {
        ViewerState::new(&ViewerConfig::default())
    }

    fn load(viewer: &mut ViewerState, markdown: &str) -> LoadOutcome {
        let ticket = viewer.begin_load(lesson("a"));
        viewer.finish_load(
            ticket,
            Ok(markdown.to_string()),
            &LessonRenderer::new(),
            &CodeHighlighter::default(),
        )
    }

    #[test]
    fn test_placeholder_before_fetch_resolves() {
        let mut viewer = viewer();
        let ticket = viewer.begin_load(lesson("a"));
        assert!(viewer.is_loading());
        assert_eq!(ticket.generation, viewer.generation());
        assert_eq!(viewer.lesson().map(|l| l.title.as_str()), Some("A"));
    }

    #[test]
    fn test_successful_load_runs_pipeline() {
        let mut viewer = viewer();
        assert_eq!(load(&mut viewer, LESSON), LoadOutcome::Shown);

        assert!(viewer.document().is_some());
        assert_eq!(viewer.toc.len(), 3);
        assert_eq!(viewer.code_blocks.len(), 1);
        assert_eq!(viewer.layout.headings.len(), 3);
        assert!(viewer.observer.generation().is_some());
    }

    #[test]
    fn test_failed_load_is_shown_inline() {
        let mut viewer = viewer();
        let ticket = viewer.begin_load(lesson("missing"));
        let error = FetchError::NotFound {
            path: PathBuf::from("/l/missing.md"),
        };
        let outcome = viewer.finish_load(
            ticket,
            Err(error.clone()),
            &LessonRenderer::new(),
            &CodeHighlighter::default(),
        );

        assert_eq!(outcome, LoadOutcome::Failed);
        assert!(matches!(&viewer.content, ContentState::Failed { error: e, .. } if *e == error));
        assert!(viewer.toc.is_empty());
        assert!(viewer.observer.generation().is_none());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut viewer = viewer();
        let first = viewer.begin_load(lesson("first"));
        let second = viewer.begin_load(lesson("second"));

        let renderer = LessonRenderer::new();
        let highlighter = CodeHighlighter::default();
        let outcome = viewer.finish_load(first, Ok("# First".to_string()), &renderer, &highlighter);
        assert_eq!(outcome, LoadOutcome::Stale);
        assert!(viewer.is_loading());

        viewer.finish_load(second, Ok("# Second".to_string()), &renderer, &highlighter);
        assert_eq!(viewer.document().and_then(|d| d.title()), Some("Second"));
    }

    #[test]
    fn test_reload_disconnects_previous_observer() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        let old = viewer.observer.generation().unwrap();

        load(&mut viewer, LESSON);
        let new = viewer.observer.generation().unwrap();
        assert_ne!(old, new);

        let viewport = Viewport {
            offset_y: 0.0,
            height: 400.0,
            width: viewer.metrics().width + 2.0 * viewer.metrics().padding,
        };
        assert_eq!(viewer.on_viewport(old, viewport), None);
        assert!(viewer.toc.active().is_none());
    }

    #[test]
    fn test_visible_heading_activates_entry() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        let generation = viewer.observer.generation().unwrap();

        let viewport = Viewport {
            offset_y: 0.0,
            height: 60.0,
            width: viewer.metrics().width + 2.0 * viewer.metrics().padding,
        };
        let activated = viewer.on_viewport(generation, viewport).unwrap();
        assert_eq!(activated.slug, "intro");
        assert!(viewer.toc.is_active(&activated));
    }

    #[test]
    fn test_resize_relayouts_and_keeps_tracking() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        let generation = viewer.observer.generation().unwrap();

        let viewport = Viewport {
            offset_y: 0.0,
            height: 60.0,
            width: 400.0,
        };
        assert!(viewer.on_viewport(generation, viewport).is_some());
        assert_eq!(viewer.metrics().width, 400.0 - 2.0 * viewer.metrics().padding);
    }

    #[test]
    fn test_first_load_ignores_unsized_viewport() {
        let mut viewer = viewer();
        let width = viewer.metrics().width;
        load(&mut viewer, LESSON);
        let generation = viewer.observer.generation().unwrap();
        let setup = viewer.toc.entries()[1].id.clone();
        let before = viewer.layout.heading(&setup);

        let unsized_viewport = viewer.viewport;
        assert_eq!(unsized_viewport, Viewport::default());
        assert_eq!(viewer.on_viewport(generation, unsized_viewport), None);

        assert_eq!(viewer.metrics().width, width);
        assert_eq!(viewer.layout.heading(&setup), before);
        assert_eq!(viewer.observer.generation(), Some(generation));
    }

    #[test]
    fn test_user_scroll_interrupts_animation() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        let generation = viewer.observer.generation().unwrap();
        let viewport = Viewport {
            offset_y: 0.0,
            height: 50.0,
            width: viewer.metrics().width + 2.0 * viewer.metrics().padding,
        };
        viewer.on_viewport(generation, viewport);
        let usage = viewer.toc.entries()[2].id.clone();

        let now = Instant::now();
        viewer
            .scroll_to_heading(&usage, Duration::from_millis(400), now)
            .unwrap();
        let offset = viewer.tick(now + Duration::from_millis(100)).unwrap();
        assert!(offset > 0.0);

        // The animation's own step keeps it running
        viewer.on_viewport(generation, Viewport { offset_y: offset, ..viewport });
        assert!(viewer.is_scrolling());

        viewer.on_viewport(
            generation,
            Viewport {
                offset_y: offset + 40.0,
                ..viewport
            },
        );
        assert!(!viewer.is_scrolling());
        assert_eq!(viewer.tick(now + Duration::from_millis(200)), None);
    }

    #[test]
    fn test_toc_click_does_not_mutate_document() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        viewer.viewport.height = 50.0;
        let before = viewer.document().cloned();
        let usage = viewer.toc.entries()[2].id.clone();

        let now = Instant::now();
        let target = viewer
            .scroll_to_heading(&usage, Duration::from_millis(200), now)
            .unwrap();
        assert!(target > 0.0);
        assert!(viewer.is_scrolling());

        assert_eq!(viewer.tick(now + Duration::from_millis(500)), Some(target));
        assert!(!viewer.is_scrolling());
        assert_eq!(viewer.document().cloned(), before);
    }

    #[test]
    fn test_scroll_without_animation_jumps() {
        let mut viewer = viewer();
        load(&mut viewer, LESSON);
        let setup = viewer.toc.entries()[1].id.clone();

        assert!(viewer
            .scroll_to_heading(&setup, Duration::ZERO, Instant::now())
            .is_some());
        assert!(!viewer.is_scrolling());
    }
}
