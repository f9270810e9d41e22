//! Heading visibility tracking for outline highlighting
//!
//! A [`ScrollObserver`] is armed over the outline's headings each time a
//! lesson is shown. Every viewport change is compared against the previous
//! one; headings that crossed the visibility threshold form a notification
//! batch, and the topmost heading of a non-empty batch becomes active.
//!
//! Each arming gets a new [`ObserverGeneration`]. Viewport reports carry the
//! generation they were produced under, so reports queued before a reload
//! cannot touch the new outline.

use super::layout::{DocumentLayout, Region, Viewport};
use crate::markdown::HeadingId;
use std::collections::HashSet;
use std::fmt;

/// Identifies one arming of the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ObserverGeneration(pub u64);

impl fmt::Display for ObserverGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Armed {
    generation: ObserverGeneration,
    threshold: f32,
    targets: Vec<(HeadingId, Region)>,
    visible: HashSet<HeadingId>,
}

/// Scroll-sync observer with an explicit arm/disconnect lifecycle
#[derive(Debug, Clone, Default)]
pub struct ScrollObserver {
    last_generation: ObserverGeneration,
    armed: Option<Armed>,
}

impl ScrollObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `targets` in `layout`. Any previous arming is disconnected first.
    ///
    /// Targets missing from the layout are skipped.
    pub fn arm<'a>(
        &mut self,
        layout: &DocumentLayout,
        targets: impl IntoIterator<Item = &'a HeadingId>,
        threshold: f32,
    ) -> ObserverGeneration {
        self.disconnect();

        self.last_generation = ObserverGeneration(self.last_generation.0 + 1);
        let targets: Vec<_> = targets
            .into_iter()
            .filter_map(|id| layout.heading(id).map(|region| (id.clone(), region)))
            .collect();

        log::debug!(
            "Scroll observer {} armed over {} headings (threshold {})",
            self.last_generation,
            targets.len(),
            threshold
        );

        self.armed = Some(Armed {
            generation: self.last_generation,
            threshold: threshold.clamp(0.0, 1.0),
            targets,
            visible: HashSet::new(),
        });
        self.last_generation
    }

    /// Stop observing. Reports for the old generation are ignored afterwards.
    pub fn disconnect(&mut self) {
        if let Some(armed) = self.armed.take() {
            log::debug!("Scroll observer {} disconnected", armed.generation);
        }
    }

    /// Generation of the live arming, if any
    pub fn generation(&self) -> Option<ObserverGeneration> {
        self.armed.as_ref().map(|a| a.generation)
    }

    /// Process a viewport report. Returns the heading to activate, if the
    /// report is current and some heading crossed into visibility.
    pub fn observe(
        &mut self,
        generation: ObserverGeneration,
        viewport: &Viewport,
    ) -> Option<HeadingId> {
        let armed = match self.armed.as_mut() {
            Some(armed) if armed.generation == generation => armed,
            _ => {
                log::trace!("Ignoring viewport report from observer {}", generation);
                return None;
            }
        };

        let mut batch: Vec<(&HeadingId, f32)> = Vec::new();
        let mut now_visible = HashSet::new();
        for (id, region) in &armed.targets {
            if is_visible(region, viewport, armed.threshold) {
                now_visible.insert(id.clone());
                if !armed.visible.contains(id) {
                    batch.push((id, region.top));
                }
            }
        }

        let chosen = batch
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id.clone());
        armed.visible = now_visible;
        chosen
    }
}

/// A heading counts as visible when it intersects the viewport by at least
/// `threshold` of its height
fn is_visible(region: &Region, viewport: &Viewport, threshold: f32) -> bool {
    let fraction = region.visible_fraction(viewport);
    fraction > 0.0 && fraction >= threshold
}
