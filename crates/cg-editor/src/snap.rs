//! Page-axis snapping for dragged elements.
//!
//! Each axis has three stops: the two page edges and the page center. A
//! dragged element offers three candidates per axis (start edge, center,
//! end edge). When a candidate lies within the threshold of a stop, the
//! element is shifted so that candidate sits exactly on the stop and a
//! guide line is reported for that stop.

use cg_core::model::{Bounds, PageSize};
use serde::Deserialize;
use smallvec::SmallVec;

/// Default snap distance in canvas pixels.
pub const DEFAULT_SNAP_THRESHOLD: f32 = 10.0;

/// How to choose between several stops within the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapPolicy {
    /// Smallest distance wins; ties go to the earlier stop.
    #[default]
    Closest,
    /// First hit in stop order, then start/center/end candidate order.
    FirstMatch,
}

/// A guide line to draw while a snap is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Guide {
    /// Vertical line at this x.
    Vertical(f32),
    /// Horizontal line at this y.
    Horizontal(f32),
}

/// Outcome of snapping one position. At most one guide per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub x: f32,
    pub y: f32,
    pub guides: SmallVec<[Guide; 2]>,
}

impl SnapResult {
    pub fn snapped_x(&self) -> bool {
        self.guides.iter().any(|g| matches!(g, Guide::Vertical(_)))
    }

    pub fn snapped_y(&self) -> bool {
        self.guides.iter().any(|g| matches!(g, Guide::Horizontal(_)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub threshold: f32,
    pub policy: SnapPolicy,
}

impl Default for SnapEngine {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SNAP_THRESHOLD,
            policy: SnapPolicy::Closest,
        }
    }
}

impl SnapEngine {
    pub fn new(threshold: f32, policy: SnapPolicy) -> Self {
        Self { threshold, policy }
    }

    /// Snap `bounds` (the proposed position) against `page`.
    pub fn snap(&self, bounds: Bounds, page: PageSize) -> SnapResult {
        let mut guides = SmallVec::new();

        let x = match self.snap_axis(bounds.x, bounds.width, page.width) {
            Some((x, stop)) => {
                guides.push(Guide::Vertical(stop));
                x
            }
            None => bounds.x,
        };
        let y = match self.snap_axis(bounds.y, bounds.height, page.height) {
            Some((y, stop)) => {
                guides.push(Guide::Horizontal(stop));
                y
            }
            None => bounds.y,
        };

        SnapResult { x, y, guides }
    }

    /// Returns the adjusted start coordinate and the stop it snapped to.
    fn snap_axis(&self, start: f32, size: f32, extent: f32) -> Option<(f32, f32)> {
        let stops = [0.0, extent / 2.0, extent];
        let offsets = [0.0, size / 2.0, size];

        let mut best: Option<(f32, f32, f32)> = None; // (distance, new_start, stop)
        for stop in stops {
            for offset in offsets {
                let distance = (start + offset - stop).abs();
                if distance > self.threshold {
                    continue;
                }
                let hit = (distance, stop - offset, stop);
                match self.policy {
                    SnapPolicy::FirstMatch => return Some((hit.1, hit.2)),
                    SnapPolicy::Closest => {
                        if best.is_none_or(|(d, _, _)| distance < d) {
                            best = Some(hit);
                        }
                    }
                }
            }
        }
        best.map(|(_, new_start, stop)| (new_start, stop))
    }
}

// ─── Drag session ────────────────────────────────────────────────────────

/// Live drag state: the guides currently shown.
#[derive(Debug, Clone, Default)]
pub struct DragSession {
    active: bool,
    guides: SmallVec<[Guide; 2]>,
}

impl DragSession {
    pub fn begin(&mut self) {
        self.active = true;
        self.guides.clear();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Record the latest snap outcome.
    pub fn update(&mut self, result: &SnapResult) {
        if self.active {
            self.guides = result.guides.clone();
        }
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn end(&mut self) {
        self.active = false;
        self.guides.clear();
    }

    pub fn cancel(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: PageSize = PageSize::new(1000.0, 700.0);

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Bounds {
        Bounds {
            x,
            y,
            width: w,
            height: h,
        }
    }

    #[test]
    fn center_snaps_to_page_center() {
        let r = SnapEngine::default().snap(rect(448.0, 200.0, 100.0, 50.0), PAGE);
        assert_eq!(r.x, 450.0);
        assert_eq!(r.y, 200.0);
        assert_eq!(r.guides.as_slice(), &[Guide::Vertical(500.0)]);
    }

    #[test]
    fn outside_threshold_does_not_snap() {
        // center at 489: 11 px away
        let r = SnapEngine::default().snap(rect(439.0, 200.0, 100.0, 50.0), PAGE);
        assert_eq!((r.x, r.y), (439.0, 200.0));
        assert!(r.guides.is_empty());
    }

    #[test]
    fn threshold_is_inclusive() {
        let r = SnapEngine::default().snap(rect(440.0, 200.0, 100.0, 50.0), PAGE);
        assert_eq!(r.x, 450.0);
        assert!(r.snapped_x());
    }

    #[test]
    fn both_axes_snap() {
        let r = SnapEngine::default().snap(rect(4.0, 643.0, 100.0, 50.0), PAGE);
        assert_eq!((r.x, r.y), (0.0, 650.0));
        assert_eq!(
            r.guides.as_slice(),
            &[Guide::Vertical(0.0), Guide::Horizontal(700.0)]
        );
    }

    #[test]
    fn closest_beats_first_match() {
        // 20-wide element near the center: left edge 8 px from 500,
        // center 2 px from 500. Closest aligns the center.
        let bounds = rect(492.0, 300.0, 20.0, 20.0);
        let closest = SnapEngine::default().snap(bounds, PAGE);
        assert_eq!(closest.x, 490.0);

        let first = SnapEngine::new(10.0, SnapPolicy::FirstMatch).snap(bounds, PAGE);
        assert_eq!(first.x, 500.0);
    }

    #[test]
    fn drag_session_clears_guides() {
        let engine = SnapEngine::default();
        let mut drag = DragSession::default();
        drag.begin();
        drag.update(&engine.snap(rect(448.0, 200.0, 100.0, 50.0), PAGE));
        assert_eq!(drag.guides().len(), 1);
        drag.cancel();
        assert!(drag.guides().is_empty());
        assert!(!drag.is_active());
    }
}
