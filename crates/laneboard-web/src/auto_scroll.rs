#![forbid(unsafe_code)]

//! Edge auto-scroll for the lane strip.
//!
//! The host owns the animation-frame clock. [`AutoScroller::start`] hands out
//! a [`FrameToken`]; the host calls [`AutoScroller::on_frame`] with it on the
//! next frame, and every tick that finds the loop still running returns the
//! token for the following frame. [`AutoScroller::stop`] bumps the generation,
//! so any token still queued by the host becomes stale and never scrolls.
//!
//! Each tick re-resolves the scroll target under the live pointer, builds the
//! fixed-size preview rectangle around it, and scrolls toward whichever edge
//! the preview is inside the threshold of. Containers are tried nearest
//! first; one that cannot move toward that edge hands over to its ancestors.
//!
//!
//! ```text
//! speed = min + (max - min) * clamp((threshold - distance) / threshold, 0, 1)
//! ```

use laneboard_core::{AutoScrollConfig, BoardConfig, Rect};
use serde::Serialize;

use crate::live_pointer::LivePointer;
use crate::surface::{BoardSurface, ElementId, ScrollMetrics, scroll_containers};

/// Pixels per frame for a preview edge `distance` px from the target edge.
///
/// Zero at or beyond the threshold; linear from `min_speed_px` at the
/// threshold to `max_speed_px` at (and past) the edge.
#[must_use]
pub fn edge_speed(distance: f64, config: &AutoScrollConfig) -> f64 {
    let threshold = config.threshold_px;
    if distance.is_nan() || threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    let t = ((threshold - distance) / threshold).clamp(0.0, 1.0);
    config.min_speed_px + (config.max_speed_px - config.min_speed_px) * t
}

/// Signed scroll delta for one frame, or `None` when neither edge qualifies.
///
/// When both edges are inside the threshold (a preview wider than the
/// target), the nearer edge wins. The delta is clamped to the remaining
/// scroll range.
#[must_use]
pub fn edge_scroll_step(
    preview: &Rect,
    metrics: &ScrollMetrics,
    config: &AutoScrollConfig,
) -> Option<f64> {
    let left_distance = preview.left() - metrics.viewport.left();
    let right_distance = metrics.viewport.right() - preview.right();

    let left = (metrics.can_scroll_left() && left_distance < config.threshold_px)
        .then(|| -edge_speed(left_distance, config).min(metrics.scroll_left));
    let right = (metrics.can_scroll_right() && right_distance < config.threshold_px).then(|| {
        edge_speed(right_distance, config).min(metrics.max_scroll_left() - metrics.scroll_left)
    });

    let step = match (left, right) {
        (Some(l), Some(r)) => {
            if left_distance <= right_distance {
                l
            } else {
                r
            }
        }
        (l, r) => l.or(r)?,
    };
    (step != 0.0).then_some(step)
}

// ---------------------------------------------------------------------------
// Frame loop
// ---------------------------------------------------------------------------

/// Ticket for one scheduled animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameToken {
    generation: u64,
    frame: u64,
}

impl FrameToken {
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn frame(self) -> u64 {
        self.frame
    }
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FrameOutcome {
    Scrolled {
        target: ElementId,
        delta: f64,
        next: FrameToken,
    },
    /// Running, but nothing to scroll this frame.
    Idle { next: FrameToken },
    /// The token belongs to a stopped loop or was already consumed.
    Stale,
}

impl FrameOutcome {
    /// Token for the next frame, if the loop keeps running.
    #[must_use]
    pub const fn next(&self) -> Option<FrameToken> {
        match self {
            Self::Scrolled { next, .. } | Self::Idle { next } => Some(*next),
            Self::Stale => None,
        }
    }
}

/// Self-rescheduling scroll loop driven by the live pointer.
#[derive(Debug, Clone)]
pub struct AutoScroller {
    pointer: LivePointer,
    generation: u64,
    pending: Option<FrameToken>,
    frames_ticked: u64,
    total_scrolled: f64,
}

impl AutoScroller {
    #[must_use]
    pub fn new(pointer: LivePointer) -> Self {
        Self {
            pointer,
            generation: 0,
            pending: None,
            frames_ticked: 0,
            total_scrolled: 0.0,
        }
    }

    /// Begin the loop. Returns the first frame token, or `None` if a loop is
    /// already running.
    pub fn start(&mut self) -> Option<FrameToken> {
        if self.pending.is_some() {
            return None;
        }
        self.generation = self.generation.wrapping_add(1);
        let token = FrameToken {
            generation: self.generation,
            frame: 0,
        };
        self.pending = Some(token);
        tracing::debug!(
            target: "laneboard.scroll",
            generation = self.generation,
            "auto-scroll started"
        );
        Some(token)
    }

    /// Stop the loop. Any outstanding token goes stale. No-op when stopped.
    pub fn stop(&mut self) {
        if self.pending.take().is_some() {
            self.generation = self.generation.wrapping_add(1);
            tracing::debug!(
                target: "laneboard.scroll",
                frames = self.frames_ticked,
                "auto-scroll stopped"
            );
        }
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Token the host should deliver on its next animation frame.
    #[must_use]
    pub const fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    #[must_use]
    pub const fn frames_ticked(&self) -> u64 {
        self.frames_ticked
    }

    /// Sum of absolute scroll deltas applied.
    #[must_use]
    pub const fn total_scrolled(&self) -> f64 {
        self.total_scrolled
    }

    /// Run one tick for `token`.
    pub fn on_frame<S: BoardSurface + ?Sized>(
        &mut self,
        token: FrameToken,
        surface: &mut S,
        config: &BoardConfig,
    ) -> FrameOutcome {
        if self.pending != Some(token) {
            return FrameOutcome::Stale;
        }
        self.frames_ticked = self.frames_ticked.saturating_add(1);
        let next = FrameToken {
            generation: token.generation,
            frame: token.frame.wrapping_add(1),
        };
        self.pending = Some(next);

        let Some(pointer) = self.pointer.get() else {
            return FrameOutcome::Idle { next };
        };
        let preview = Rect::centered_at(pointer, config.preview.width, config.preview.height);
        let found = scroll_containers(&*surface, pointer).find_map(|(el, metrics)| {
            edge_scroll_step(&preview, &metrics, &config.auto_scroll).map(|step| (el, step))
        });
        let Some((target, step)) = found else {
            return FrameOutcome::Idle { next };
        };
        let delta = surface.scroll_by(target, step);
        if delta == 0.0 {
            return FrameOutcome::Idle { next };
        }
        self.total_scrolled += delta.abs();
        tracing::trace!(
            target: "laneboard.scroll",
            element = target.get(),
            delta,
            frame = token.frame,
            "edge scroll"
        );
        FrameOutcome::Scrolled {
            target,
            delta,
            next,
        }
    }
}
