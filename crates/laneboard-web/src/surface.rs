#![forbid(unsafe_code)]

//! Host surface abstraction: hit-testing, scroll containers and page-level
//! interaction suppression.
//!
//! A browser host implements [`BoardSurface`] over the DOM
//! (`elementFromPoint`, `parentElement`, a `data-lane-id` attribute,
//! `scrollLeft`/`scrollWidth`/`clientWidth`, and body-level
//! `overflow`/`user-select` toggles). [`SceneTree`] is an in-memory
//! implementation with the same semantics, used by tests and the replay
//! harness.

use laneboard_core::{LaneId, Point, Rect};
use serde::Serialize;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(u32);

impl ElementId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Page-wide scrolling and text-selection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageInteraction {
    #[default]
    Normal,
    /// Page scrolling and text selection disabled for the duration of a touch
    /// drag.
    Suppressed,
}

/// Horizontal scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Horizontal scroll state of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollMetrics {
    /// Visible box of the element, in page coordinates.
    pub viewport: Rect,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub client_width: f64,
    /// Whether the element's horizontal overflow style lets it scroll.
    pub overflow_x_scrollable: bool,
}

impl ScrollMetrics {
    #[must_use]
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    /// Content overflows horizontally and the element may scroll it.
    #[must_use]
    pub fn is_scrollable(&self) -> bool {
        self.overflow_x_scrollable && self.scroll_width > self.client_width
    }

    #[must_use]
    pub fn can_scroll_left(&self) -> bool {
        self.is_scrollable() && self.scroll_left > 0.0
    }

    #[must_use]
    pub fn can_scroll_right(&self) -> bool {
        self.is_scrollable() && self.scroll_left < self.max_scroll_left()
    }

    #[must_use]
    pub fn can_scroll(&self, direction: ScrollDirection) -> bool {
        match direction {
            ScrollDirection::Left => self.can_scroll_left(),
            ScrollDirection::Right => self.can_scroll_right(),
        }
    }
}

/// Host operations the interaction layer needs.
pub trait BoardSurface {
    /// Topmost interactive element under `point`. The floating drag preview is
    /// never returned.
    fn element_at(&self, point: Point) -> Option<ElementId>;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    /// Lane identifier carried by `element` itself (not its ancestors).
    fn lane_of(&self, element: ElementId) -> Option<LaneId>;

    fn scroll_metrics(&self, element: ElementId) -> Option<ScrollMetrics>;

    /// Scroll `element` horizontally by `dx`, returning the delta actually
    /// applied after clamping.
    fn scroll_by(&mut self, element: ElementId, dx: f64) -> f64;

    fn set_page_interaction(&mut self, mode: PageInteraction);
}

/// `element` followed by its ancestors, nearest first.
pub fn ancestors<S: BoardSurface + ?Sized>(
    surface: &S,
    element: ElementId,
) -> impl Iterator<Item = ElementId> + '_ {
    std::iter::successors(Some(element), move |&el| surface.parent(el))
}

/// Lane under `point`, found through the element hierarchy.
pub fn resolve_lane_at<S: BoardSurface + ?Sized>(surface: &S, point: Point) -> Option<LaneId> {
    let element = surface.element_at(point)?;
    ancestors(surface, element).find_map(|el| surface.lane_of(el))
}

/// Scrollable containers around the element under `point`, nearest first.
pub fn scroll_containers<S: BoardSurface + ?Sized>(
    surface: &S,
    point: Point,
) -> impl Iterator<Item = (ElementId, ScrollMetrics)> + '_ {
    surface
        .element_at(point)
        .into_iter()
        .flat_map(move |element| ancestors(surface, element))
        .filter_map(move |el| {
            surface
                .scroll_metrics(el)
                .filter(ScrollMetrics::is_scrollable)
                .map(|metrics| (el, metrics))
        })
}

/// Nearest ancestor (or self) of the element under `point` that can still
/// scroll toward `direction`.
pub fn resolve_scroll_target<S: BoardSurface + ?Sized>(
    surface: &S,
    point: Point,
    direction: ScrollDirection,
) -> Option<(ElementId, ScrollMetrics)> {
    scroll_containers(surface, point).find(|(_, metrics)| metrics.can_scroll(direction))
}

// ---------------------------------------------------------------------------
// SceneTree
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct SceneNode {
    parent: Option<ElementId>,
    /// Layout box with every ancestor scrolled to zero.
    rect: Rect,
    lane: Option<LaneId>,
    z_index: i32,
    interactive: bool,
    scroll: Option<NodeScroll>,
}

#[derive(Debug, Clone, Copy)]
struct NodeScroll {
    scroll_left: f64,
    scroll_width: f64,
    scrollable: bool,
}

/// In-memory [`BoardSurface`].
///
/// Scroll containers shift and clip their descendants, so scrolling changes
/// which element sits under a fixed point.
#[derive(Debug, Clone, Default)]
pub struct SceneTree {
    nodes: Vec<SceneNode>,
    page_interaction: PageInteraction,
    page_interaction_history: Vec<PageInteraction>,
}

/// Handles produced by [`SceneTree::lane_strip`].
#[derive(Debug, Clone)]
pub struct LaneStrip {
    pub strip: ElementId,
    pub lanes: Vec<(LaneId, ElementId)>,
}

impl SceneTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A horizontally scrolling strip at `viewport` holding one column per
    /// lane, each `lane_width` wide with `gap` between them.
    #[must_use]
    pub fn lane_strip(
        viewport: Rect,
        lanes: &[LaneId],
        lane_width: f64,
        gap: f64,
    ) -> (Self, LaneStrip) {
        let mut scene = Self::new();
        let strip = scene.add_node(None, viewport);
        let mut handles = Vec::with_capacity(lanes.len());
        let mut x = viewport.x + gap;
        for lane in lanes {
            let column = scene.add_node(
                Some(strip),
                Rect::new(x, viewport.y, lane_width, viewport.height),
            );
            scene.set_lane(column, lane.clone());
            handles.push((lane.clone(), column));
            x += lane_width + gap;
        }
        let content_width = (x - viewport.x).max(viewport.width);
        scene.make_scrollable(strip, content_width);
        (
            scene,
            LaneStrip {
                strip,
                lanes: handles,
            },
        )
    }

    /// Add an element under `parent` (or as a root).
    pub fn add_node(&mut self, parent: Option<ElementId>, rect: Rect) -> ElementId {
        let id = ElementId::new(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            parent,
            rect,
            lane: None,
            z_index: 0,
            interactive: true,
            scroll: None,
        });
        id
    }

    pub fn set_lane(&mut self, element: ElementId, lane: LaneId) {
        if let Some(node) = self.node_mut(element) {
            node.lane = Some(lane);
        }
    }

    pub fn set_z_index(&mut self, element: ElementId, z_index: i32) {
        if let Some(node) = self.node_mut(element) {
            node.z_index = z_index;
        }
    }

    /// Non-interactive elements are skipped by hit-testing.
    pub fn set_interactive(&mut self, element: ElementId, interactive: bool) {
        if let Some(node) = self.node_mut(element) {
            node.interactive = interactive;
        }
    }

    /// Give `element` horizontally scrollable content of `scroll_width`.
    pub fn make_scrollable(&mut self, element: ElementId, scroll_width: f64) {
        if let Some(node) = self.node_mut(element) {
            node.scroll = Some(NodeScroll {
                scroll_left: 0.0,
                scroll_width,
                scrollable: true,
            });
        }
    }

    /// Overflowing content that the element's style does not let scroll.
    pub fn make_overflow_hidden(&mut self, element: ElementId, scroll_width: f64) {
        if let Some(node) = self.node_mut(element) {
            node.scroll = Some(NodeScroll {
                scroll_left: 0.0,
                scroll_width,
                scrollable: false,
            });
        }
    }

    #[must_use]
    pub fn scroll_left(&self, element: ElementId) -> f64 {
        self.node(element)
            .and_then(|node| node.scroll)
            .map_or(0.0, |scroll| scroll.scroll_left)
    }

    pub fn set_scroll_left(&mut self, element: ElementId, value: f64) {
        let current = self.scroll_left(element);
        self.scroll_by(element, value - current);
    }

    #[must_use]
    pub fn page_interaction(&self) -> PageInteraction {
        self.page_interaction
    }

    /// Every page-interaction change requested so far.
    #[must_use]
    pub fn page_interaction_history(&self) -> &[PageInteraction] {
        &self.page_interaction_history
    }

    /// Current on-screen box of `element`, after ancestor scrolling.
    #[must_use]
    pub fn visible_rect(&self, element: ElementId) -> Option<Rect> {
        let node = self.node(element)?;
        let shift: f64 = self
            .strict_ancestors(element)
            .filter_map(|el| self.node(el).and_then(|n| n.scroll))
            .map(|scroll| scroll.scroll_left)
            .sum();
        Some(node.rect.translate(-shift, 0.0))
    }

    fn clipped_out(&self, element: ElementId, point: Point) -> bool {
        self.strict_ancestors(element).any(|el| {
            self.node(el).is_some_and(|node| node.scroll.is_some())
                && self
                    .visible_rect(el)
                    .is_some_and(|clip| !clip.contains(point))
        })
    }

    fn strict_ancestors(&self, element: ElementId) -> impl Iterator<Item = ElementId> + '_ {
        std::iter::successors(self.parent(element), move |&el| self.parent(el))
    }

    fn node(&self, element: ElementId) -> Option<&SceneNode> {
        self.nodes.get(element.0 as usize)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(element.0 as usize)
    }
}

impl BoardSurface for SceneTree {
    fn element_at(&self, point: Point) -> Option<ElementId> {
        let mut best: Option<(i32, ElementId)> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            let id = ElementId::new(i as u32);
            if !node.interactive {
                continue;
            }
            let Some(rect) = self.visible_rect(id) else {
                continue;
            };
            if !rect.contains(point) || self.clipped_out(id, point) {
                continue;
            }
            // Later nodes paint over earlier ones at equal z.
            if best.is_none_or(|(z, _)| node.z_index >= z) {
                best = Some((node.z_index, id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|node| node.parent)
    }

    fn lane_of(&self, element: ElementId) -> Option<LaneId> {
        self.node(element).and_then(|node| node.lane.clone())
    }

    fn scroll_metrics(&self, element: ElementId) -> Option<ScrollMetrics> {
        let node = self.node(element)?;
        let scroll = node.scroll?;
        Some(ScrollMetrics {
            viewport: self.visible_rect(element)?,
            scroll_left: scroll.scroll_left,
            scroll_width: scroll.scroll_width,
            client_width: node.rect.width,
            overflow_x_scrollable: scroll.scrollable,
        })
    }

    fn scroll_by(&mut self, element: ElementId, dx: f64) -> f64 {
        let Some(node) = self.node_mut(element) else {
            return 0.0;
        };
        let client_width = node.rect.width;
        let Some(scroll) = node.scroll.as_mut() else {
            return 0.0;
        };
        let max = (scroll.scroll_width - client_width).max(0.0);
        let before = scroll.scroll_left;
        scroll.scroll_left = (before + dx).clamp(0.0, max);
        scroll.scroll_left - before
    }

    fn set_page_interaction(&mut self, mode: PageInteraction) {
        self.page_interaction = mode;
        self.page_interaction_history.push(mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lanes() -> Vec<LaneId> {
        ["backlog", "todo", "doing", "done"]
            .into_iter()
            .map(LaneId::new)
            .collect()
    }

    fn board() -> (SceneTree, LaneStrip) {
        // 4 lanes x 300 + gaps overflow a 700px viewport.
        SceneTree::lane_strip(Rect::new(0.0, 0.0, 700.0, 500.0), &lanes(), 300.0, 20.0)
    }

    #[test]
    fn lane_under_point_resolves_through_ancestors() {
        let (mut scene, strip) = board();
        let todo = strip.lanes[1].1;
        let card = scene.add_node(Some(todo), Rect::new(330.0, 40.0, 280.0, 80.0));
        assert_eq!(scene.element_at(Point::new(400.0, 60.0)), Some(card));
        assert_eq!(
            resolve_lane_at(&scene, Point::new(400.0, 60.0)),
            Some(LaneId::new("todo"))
        );
    }

    #[test]
    fn gap_between_lanes_resolves_to_no_lane() {
        let (scene, _) = board();
        assert_eq!(resolve_lane_at(&scene, Point::new(10.0, 60.0)), None);
        assert_eq!(resolve_lane_at(&scene, Point::new(10.0, 900.0)), None);
    }

    #[test]
    fn scrolling_changes_lane_under_fixed_point() {
        let (mut scene, strip) = board();
        let point = Point::new(100.0, 100.0);
        assert_eq!(resolve_lane_at(&scene, point), Some(LaneId::new("backlog")));
        scene.set_scroll_left(strip.strip, 320.0);
        assert_eq!(resolve_lane_at(&scene, point), Some(LaneId::new("todo")));
    }

    #[test]
    fn content_outside_strip_viewport_is_clipped() {
        let (scene, _) = board();
        // "doing" is laid out at 660..960 but the strip ends at 700.
        assert_eq!(resolve_lane_at(&scene, Point::new(680.0, 10.0)), Some(LaneId::new("doing")));
        assert_eq!(resolve_lane_at(&scene, Point::new(800.0, 10.0)), None);
    }

    #[test]
    fn scroll_target_is_nearest_scrollable_ancestor() {
        let (scene, strip) = board();
        let point = Point::new(400.0, 60.0);
        let (target, metrics) =
            resolve_scroll_target(&scene, point, ScrollDirection::Right).unwrap();
        assert_eq!(target, strip.strip);
        assert_eq!(metrics.client_width, 700.0);
        assert_eq!(metrics.scroll_width, 1300.0);
        assert!(metrics.can_scroll_right());
        assert!(!metrics.can_scroll_left());
        assert!(resolve_scroll_target(&scene, point, ScrollDirection::Left).is_none());
    }

    #[test]
    fn scroll_target_skips_container_exhausted_in_direction() {
        let mut scene = SceneTree::new();
        let outer = scene.add_node(None, Rect::new(0.0, 0.0, 1000.0, 600.0));
        scene.make_scrollable(outer, 3000.0);
        let inner = scene.add_node(Some(outer), Rect::new(0.0, 0.0, 1000.0, 600.0));
        scene.make_scrollable(inner, 1500.0);
        scene.set_scroll_left(inner, 500.0);

        let point = Point::new(980.0, 200.0);
        let containers: Vec<ElementId> =
            scroll_containers(&scene, point).map(|(el, _)| el).collect();
        assert_eq!(containers, vec![inner, outer]);
        let (right, _) = resolve_scroll_target(&scene, point, ScrollDirection::Right).unwrap();
        assert_eq!(right, outer);
        let (left, _) = resolve_scroll_target(&scene, point, ScrollDirection::Left).unwrap();
        assert_eq!(left, inner);
    }

    #[test]
    fn hidden_overflow_is_not_a_scroll_target() {
        let mut scene = SceneTree::new();
        let root = scene.add_node(None, Rect::new(0.0, 0.0, 400.0, 400.0));
        scene.make_overflow_hidden(root, 900.0);
        let point = Point::new(10.0, 10.0);
        assert!(scroll_containers(&scene, point).next().is_none());
        assert!(resolve_scroll_target(&scene, point, ScrollDirection::Right).is_none());
    }

    #[test]
    fn scroll_by_clamps_to_range() {
        let (mut scene, strip) = board();
        assert_eq!(scene.scroll_by(strip.strip, -50.0), 0.0);
        assert_eq!(scene.scroll_by(strip.strip, 10_000.0), 600.0);
        assert_eq!(scene.scroll_left(strip.strip), 600.0);
    }

    #[test]
    fn non_interactive_overlay_is_transparent_to_hits() {
        let (mut scene, _) = board();
        let overlay = scene.add_node(None, Rect::new(0.0, 0.0, 2000.0, 2000.0));
        scene.set_z_index(overlay, 1000);
        assert_eq!(scene.element_at(Point::new(50.0, 50.0)), Some(overlay));
        scene.set_interactive(overlay, false);
        assert_eq!(resolve_lane_at(&scene, Point::new(50.0, 50.0)), Some(LaneId::new("backlog")));
    }
}
