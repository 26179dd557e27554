// Pointer session engine: drag-to-move and rectangle selection over a
// measured document. The engine never owns the document; it borrows it per
// event and hands back a `DropCommand` for the caller to apply.

pub mod drag;
pub mod geometry;
pub mod scroll;
pub mod selection;


use strata_core::{BlockId, DropTarget, EngineHost, PointerEvent, PressTarget, ScrollMetrics, Vec2};
use strata_tree::Document;

pub use drag::{resolve_target, DragSource, DragState, DropCommand, TargetingConfig, DRAG_THRESHOLD};
pub use geometry::{BlockLayout, GeometryIndex, IndexEntry};
pub use scroll::{AutoScroll, AutoScrollConfig, FrameThrottle, ScrollDirection};
pub use selection::{rects_collide, SelectionArea};

// ──────────────────────────────────────────────
// Session
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineConfig {
    pub targeting: TargetingConfig,
    pub scroll: AutoScrollConfig,
}

/// At most one pointer session exists at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Session {
    #[default]
    Idle,
    Dragging(DragState),
    Selecting(SelectionArea),
}

// ──────────────────────────────────────────────
// Engine
// ──────────────────────────────────────────────

pub struct Engine {
    config: EngineConfig,
    session: Session,
    /// Geometry captured when the session started.
    layout: Option<BlockLayout>,
    throttle: FrameThrottle<Vec2>,
    /// Last viewport-relative pointer position of the session.
    pointer: Option<Vec2>,
    auto_scroll: AutoScroll,
    /// Last indicator sent to the host.
    indicator: Option<DropTarget>,
    /// Result of the last rectangle selection. Survives the session.
    selected: Vec<BlockId>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            session: Session::Idle,
            layout: None,
            throttle: FrameThrottle::default(),
            pointer: None,
            auto_scroll: AutoScroll::new(),
            indicator: None,
            selected: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.session, Session::Dragging(_))
    }

    pub fn is_selecting(&self) -> bool {
        matches!(self.session, Session::Selecting(_))
    }

    pub fn selected(&self) -> &[BlockId] {
        &self.selected
    }

    /// Live target of the current drag, if any.
    pub fn drop_target(&self) -> Option<DropTarget> {
        match &self.session {
            Session::Dragging(DragState::Targeting { target, .. }) => *target,
            _ => None,
        }
    }

    pub fn is_auto_scrolling(&self) -> bool {
        self.auto_scroll.is_active()
    }

    /// Process one pointer event. Returns the drop to apply when a drag is
    /// released over a target.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        document: &Document,
        host: &mut impl EngineHost,
    ) -> Option<DropCommand> {
        match event {
            PointerEvent::Down { position, target } => {
                self.press(position, target, document, host);
                None
            }
            PointerEvent::Move { position } => {
                self.pointer_moved(position, document, host);
                None
            }
            PointerEvent::Up { position } => self.release(position, document, host),
            PointerEvent::Cancel => {
                self.cancel(host);
                None
            }
        }
    }

    /// Run one animation frame: consume the latest pointer position, step
    /// auto-scroll and recompute the drop target or selection.
    pub fn frame(&mut self, document: &Document, host: &mut impl EngineHost) {
        if !self.is_tracking() {
            return;
        }
        let mut position = self.throttle.take();
        if let Some(p) = position {
            self.pointer = Some(p);
            self.auto_scroll
                .update(p.y, &host.scroll_metrics(), &self.config.scroll);
        }
        let delta = self.auto_scroll.step(&host.scroll_metrics(), &self.config.scroll);
        if delta != 0.0 {
            host.scroll_by(delta);
            position = position.or(self.pointer);
        }
        if let Some(p) = position {
            self.tick(p, document, host);
        }
    }

    /// Rebuild cached geometry, e.g. after the host re-laid out the blocks.
    pub fn remeasure(&mut self, document: &Document, host: &mut impl EngineHost) {
        if self.layout.is_some() {
            self.layout = Some(BlockLayout::capture(document, host.measure_blocks()));
            if let Some(p) = self.pointer {
                self.throttle.push(p);
            }
        }
    }

    // ── Pointer handling ────────────────────────

    fn press(&mut self, position: Vec2, target: PressTarget, document: &Document, host: &mut impl EngineHost) {
        if self.session != Session::Idle {
            log::trace!("press ignored during {:?}", self.session);
            return;
        }
        match target {
            PressTarget::Handle(id) => {
                let source = if self.selected.len() > 1 && self.selected.contains(&id) {
                    DragSource::Many(self.selected.clone())
                } else {
                    self.clear_selection(host);
                    DragSource::Single(id)
                };
                self.session = Session::Dragging(DragState::Armed {
                    source,
                    press: position,
                });
            }
            PressTarget::Blank => {
                self.clear_selection(host);
                self.layout = Some(BlockLayout::capture(document, host.measure_blocks()));
                let area = SelectionArea::begin(content_point(position, host.scroll_metrics()));
                host.show_selection(Some(area.rect), &[]);
                self.session = Session::Selecting(area);
            }
        }
        self.pointer = Some(position);
    }

    fn pointer_moved(&mut self, position: Vec2, document: &Document, host: &mut impl EngineHost) {
        match &self.session {
            Session::Idle => return,
            Session::Dragging(DragState::Armed { source, press }) => {
                let travelled = (position.x - press.x).hypot(position.y - press.y);
                if travelled < self.config.targeting.drag_threshold {
                    return;
                }
                log::trace!("drag started for {:?}", source.ids());
                let source = source.clone();
                self.layout = Some(BlockLayout::capture(document, host.measure_blocks()));
                self.session = Session::Dragging(DragState::Targeting {
                    source,
                    target: None,
                });
            }
            Session::Dragging(DragState::Targeting { .. }) | Session::Selecting(_) => {}
        }
        self.pointer = Some(position);
        self.throttle.push(position);
    }

    fn release(&mut self, position: Vec2, document: &Document, host: &mut impl EngineHost) -> Option<DropCommand> {
        let session = std::mem::take(&mut self.session);
        let command = match session {
            Session::Dragging(DragState::Targeting { source, .. }) => {
                let point = content_point(position, host.scroll_metrics());
                let target = self
                    .layout
                    .as_ref()
                    .and_then(|layout| resolve_target(document, layout, point, &source, &self.config.targeting));
                target.map(|target| DropCommand { source, target })
            }
            Session::Selecting(mut area) => {
                area.update(content_point(position, host.scroll_metrics()));
                self.selected = self.select(&area);
                host.show_selection(None, &self.selected);
                None
            }
            Session::Dragging(DragState::Armed { .. }) | Session::Idle => None,
        };
        self.end_session(host);
        if let Some(command) = &command {
            log::debug!("drop {:?} on {:?}", command.source.ids(), command.target);
        }
        command
    }

    fn cancel(&mut self, host: &mut impl EngineHost) {
        self.session = Session::Idle;
        self.end_session(host);
        self.clear_selection(host);
    }

    // ── Per-frame work ──────────────────────────

    fn tick(&mut self, position: Vec2, document: &Document, host: &mut impl EngineHost) {
        let point = content_point(position, host.scroll_metrics());
        match &mut self.session {
            Session::Dragging(DragState::Targeting { source, target }) => {
                let resolved = self
                    .layout
                    .as_ref()
                    .and_then(|layout| resolve_target(document, layout, point, source, &self.config.targeting));
                *target = resolved;
                if resolved != self.indicator {
                    log::trace!("drop target {:?}", resolved);
                    self.indicator = resolved;
                    host.show_drop_indicator(resolved);
                }
            }
            Session::Selecting(area) => {
                area.update(point);
                let rect = area.rect;
                self.selected = self
                    .layout
                    .as_ref()
                    .map(|layout| selection::resolve(&rect, layout.selectable()))
                    .unwrap_or_default();
                host.show_selection(Some(rect), &self.selected);
            }
            Session::Idle | Session::Dragging(DragState::Armed { .. }) => {}
        }
    }

    fn select(&self, area: &SelectionArea) -> Vec<BlockId> {
        self.layout
            .as_ref()
            .map(|layout| selection::resolve(&area.rect, layout.selectable()))
            .unwrap_or_default()
    }

    fn is_tracking(&self) -> bool {
        matches!(
            self.session,
            Session::Dragging(DragState::Targeting { .. }) | Session::Selecting(_)
        )
    }

    fn end_session(&mut self, host: &mut impl EngineHost) {
        self.throttle.clear();
        self.auto_scroll.stop();
        self.layout = None;
        self.pointer = None;
        if self.indicator.take().is_some() {
            host.show_drop_indicator(None);
        }
    }

    fn clear_selection(&mut self, host: &mut impl EngineHost) {
        if !self.selected.is_empty() {
            self.selected.clear();
            host.show_selection(None, &[]);
        }
    }
}

/// Viewport-relative pointer to content space.
fn content_point(position: Vec2, metrics: ScrollMetrics) -> Vec2 {
    Vec2::new(position.x, position.y + metrics.scroll_top)
}
