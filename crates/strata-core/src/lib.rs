// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

/// Axis-aligned rectangle. The engine keeps every block rectangle in the
/// scroll container's content space (scroll offset already applied).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_edges(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Inclusive overlap test: rectangles that only touch on an edge collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && self.right() >= other.left()
            && self.top() <= other.bottom()
            && self.bottom() >= other.top()
    }

    /// Translate a viewport rectangle into the content space of a scroll
    /// container whose visible origin sits at `origin` and which is scrolled
    /// by `scroll`.
    pub fn to_scroll_space(&self, origin: Vec2, scroll: Vec2) -> Rect {
        Rect {
            x: self.x - origin.x + scroll.x,
            y: self.y - origin.y + scroll.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Signed distance from a point to each edge of a rectangle.
/// Every component is positive when the point lies inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDistance {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl EdgeDistance {
    pub fn between(point: Vec2, rect: Rect) -> Self {
        Self {
            left: point.x - rect.left(),
            top: point.y - rect.top(),
            right: rect.right() - point.x,
            bottom: rect.bottom() - point.y,
        }
    }

    /// Strictly between the left and right edges.
    pub fn within_x(&self) -> bool {
        self.left > 0.0 && self.right > 0.0
    }

    /// Strictly between the top and bottom edges.
    pub fn within_y(&self) -> bool {
        self.top > 0.0 && self.bottom > 0.0
    }

    /// How far down the rectangle the point sits, as a fraction of `height`.
    pub fn vertical_fraction(&self, height: f32) -> f32 {
        if height > 0.0 {
            self.top / height
        } else {
            0.0
        }
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

pub type BlockId = u64;

// ──────────────────────────────────────────────
// Drop targeting
// ──────────────────────────────────────────────

/// Which edge of the target a drop happens against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Top,
    Bottom,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Top | Direction::Bottom)
    }

    pub fn is_horizontal(self) -> bool {
        !self.is_vertical()
    }
}

/// A resolved drop: target block, edge, and whether a bottom drop
/// should also indent the moved block one level deeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropTarget {
    pub id: BlockId,
    pub direction: Direction,
    pub nested: bool,
}

impl DropTarget {
    pub fn new(id: BlockId, direction: Direction) -> Self {
        Self {
            id,
            direction,
            nested: false,
        }
    }
}

// ──────────────────────────────────────────────
// Input
// ──────────────────────────────────────────────

/// What sits under the pointer when it is pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressTarget {
    /// The drag handle of a block.
    Handle(BlockId),
    /// Blank editor space: starts a rectangle selection.
    Blank,
}

/// Pointer events, positioned relative to the scroll container's visible
/// origin (not yet offset by the scroll position).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Vec2, target: PressTarget },
    Move { position: Vec2 },
    Up { position: Vec2 },
    /// Pointer left the document or the window lost focus.
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl ScrollMetrics {
    pub fn is_scrollable(&self) -> bool {
        self.scroll_height > self.client_height
    }

    pub fn at_top(&self) -> bool {
        self.scroll_top <= 0.0
    }

    pub fn at_bottom(&self) -> bool {
        (self.scroll_top + self.client_height).floor() >= self.scroll_height
    }
}

// ──────────────────────────────────────────────
// Trait: EngineHost
// ──────────────────────────────────────────────

/// The host renders blocks and owns the scroll container.
/// The engine asks it for geometry and tells it what to highlight.
pub trait EngineHost {
    /// Rectangles of every mounted structural block, in content space.
    fn measure_blocks(&mut self) -> Vec<(BlockId, Rect)>;
    fn scroll_metrics(&self) -> ScrollMetrics;
    fn scroll_by(&mut self, delta: f32);
    fn show_drop_indicator(&mut self, target: Option<DropTarget>);
    fn show_selection(&mut self, area: Option<Rect>, selected: &[BlockId]);
}
