// Rectangle selection over text blocks.

use strata_core::{BlockId, Rect, Vec2};

use crate::geometry::GeometryIndex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionArea {
    pub start: Vec2,
    pub end: Vec2,
    pub rect: Rect,
}

impl SelectionArea {
    pub fn begin(point: Vec2) -> Self {
        Self {
            start: point,
            end: point,
            rect: Rect::new(point.x, point.y, 0.0, 0.0),
        }
    }

    pub fn update(&mut self, point: Vec2) {
        self.end = point;
        self.rect = Rect::new(
            self.start.x.min(point.x),
            self.start.y.min(point.y),
            (point.x - self.start.x).abs(),
            (point.y - self.start.y).abs(),
        );
    }
}

/// Inclusive overlap: touching edges collide.
pub fn rects_collide(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Blocks touched by `area`, in document order.
pub fn resolve(area: &Rect, index: &GeometryIndex) -> Vec<BlockId> {
    let (Some(first), Some(lowest)) = (index.first(), index.lowest_bottom()) else {
        return Vec::new();
    };
    if area.bottom() < first.rect.top() || area.top() > lowest {
        return Vec::new();
    }

    let start = index
        .position_containing(area.top())
        .map_or(0, |pos| index.first_sharing_top(pos));
    let end = index
        .position_containing(area.bottom())
        .map_or(index.len(), |pos| index.last_sharing_top(pos) + 1);
    let Some(candidates) = index.entries().get(start..end) else {
        return Vec::new();
    };

    let mut hits: Vec<_> = candidates
        .iter()
        .filter(|e| rects_collide(area, &e.rect))
        .collect();
    hits.sort_by_key(|e| e.order);
    hits.into_iter().map(|e| e.id).collect()
}
