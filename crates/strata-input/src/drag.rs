// Drag targeting: turn a content-space pointer position into a drop target.

use strata_core::{BlockId, Direction, DropTarget, EdgeDistance, Rect, Vec2};
use strata_tree::{Document, MoveError, Node};

use crate::geometry::{BlockLayout, GeometryIndex};

/// Pointer travel (px) before a pressed handle starts a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Horizontal offset (px) into a list block beyond which a bottom drop nests.
pub const INDENT_BAND: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetingConfig {
    pub drag_threshold: f32,
    pub indent_band: f32,
    /// Vertical split of a block body between its top and bottom halves.
    pub split_fraction: f32,
    /// Height fraction at the top and bottom of a column list that targets
    /// the list itself rather than a column.
    pub column_edge_fraction: f32,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            indent_band: INDENT_BAND,
            split_fraction: 0.5,
            column_edge_fraction: 0.2,
        }
    }
}

// ──────────────────────────────────────────────
// Drag session
// ──────────────────────────────────────────────

/// What is being dragged.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSource {
    Single(BlockId),
    /// A rectangle selection, moved as one unit.
    Many(Vec<BlockId>),
}

impl DragSource {
    pub fn ids(&self) -> &[BlockId] {
        match self {
            DragSource::Single(id) => std::slice::from_ref(id),
            DragSource::Many(ids) => ids,
        }
    }

    pub fn contains(&self, id: BlockId) -> bool {
        self.ids().contains(&id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    /// Handle pressed, pointer has not travelled far enough yet.
    Armed { source: DragSource, press: Vec2 },
    Targeting {
        source: DragSource,
        target: Option<DropTarget>,
    },
}

/// A resolved drop, applied exactly once on release.
#[derive(Debug, Clone, PartialEq)]
pub struct DropCommand {
    pub source: DragSource,
    pub target: DropTarget,
}

impl DropCommand {
    pub fn apply(&self, document: &mut Document) -> Result<(), MoveError> {
        let DropTarget {
            id,
            direction,
            nested,
        } = self.target;
        match &self.source {
            DragSource::Single(source) => document.move_block_by_id(*source, id, direction, nested),
            DragSource::Many(sources) => {
                let target = document.find(id).ok_or(MoveError::InvalidPath)?;
                document.move_blocks(sources, &target, direction, nested)
            }
        }
    }
}

// ──────────────────────────────────────────────
// Target resolution
// ──────────────────────────────────────────────

/// Resolve the drop target under `point` (content space). Blocks being
/// dragged are never targets.
pub fn resolve_target(
    document: &Document,
    layout: &BlockLayout,
    point: Vec2,
    source: &DragSource,
    config: &TargetingConfig,
) -> Option<DropTarget> {
    let target = locate(document, layout, point, config)?;
    if source.contains(target.id) {
        return None;
    }
    Some(with_nesting(document, layout, point, target, config))
}

fn locate(
    document: &Document,
    layout: &BlockLayout,
    point: Vec2,
    config: &TargetingConfig,
) -> Option<DropTarget> {
    let index = layout.top_level();
    let Some(pos) = index.position_containing(point.y) else {
        return beyond_ends(index, point);
    };
    let hit = index.get(pos)?;
    let node = document.node_by_id(hit.id)?;
    if node.is_column_list() {
        column_list_target(document, layout, node, hit.rect, point, config)
    } else {
        block_target(document, node, hit.rect, point, config)
    }
}

/// Above the first or below the last top-level block, while horizontally
/// within it.
fn beyond_ends(index: &GeometryIndex, point: Vec2) -> Option<DropTarget> {
    let first = index.first()?;
    let d = EdgeDistance::between(point, first.rect);
    if d.top < 0.0 && d.within_x() {
        return Some(DropTarget::new(first.id, Direction::Top));
    }
    let last = index.last()?;
    let d = EdgeDistance::between(point, last.rect);
    if d.bottom < 0.0 && d.within_x() {
        return Some(DropTarget::new(last.id, Direction::Bottom));
    }
    None
}

fn block_target(
    document: &Document,
    node: &Node,
    rect: Rect,
    point: Vec2,
    config: &TargetingConfig,
) -> Option<DropTarget> {
    let d = EdgeDistance::between(point, rect);
    if d.right < 0.0 {
        return Some(DropTarget::new(node.id, Direction::Right));
    }
    if d.left < 0.0 {
        // Indented blocks cannot open a column.
        return (node.level.unwrap_or(0) == 0).then(|| DropTarget::new(node.id, Direction::Left));
    }
    Some(vertical_target(document, node.id, d.vertical_fraction(rect.height), config))
}

/// Upper part of a block: after its previous sibling, or above it when first.
/// Lower part: after the block itself.
fn vertical_target(document: &Document, id: BlockId, fraction: f32, config: &TargetingConfig) -> DropTarget {
    if fraction < config.split_fraction {
        above(document, id)
    } else {
        DropTarget::new(id, Direction::Bottom)
    }
}

fn above(document: &Document, id: BlockId) -> DropTarget {
    match document.previous_sibling(id) {
        Some(previous) => DropTarget::new(previous.id, Direction::Bottom),
        None => DropTarget::new(id, Direction::Top),
    }
}

fn column_list_target(
    document: &Document,
    layout: &BlockLayout,
    list: &Node,
    list_rect: Rect,
    point: Vec2,
    config: &TargetingConfig,
) -> Option<DropTarget> {
    if let Some(last) = list.children.last() {
        if let Some(rect) = layout.rect(last.id) {
            if EdgeDistance::between(point, rect).right < 0.0 {
                return Some(DropTarget::new(last.id, Direction::Right));
            }
        }
    }

    let lower_edge = list_rect.height * (1.0 - config.column_edge_fraction);
    let mut hovered = None;
    for column in &list.children {
        let Some(rect) = layout.rect(column.id) else {
            continue;
        };
        let d = EdgeDistance::between(point, rect);
        if d.left < 0.0 {
            return Some(DropTarget::new(column.id, Direction::Left));
        }
        if d.within_x() {
            if d.top > 0.0 && (d.top < lower_edge || d.bottom > 0.0) {
                hovered = Some(column);
            }
            break;
        }
    }
    if let Some(column) = hovered {
        return column_interior(document, layout, column, point, config);
    }

    let fraction = EdgeDistance::between(point, list_rect).vertical_fraction(list_rect.height);
    if fraction > 1.0 - config.column_edge_fraction {
        Some(DropTarget::new(list.id, Direction::Bottom))
    } else if fraction < config.column_edge_fraction {
        Some(above(document, list.id))
    } else {
        None
    }
}

/// Inside a column only top/bottom drops are resolved.
fn column_interior(
    document: &Document,
    layout: &BlockLayout,
    column: &Node,
    point: Vec2,
    config: &TargetingConfig,
) -> Option<DropTarget> {
    let hovered = column.children.iter().find_map(|child| {
        let rect = layout.rect(child.id)?;
        let d = EdgeDistance::between(point, rect);
        d.within_y().then_some((child.id, d.vertical_fraction(rect.height)))
    });
    match hovered {
        Some((id, fraction)) => Some(vertical_target(document, id, fraction, config)),
        // Blank space below the blocks.
        None => column
            .children
            .last()
            .map(|last| DropTarget::new(last.id, Direction::Bottom)),
    }
}

/// A bottom drop onto a list block nests when the pointer is past the
/// indent band and still left of the block's right edge.
fn with_nesting(
    document: &Document,
    layout: &BlockLayout,
    point: Vec2,
    target: DropTarget,
    config: &TargetingConfig,
) -> DropTarget {
    if target.direction != Direction::Bottom {
        return target;
    }
    let list_like = document.node_by_id(target.id).is_some_and(Node::is_list_like);
    let Some(rect) = layout.rect(target.id).filter(|_| list_like) else {
        return target;
    };
    let d = EdgeDistance::between(point, rect);
    DropTarget {
        nested: d.left > config.indent_band && d.right > 0.0,
        ..target
    }
}
