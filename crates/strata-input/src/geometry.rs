use std::collections::HashMap;

use strata_core::{BlockId, Rect};
use strata_tree::{Document, Node};

// ──────────────────────────────────────────────
// GeometryIndex: blocks sorted by top edge
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    pub id: BlockId,
    pub rect: Rect,
    /// Position in the input sequence.
    pub order: usize,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    entries: Vec<IndexEntry>,
}

impl GeometryIndex {
    /// Build from content-space rectangles. Blocks sharing a top keep their
    /// input order.
    pub fn build(blocks: impl IntoIterator<Item = (BlockId, Rect)>) -> Self {
        let mut entries: Vec<IndexEntry> = blocks
            .into_iter()
            .enumerate()
            .map(|(order, (id, rect))| IndexEntry { id, rect, order })
            .collect();
        entries.sort_by(|a, b| a.rect.y.total_cmp(&b.rect.y));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn get(&self, pos: usize) -> Option<&IndexEntry> {
        self.entries.get(pos)
    }

    pub fn first(&self) -> Option<&IndexEntry> {
        self.entries.first()
    }

    pub fn last(&self) -> Option<&IndexEntry> {
        self.entries.last()
    }

    /// Lowest bottom edge over all blocks. Side-by-side blocks mean this is
    /// not necessarily the bottom of the last entry.
    pub fn lowest_bottom(&self) -> Option<f32> {
        self.entries.iter().map(|e| e.rect.bottom()).reduce(f32::max)
    }

    /// Sorted position of the block whose `[top, top + height)` contains `y`.
    /// Among blocks sharing a top, the one latest in input order wins.
    pub fn position_containing(&self, y: f32) -> Option<usize> {
        let mut pos = self.entries.partition_point(|e| e.rect.y <= y).checked_sub(1)?;
        loop {
            let entry = &self.entries[pos];
            if spans(&entry.rect, y) {
                return Some(pos);
            }
            match pos.checked_sub(1) {
                Some(prev) if self.entries[prev].rect.y == entry.rect.y => pos = prev,
                _ => return None,
            }
        }
    }

    pub fn find_containing(&self, y: f32) -> Option<BlockId> {
        self.position_containing(y).map(|pos| self.entries[pos].id)
    }

    /// First sorted position whose top equals the top at `pos`.
    pub fn first_sharing_top(&self, pos: usize) -> usize {
        let Some(top) = self.entries.get(pos).map(|e| e.rect.y) else {
            return pos;
        };
        let mut start = pos;
        while start > 0 && self.entries[start - 1].rect.y == top {
            start -= 1;
        }
        start
    }

    /// Last sorted position whose top equals the top at `pos`.
    pub fn last_sharing_top(&self, pos: usize) -> usize {
        let Some(top) = self.entries.get(pos).map(|e| e.rect.y) else {
            return pos;
        };
        let mut end = pos;
        while self.entries.get(end + 1).is_some_and(|e| e.rect.y == top) {
            end += 1;
        }
        end
    }
}

/// Zero-height blocks contain exactly their top.
fn spans(rect: &Rect, y: f32) -> bool {
    if rect.height <= 0.0 {
        y == rect.y
    } else {
        rect.y <= y && y < rect.bottom()
    }
}

// ──────────────────────────────────────────────
// BlockLayout: geometry captured at session start
// ──────────────────────────────────────────────

/// Measured rectangles plus the two indexes a session queries:
/// top-level blocks for drag targeting and text blocks for selection.
#[derive(Debug, Clone, Default)]
pub struct BlockLayout {
    rects: HashMap<BlockId, Rect>,
    top_level: GeometryIndex,
    selectable: GeometryIndex,
}

impl BlockLayout {
    pub fn capture(document: &Document, measured: Vec<(BlockId, Rect)>) -> Self {
        let rects: HashMap<BlockId, Rect> = measured.into_iter().collect();
        let with_rect = |id: BlockId| rects.get(&id).map(|r| (id, *r));

        let top_level = GeometryIndex::build(document.nodes().iter().filter_map(|n| with_rect(n.id)));
        let mut text = Vec::new();
        collect_text_blocks(document.nodes(), &mut text);
        let selectable = GeometryIndex::build(text.into_iter().filter_map(with_rect));

        log::trace!(
            "captured {} rects ({} top-level, {} selectable)",
            rects.len(),
            top_level.len(),
            selectable.len()
        );
        Self {
            rects,
            top_level,
            selectable,
        }
    }

    pub fn rect(&self, id: BlockId) -> Option<Rect> {
        self.rects.get(&id).copied()
    }

    pub fn top_level(&self) -> &GeometryIndex {
        &self.top_level
    }

    pub fn selectable(&self) -> &GeometryIndex {
        &self.selectable
    }
}

fn collect_text_blocks(nodes: &[Node], out: &mut Vec<BlockId>) {
    for node in nodes {
        if node.is_container() {
            collect_text_blocks(&node.children, out);
        } else {
            out.push(node.id);
        }
    }
}
