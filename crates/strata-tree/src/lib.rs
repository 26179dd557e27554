// Document tree for the block editor.
// Blocks are addressed by `Path` (recomputed on every query) and by stable
// `BlockId`. Structural moves live in `moves.rs`.

mod moves;
mod node;
mod path;
mod tests;

use std::collections::{HashMap, HashSet};

use strata_core::BlockId;

pub use node::{Node, NodeKind, MAX_LEVEL};
pub use path::{Path, PathOp};

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Why a move was rejected. A rejected move never touches the document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("path does not resolve to a block")]
    InvalidPath,
    #[error("block {0} cannot be dropped onto itself")]
    SelfTarget(BlockId),
    #[error("move would leave the document unchanged")]
    DegenerateMove,
    #[error("illegal placement: {0}")]
    IllegalPlacement(&'static str),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("column {0} is not inside a column list")]
    OrphanColumn(BlockId),
    #[error("column list {0} is not at the document root")]
    NestedColumnList(BlockId),
    #[error("column list {id} has {columns} column(s)")]
    UnderfilledColumnList { id: BlockId, columns: usize },
    #[error("column list {id} holds non-column block {child}")]
    ForeignChild { id: BlockId, child: BlockId },
    #[error("column ratios of list {id} sum to {sum}")]
    RatioSum { id: BlockId, sum: f64 },
    #[error("container {0} is empty")]
    EmptyContainer(BlockId),
    #[error("block {id} has level {level}")]
    LevelOutOfRange { id: BlockId, level: u8 },
    #[error("list item {0} has no level")]
    MissingLevel(BlockId),
    #[error("text block {0} has structural children")]
    TextWithChildren(BlockId),
    #[error("block id {0} appears more than once")]
    DuplicateId(BlockId),
}

// ──────────────────────────────────────────────
// Document
// ──────────────────────────────────────────────

/// Tolerance for column ratio sums.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Minimum column ratio when resizing a divider.
pub const MIN_RATIO: f64 = 0.1;

/// Handle to a path that follows the document through edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathRef(u64);

#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    next_id: BlockId,
    refs: HashMap<PathRef, Option<Path>>,
    next_ref: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::from_nodes(Vec::new())
    }

    /// Wrap existing top-level blocks. Fresh ids start above the largest id present.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let max = nodes.iter().map(Node::max_id).max().unwrap_or(0);
        Self {
            nodes,
            next_id: max + 1,
            refs: HashMap::new(),
            next_ref: 0,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn alloc_id(&mut self) -> BlockId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn node(&self, path: &Path) -> Option<&Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.nodes.get(*first)?;
        for &i in rest {
            node = node.children.get(i)?;
        }
        Some(node)
    }

    pub(crate) fn node_mut(&mut self, path: &Path) -> Option<&mut Node> {
        let (first, rest) = path.indices().split_first()?;
        let mut node = self.nodes.get_mut(*first)?;
        for &i in rest {
            node = node.children.get_mut(i)?;
        }
        Some(node)
    }

    /// Children of the node at `parent`; the root's children are the top-level blocks.
    pub fn children(&self, parent: &Path) -> Option<&[Node]> {
        if parent.is_root() {
            return Some(&self.nodes);
        }
        self.node(parent).map(|n| n.children.as_slice())
    }

    fn children_mut(&mut self, parent: &Path) -> Option<&mut Vec<Node>> {
        if parent.is_root() {
            return Some(&mut self.nodes);
        }
        self.node_mut(parent).map(|n| &mut n.children)
    }

    pub fn find(&self, id: BlockId) -> Option<Path> {
        let mut indices = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            indices.push(i);
            if node.find_path(id, &mut indices) {
                return Some(Path::new(indices));
            }
            indices.clear();
        }
        None
    }

    pub fn node_by_id(&self, id: BlockId) -> Option<&Node> {
        self.find(id).and_then(|p| self.node(&p))
    }

    /// Every block id in document order.
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids = Vec::new();
        for node in &self.nodes {
            node.block_ids(&mut ids);
        }
        ids
    }

    pub fn top_level_ids(&self) -> Vec<BlockId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// The sibling immediately before `id`, if any.
    pub fn previous_sibling(&self, id: BlockId) -> Option<&Node> {
        let path = self.find(id)?;
        self.node(&path.previous()?)
    }

    pub fn is_first_child(&self, id: BlockId) -> bool {
        self.find(id).and_then(|p| p.last()) == Some(0)
    }

    // ── Primitive edits ──────────────────────────
    //
    // Every structural change goes through these three so registered
    // path references stay current.

    pub fn insert_node(&mut self, at: &Path, node: Node) -> Result<(), MoveError> {
        self.attach(at, node).map_err(|_| MoveError::InvalidPath)?;
        self.transform_refs(&PathOp::Insert(at.clone()));
        Ok(())
    }

    pub fn remove_node(&mut self, at: &Path) -> Result<Node, MoveError> {
        let node = self.detach(at)?;
        self.transform_refs(&PathOp::Remove(at.clone()));
        Ok(node)
    }

    /// Move the node at `from` so that it ends up at `to`, where `to` is
    /// addressed in the tree with `from` already removed.
    pub fn move_node(&mut self, from: &Path, to: &Path) -> Result<(), MoveError> {
        if from == to {
            return Ok(());
        }
        let node = self.detach(from)?;
        if let Err(node) = self.attach(to, node) {
            // `from` is valid again once nothing else changed.
            let _ = self.attach(from, node);
            return Err(MoveError::InvalidPath);
        }
        self.transform_refs(&PathOp::Move {
            from: from.clone(),
            to: to.clone(),
        });
        Ok(())
    }

    fn attach(&mut self, at: &Path, node: Node) -> Result<(), Node> {
        let (Some(parent), Some(index)) = (at.parent(), at.last()) else {
            return Err(node);
        };
        match self.children_mut(&parent) {
            Some(children) if index <= children.len() => {
                children.insert(index, node);
                Ok(())
            }
            _ => Err(node),
        }
    }

    fn detach(&mut self, at: &Path) -> Result<Node, MoveError> {
        let parent = at.parent().ok_or(MoveError::InvalidPath)?;
        let index = at.last().ok_or(MoveError::InvalidPath)?;
        match self.children_mut(&parent) {
            Some(children) if index < children.len() => Ok(children.remove(index)),
            _ => Err(MoveError::InvalidPath),
        }
    }

    fn transform_refs(&mut self, op: &PathOp) {
        for slot in self.refs.values_mut() {
            if let Some(path) = slot.take() {
                *slot = path.transform(op);
            }
        }
    }

    // ── Path references ──────────────────────────

    pub fn path_ref(&mut self, path: Path) -> PathRef {
        let handle = PathRef(self.next_ref);
        self.next_ref += 1;
        self.refs.insert(handle, Some(path));
        handle
    }

    /// Current path of a reference; `None` once its node was removed.
    pub fn ref_path(&self, handle: PathRef) -> Option<Path> {
        self.refs.get(&handle).cloned().flatten()
    }

    /// Release a reference, returning its final path.
    pub fn unref(&mut self, handle: PathRef) -> Option<Path> {
        self.refs.remove(&handle).flatten()
    }

    // ── Invariants ───────────────────────────────

    /// Verify the structural invariants every mutation must preserve.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut seen = HashSet::new();
        for node in &self.nodes {
            match node.kind {
                NodeKind::Column { .. } => return Err(InvariantViolation::OrphanColumn(node.id)),
                NodeKind::ColumnList => check_column_list(node, &mut seen)?,
                _ => check_text_block(node, &mut seen)?,
            }
        }
        Ok(())
    }

    // ── Editing gestures ─────────────────────────

    /// Indent a list item or leveled block by one level, capped at `MAX_LEVEL`.
    /// Returns the new level, or `None` if the block does not indent.
    pub fn indent(&mut self, id: BlockId) -> Option<u8> {
        let path = self.find(id)?;
        let node = self.node_mut(&path)?;
        if node.is_container() || !node.is_list_like() {
            return None;
        }
        let level = match node.level {
            Some(l) if l > 0 => (l + 1).min(MAX_LEVEL),
            _ => 1,
        };
        node.level = Some(level);
        Some(level)
    }

    /// Move the divider to the right of `left_column` so that the left column
    /// takes `fraction` of the pair's combined width. Neither column shrinks
    /// below `min_ratio`; the list total is unchanged.
    pub fn resize_divider(&mut self, left_column: BlockId, fraction: f64, min_ratio: f64) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let Some(left_path) = self.find(left_column) else {
            return false;
        };
        let Some(right_path) = left_path.next() else {
            return false;
        };
        let (Some(a), Some(b)) = (
            self.node(&left_path).and_then(Node::ratio),
            self.node(&right_path).and_then(Node::ratio),
        ) else {
            return false;
        };
        let combined = a + b;
        if combined < 2.0 * min_ratio {
            return false;
        }
        let left = (combined * fraction).clamp(min_ratio, combined - min_ratio);
        if let Some(node) = self.node_mut(&left_path) {
            node.set_ratio(left);
        }
        if let Some(node) = self.node_mut(&right_path) {
            node.set_ratio(combined - left);
        }
        true
    }

    /// Weighted character count of all block content.
    pub fn word_count(&self) -> usize {
        self.nodes.iter().map(Node::word_count).sum()
    }
}

fn check_column_list(list: &Node, seen: &mut HashSet<BlockId>) -> Result<(), InvariantViolation> {
    if !seen.insert(list.id) {
        return Err(InvariantViolation::DuplicateId(list.id));
    }
    if list.children.len() < 2 {
        return Err(InvariantViolation::UnderfilledColumnList {
            id: list.id,
            columns: list.children.len(),
        });
    }
    let mut sum = 0.0;
    for column in &list.children {
        let Some(ratio) = column.ratio() else {
            return Err(InvariantViolation::ForeignChild {
                id: list.id,
                child: column.id,
            });
        };
        if !seen.insert(column.id) {
            return Err(InvariantViolation::DuplicateId(column.id));
        }
        if column.children.is_empty() {
            return Err(InvariantViolation::EmptyContainer(column.id));
        }
        for child in &column.children {
            match child.kind {
                NodeKind::ColumnList => return Err(InvariantViolation::NestedColumnList(child.id)),
                NodeKind::Column { .. } => return Err(InvariantViolation::OrphanColumn(child.id)),
                _ => check_text_block(child, seen)?,
            }
        }
        sum += ratio;
    }
    if (sum - 1.0).abs() > RATIO_EPSILON {
        return Err(InvariantViolation::RatioSum { id: list.id, sum });
    }
    Ok(())
}

fn check_text_block(node: &Node, seen: &mut HashSet<BlockId>) -> Result<(), InvariantViolation> {
    if !seen.insert(node.id) {
        return Err(InvariantViolation::DuplicateId(node.id));
    }
    if !node.children.is_empty() {
        return Err(InvariantViolation::TextWithChildren(node.id));
    }
    match node.level {
        Some(level) if level > MAX_LEVEL => Err(InvariantViolation::LevelOutOfRange { id: node.id, level }),
        None if node.is_list_item() => Err(InvariantViolation::MissingLevel(node.id)),
        _ => Ok(()),
    }
}
