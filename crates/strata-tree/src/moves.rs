// Structural moves: reorder, nest, split into columns, collapse columns.
//
// Every public entry point runs on a scratch copy and only replaces the
// document when the whole move succeeded.

use strata_core::{BlockId, Direction};

use crate::{Document, MoveError, Node, NodeKind, Path, PathOp, PathRef, MAX_LEVEL};

/// What the move logic needs to know about the drop target.
struct Anchor {
    id: BlockId,
    is_column: bool,
    is_container: bool,
    list_item: bool,
    list_like: bool,
    level: Option<u8>,
}

impl Anchor {
    fn of(node: &Node) -> Self {
        Self {
            id: node.id,
            is_column: node.is_column(),
            is_container: node.is_container(),
            list_item: node.is_list_item(),
            list_like: node.is_list_like(),
            level: node.level,
        }
    }
}

impl Document {
    /// Move the block at `source` against the `direction` edge of the block
    /// at `target`. `nested` indents a bottom drop onto a list block.
    pub fn move_block(
        &mut self,
        source: &Path,
        target: &Path,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let mut scratch = self.clone();
        match scratch.move_single(source, target, direction, nested) {
            Ok(()) => {
                *self = scratch;
                Ok(())
            }
            Err(e) => {
                log::debug!("move {} -> {} {:?} rejected: {}", source, target, direction, e);
                Err(e)
            }
        }
    }

    pub fn move_block_by_id(
        &mut self,
        source: BlockId,
        target: BlockId,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let source = self.find(source).ok_or(MoveError::InvalidPath)?;
        let target = self.find(target).ok_or(MoveError::InvalidPath)?;
        self.move_block(&source, &target, direction, nested)
    }

    /// Move a set of blocks as one unit. Ids that no longer resolve are
    /// skipped; the rest keep their relative document order.
    pub fn move_blocks(
        &mut self,
        sources: &[BlockId],
        target: &Path,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let mut scratch = self.clone();
        match scratch.move_many(sources, target, direction, nested) {
            Ok(()) => {
                *self = scratch;
                Ok(())
            }
            Err(e) => {
                log::debug!("move of {} blocks -> {} {:?} rejected: {}", sources.len(), target, direction, e);
                Err(e)
            }
        }
    }

    // ── Single block ─────────────────────────────

    fn move_single(
        &mut self,
        source: &Path,
        target: &Path,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let moved = self.node(source).ok_or(MoveError::InvalidPath)?;
        let moved_id = moved.id;
        if moved.is_container() {
            return Err(MoveError::IllegalPlacement("only text blocks can be moved"));
        }
        let anchor = Anchor::of(self.node(target).ok_or(MoveError::InvalidPath)?);
        if source == target || source.is_ancestor_of(target) {
            return Err(MoveError::SelfTarget(moved_id));
        }
        let former_parent = source.parent().ok_or(MoveError::InvalidPath)?;

        let source_ref = self.path_ref(source.clone());
        let parent_ref = self.path_ref(former_parent);
        let result = match direction {
            Direction::Top | Direction::Bottom => {
                self.place_beside(source, target, &anchor, direction, nested)
            }
            _ if anchor.is_column => self.place_in_new_column(&[source_ref], target, direction),
            _ => self.split_target(&[source_ref], target, direction),
        };
        let moved_at = self.unref(source_ref);
        let vacated = self.unref(parent_ref);
        result?;

        if !anchor.list_item && anchor.level.is_none() {
            if let Some(path) = moved_at {
                self.strip_level(&path);
            }
        }
        self.prune(vacated)
    }

    /// Top/bottom drop: reinsert the source right before or after the target.
    fn place_beside(
        &mut self,
        source: &Path,
        target: &Path,
        anchor: &Anchor,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        if anchor.is_column {
            return Err(MoveError::IllegalPlacement("blocks cannot sit beside columns"));
        }
        if anchor.list_like {
            let level = if nested {
                Some(anchor.level.unwrap_or(0).saturating_add(1).min(MAX_LEVEL))
            } else {
                anchor.level
            };
            let node = self.node_mut(source).ok_or(MoveError::InvalidPath)?;
            if node.kind == NodeKind::Paragraph {
                node.kind = NodeKind::ListItem;
            }
            node.level = if node.is_list_item() {
                Some(level.unwrap_or(0))
            } else {
                level
            };
        }

        let anchor_path = target
            .transform(&PathOp::Remove(source.clone()))
            .ok_or(MoveError::InvalidPath)?;
        let at = match direction {
            Direction::Top => anchor_path,
            _ => anchor_path.next().ok_or(MoveError::InvalidPath)?,
        };
        self.move_node(source, &at)
    }

    // ── Multiple blocks ──────────────────────────

    fn move_many(
        &mut self,
        sources: &[BlockId],
        target: &Path,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let anchor = Anchor::of(self.node(target).ok_or(MoveError::InvalidPath)?);
        if sources.contains(&anchor.id) {
            return Err(MoveError::SelfTarget(anchor.id));
        }
        let mut paths: Vec<Path> = sources.iter().filter_map(|&id| self.find(id)).collect();
        paths.sort();
        paths.dedup();
        if paths.is_empty() {
            return Err(MoveError::InvalidPath);
        }
        if paths.iter().any(|p| self.node(p).is_some_and(Node::is_container)) {
            return Err(MoveError::IllegalPlacement("only text blocks can be moved"));
        }
        if let [only] = paths.as_slice() {
            return self.move_single(only, target, direction, nested);
        }

        let handles: Vec<PathRef> = paths.into_iter().map(|p| self.path_ref(p)).collect();
        let result = match direction {
            Direction::Top | Direction::Bottom => {
                self.chain_moves(&handles, target, direction, nested)
            }
            _ if anchor.is_column => self.place_in_new_column(&handles, target, direction),
            _ => self.split_target(&handles, target, direction),
        };
        let moved: Vec<Option<Path>> = handles.into_iter().map(|h| self.unref(h)).collect();
        result?;

        // Chained moves already stripped per block.
        if direction.is_horizontal() && !anchor.list_item && anchor.level.is_none() {
            for path in moved.into_iter().flatten() {
                self.strip_level(&path);
            }
        }
        Ok(())
    }

    /// Drop the level of a plain block; list items keep theirs.
    fn strip_level(&mut self, path: &Path) {
        if let Some(node) = self.node_mut(path) {
            if !node.is_list_item() {
                node.level = None;
            }
        }
    }

    /// Each moved block becomes the anchor for the next one, so the set ends
    /// up contiguous and in its original order.
    fn chain_moves(
        &mut self,
        handles: &[PathRef],
        target: &Path,
        direction: Direction,
        nested: bool,
    ) -> Result<(), MoveError> {
        let mut order = handles.to_vec();
        if direction == Direction::Top {
            order.reverse();
        }
        let mut anchor = target.clone();
        let mut nested = nested;
        for handle in order {
            let Some(from) = self.ref_path(handle) else {
                continue;
            };
            self.move_single(&from, &anchor, direction, nested)?;
            nested = false;
            anchor = self.ref_path(handle).ok_or(MoveError::InvalidPath)?;
        }
        Ok(())
    }

    // ── Columns ──────────────────────────────────

    /// Left/right drop onto a plain block: replace it with a two-column list,
    /// one column holding the sources, the other the original block.
    fn split_target(
        &mut self,
        sources: &[PathRef],
        target: &Path,
        direction: Direction,
    ) -> Result<(), MoveError> {
        let anchor = self.node(target).ok_or(MoveError::InvalidPath)?;
        if target.len() != 1 || anchor.is_container() {
            return Err(MoveError::IllegalPlacement(
                "columns can only be created from top-level blocks",
            ));
        }

        let list_id = self.alloc_id();
        let first = self.alloc_id();
        let second = self.alloc_id();
        let (source_side, target_side) = match direction {
            Direction::Left => (0, 1),
            _ => (1, 0),
        };
        let target_ref = self.path_ref(target.clone());
        self.insert_node(
            target,
            Node::column_list(
                list_id,
                vec![Node::column(first, 0.5, Vec::new()), Node::column(second, 0.5, Vec::new())],
            ),
        )?;

        let original = self.unref(target_ref).ok_or(MoveError::InvalidPath)?;
        let column = self.column_after_removal(list_id, target_side, &original)?;
        self.move_node(&original, &column.child(0))?;

        let mut count = 0;
        for &handle in sources {
            let Some(from) = self.ref_path(handle) else {
                continue;
            };
            let vacated = self.path_ref(from.parent().ok_or(MoveError::InvalidPath)?);
            let column = self.column_after_removal(list_id, source_side, &from)?;
            self.move_node(&from, &column.child(count))?;
            count += 1;
            let vacated = self.unref(vacated);
            self.prune(vacated)?;
        }
        Ok(())
    }

    /// Path of column `index` of list `list_id`, as addressed once `removed` is gone.
    fn column_after_removal(
        &self,
        list_id: BlockId,
        index: usize,
        removed: &Path,
    ) -> Result<Path, MoveError> {
        self.find(list_id)
            .map(|list| list.child(index))
            .and_then(|p| p.transform(&PathOp::Remove(removed.clone())))
            .ok_or(MoveError::InvalidPath)
    }

    /// Left/right drop onto a column: open a new column beside it and move
    /// the sources in, then rebalance the list.
    fn place_in_new_column(
        &mut self,
        sources: &[PathRef],
        target: &Path,
        direction: Direction,
    ) -> Result<(), MoveError> {
        let list_path = target.parent().ok_or(MoveError::InvalidPath)?;
        let column_index = target.last().ok_or(MoveError::InvalidPath)?;
        let insert_at = match direction {
            Direction::Left => column_index,
            Direction::Right => column_index + 1,
            _ => return Err(MoveError::IllegalPlacement("columns open to the left or right")),
        };

        let paths: Vec<Path> = sources.iter().filter_map(|&h| self.ref_path(h)).collect();
        if paths.is_empty() {
            return Err(MoveError::InvalidPath);
        }
        if self.drops_column_beside_itself(&paths, &list_path, insert_at) {
            return Err(MoveError::DegenerateMove);
        }

        let column_id = self.alloc_id();
        self.insert_node(&list_path.child(insert_at), Node::column(column_id, 0.0, Vec::new()))?;

        let mut count = 0;
        let mut previous: Option<PathRef> = None;
        for &handle in sources {
            let Some(from) = self.ref_path(handle) else {
                continue;
            };
            let vacated = self.path_ref(from.parent().ok_or(MoveError::InvalidPath)?);
            let removal = PathOp::Remove(from.clone());
            let to = match self.find(column_id) {
                Some(column) => column.transform(&removal).map(|c| c.child(count)),
                // Emptying every other column dissolved the list around the
                // new column: keep stacking after the block moved last.
                None => previous
                    .and_then(|h| self.ref_path(h))
                    .and_then(|p| p.transform(&removal))
                    .and_then(|p| p.next()),
            }
            .ok_or(MoveError::InvalidPath)?;
            self.move_node(&from, &to)?;
            count += 1;
            previous = Some(handle);
            let vacated = self.unref(vacated);
            self.prune(vacated)?;
        }

        if let Some(list) = self.find(column_id).and_then(|p| p.parent()) {
            self.rebalance(&list, column_id);
        }
        Ok(())
    }

    /// The sources all sit in one column of this list and the new column
    /// would open directly beside it.
    fn drops_column_beside_itself(&self, paths: &[Path], list_path: &Path, insert_at: usize) -> bool {
        let Some(parent) = paths[0].parent() else {
            return false;
        };
        if parent.parent().as_ref() != Some(list_path) {
            return false;
        }
        if paths.iter().any(|p| p.parent().as_ref() != Some(&parent)) {
            return false;
        }
        let Some(column) = self.node(&parent) else {
            return false;
        };
        // A single block only stays put when it is its column's lone child.
        if paths.len() == 1 && column.children.len() != 1 {
            return false;
        }
        parent
            .last()
            .is_some_and(|index| insert_at == index || insert_at == index + 1)
    }

    /// New column gets `1/n`; the others share the rest in proportion to
    /// their current ratios.
    fn rebalance(&mut self, list: &Path, fresh: BlockId) {
        let Some(list) = self.node_mut(list) else {
            return;
        };
        let n = list.children.len() as f64;
        let share = 1.0 / n;
        let others: f64 = list
            .children
            .iter()
            .filter(|c| c.id != fresh)
            .filter_map(Node::ratio)
            .sum();
        for column in &mut list.children {
            let ratio = if column.id == fresh {
                share
            } else if others > 0.0 {
                column.ratio().unwrap_or(0.0) / others * (1.0 - share)
            } else {
                (1.0 - share) / (n - 1.0)
            };
            column.set_ratio(ratio);
        }
    }

    /// Scale column ratios back to a sum of 1 after a column was removed.
    fn renormalize(&mut self, list: &Path) {
        let Some(list) = self.node_mut(list) else {
            return;
        };
        let n = list.children.len() as f64;
        let sum: f64 = list.children.iter().filter_map(Node::ratio).sum();
        for column in &mut list.children {
            let ratio = if sum > 0.0 {
                column.ratio().unwrap_or(0.0) / sum
            } else {
                1.0 / n
            };
            column.set_ratio(ratio);
        }
    }

    // ── Cleanup ──────────────────────────────────

    /// Remove a container that a move left empty. An emptied column of a
    /// two-column list dissolves the list.
    fn prune(&mut self, vacated: Option<Path>) -> Result<(), MoveError> {
        let Some(path) = vacated else {
            return Ok(());
        };
        let Some(node) = self.node(&path) else {
            return Ok(());
        };
        if !node.children.is_empty() {
            return Ok(());
        }
        if node.is_column() {
            let emptied = node.id;
            let list = path.parent().ok_or(MoveError::InvalidPath)?;
            let columns = self.children(&list).map_or(0, <[Node]>::len);
            if columns <= 2 {
                return self.dissolve(&list, emptied);
            }
            self.remove_node(&path)?;
            self.renormalize(&list);
            return Ok(());
        }
        self.remove_node(&path).map(|_| ())
    }

    /// Splice the surviving column's blocks into the list's place and drop
    /// the list.
    fn dissolve(&mut self, list: &Path, emptied: BlockId) -> Result<(), MoveError> {
        let survivor = self
            .children(list)
            .and_then(|columns| columns.iter().position(|c| c.id != emptied));
        if let Some(index) = survivor {
            let column = list.child(index);
            let count = self.node(&column).map_or(0, |c| c.children.len());
            let mut at = list.next().ok_or(MoveError::InvalidPath)?;
            for _ in 0..count {
                self.move_node(&column.child(0), &at)?;
                at = at.next().ok_or(MoveError::InvalidPath)?;
            }
        }
        log::trace!("dissolved column list at {}", list);
        self.remove_node(list).map(|_| ())
    }
}
