#[cfg(test)]
mod tests {
    use crate::{Document, InvariantViolation, MoveError, Node, NodeKind, Path, PathOp};
    use strata_core::{BlockId, Direction};

    fn para(id: BlockId) -> Node {
        Node::paragraph(id, format!("p{id}"))
    }

    fn item(id: BlockId, level: u8) -> Node {
        Node::list_item(id, level, format!("li{id}"))
    }

    fn col(id: BlockId, ratio: f64, children: Vec<Node>) -> Node {
        Node::column(id, ratio, children)
    }

    fn path(indices: &[usize]) -> Path {
        Path::from(indices)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn ratios(doc: &Document, list: BlockId) -> Vec<f64> {
        doc.node_by_id(list)
            .map(|l| l.children.iter().filter_map(Node::ratio).collect())
            .unwrap_or_default()
    }

    fn child_ids(doc: &Document, id: BlockId) -> Vec<BlockId> {
        doc.node_by_id(id)
            .map(|n| n.children.iter().map(|c| c.id).collect())
            .unwrap_or_default()
    }

    /// Two columns `11` and `12` in list `10`, followed by a paragraph `4`.
    fn two_columns() -> Document {
        Document::from_nodes(vec![
            Node::column_list(
                10,
                vec![col(11, 0.5, vec![para(1), para(2)]), col(12, 0.5, vec![para(3)])],
            ),
            para(4),
        ])
    }

    // ── Path ────────────────────────────────────

    #[test]
    fn path_navigation() {
        let p = path(&[2, 1]);
        assert_eq!(p.parent(), Some(path(&[2])));
        assert_eq!(p.next(), Some(path(&[2, 2])));
        assert_eq!(p.previous(), Some(path(&[2, 0])));
        assert_eq!(path(&[2, 0]).previous(), None);
        assert_eq!(p.child(4), path(&[2, 1, 4]));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(Path::root().next(), None);
    }

    #[test]
    fn path_relations() {
        assert!(path(&[1]).is_ancestor_of(&path(&[1, 0])));
        assert!(!path(&[1]).is_ancestor_of(&path(&[1])));
        assert!(!path(&[1, 0]).is_ancestor_of(&path(&[1])));
        assert!(path(&[1, 0]).is_sibling_of(&path(&[1, 3])));
        assert!(!path(&[1, 0]).is_sibling_of(&path(&[2, 0])));
        assert!(!path(&[1]).is_sibling_of(&path(&[1])));
    }

    #[test]
    fn path_order_is_document_order() {
        let mut paths = vec![path(&[1]), path(&[0, 1]), path(&[1, 0]), path(&[0])];
        paths.sort();
        assert_eq!(paths, vec![path(&[0]), path(&[0, 1]), path(&[1]), path(&[1, 0])]);
    }

    #[test]
    fn path_transform_insert_and_remove() {
        let p = path(&[2, 1]);
        assert_eq!(p.transform(&PathOp::Insert(path(&[0]))), Some(path(&[3, 1])));
        assert_eq!(p.transform(&PathOp::Insert(path(&[2, 1]))), Some(path(&[2, 2])));
        assert_eq!(p.transform(&PathOp::Insert(path(&[2, 2]))), Some(path(&[2, 1])));
        assert_eq!(p.transform(&PathOp::Insert(path(&[3]))), Some(path(&[2, 1])));
        assert_eq!(p.transform(&PathOp::Remove(path(&[1]))), Some(path(&[1, 1])));
        assert_eq!(p.transform(&PathOp::Remove(path(&[2]))), None);
        assert_eq!(p.transform(&PathOp::Remove(path(&[2, 1]))), None);
        assert_eq!(p.transform(&PathOp::Remove(path(&[2, 0]))), Some(path(&[2, 0])));
    }

    #[test]
    fn path_transform_move() {
        let op = PathOp::Move {
            from: path(&[0]),
            to: path(&[2, 0]),
        };
        // The moved subtree is re-rooted.
        assert_eq!(path(&[0, 3]).transform(&op), Some(path(&[2, 0, 3])));
        // Siblings after the source shift down, then up again below the insertion.
        assert_eq!(path(&[1]).transform(&op), Some(path(&[0])));
        assert_eq!(path(&[3, 0]).transform(&op), Some(path(&[2, 1])));
    }

    // ── Lookup and primitives ───────────────────

    #[test]
    fn find_locates_nested_blocks() {
        let doc = two_columns();
        assert_eq!(doc.find(10), Some(path(&[0])));
        assert_eq!(doc.find(2), Some(path(&[0, 0, 1])));
        assert_eq!(doc.find(3), Some(path(&[0, 1, 0])));
        assert_eq!(doc.find(4), Some(path(&[1])));
        assert_eq!(doc.find(99), None);
        assert_eq!(doc.block_ids(), vec![10, 11, 1, 2, 12, 3, 4]);
        assert!(doc.is_first_child(1));
        assert!(!doc.is_first_child(2));
        assert_eq!(doc.previous_sibling(2).map(|n| n.id), Some(1));
    }

    #[test]
    fn fresh_ids_start_above_existing() {
        let mut doc = two_columns();
        assert_eq!(doc.alloc_id(), 13);
        assert_eq!(doc.alloc_id(), 14);
    }

    #[test]
    fn path_refs_follow_edits() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3)]);
        let r = doc.path_ref(path(&[2]));
        doc.remove_node(&path(&[0])).unwrap();
        assert_eq!(doc.ref_path(r), Some(path(&[1])));
        doc.insert_node(&path(&[0]), para(9)).unwrap();
        assert_eq!(doc.ref_path(r), Some(path(&[2])));
        doc.move_node(&path(&[2]), &path(&[0])).unwrap();
        assert_eq!(doc.ref_path(r), Some(path(&[0])));
        doc.remove_node(&path(&[0])).unwrap();
        assert_eq!(doc.ref_path(r), None);
        assert_eq!(doc.unref(r), None);
    }

    #[test]
    fn primitives_reject_bad_paths() {
        let mut doc = Document::from_nodes(vec![para(1)]);
        assert_eq!(doc.insert_node(&path(&[5]), para(2)), Err(MoveError::InvalidPath));
        assert_eq!(doc.remove_node(&path(&[1])).map(|n| n.id), Err(MoveError::InvalidPath));
        assert_eq!(doc.move_node(&path(&[0]), &path(&[3])), Err(MoveError::InvalidPath));
        assert_eq!(doc.block_ids(), vec![1]);
    }

    // ── Top / bottom moves ──────────────────────

    #[test]
    fn move_bottom_forward_past_target() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4)]);
        doc.move_block(&path(&[0]), &path(&[2]), Direction::Bottom, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![2, 3, 1, 4]);
    }

    #[test]
    fn move_bottom_backward() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4)]);
        doc.move_block(&path(&[3]), &path(&[0]), Direction::Bottom, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![1, 4, 2, 3]);
    }

    #[test]
    fn move_top_lands_before_target() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4)]);
        doc.move_block(&path(&[0]), &path(&[2]), Direction::Top, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![2, 1, 3, 4]);
        doc.move_block(&path(&[3]), &path(&[0]), Direction::Top, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![4, 2, 1, 3]);
    }

    #[test]
    fn move_into_column() {
        let mut doc = two_columns();
        doc.move_block_by_id(4, 3, Direction::Top, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![10]);
        assert_eq!(child_ids(&doc, 12), vec![4, 3]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn move_between_columns() {
        let mut doc = two_columns();
        doc.move_block_by_id(1, 3, Direction::Bottom, false).unwrap();
        assert_eq!(child_ids(&doc, 11), vec![2]);
        assert_eq!(child_ids(&doc, 12), vec![3, 1]);
        assert!(doc.check_invariants().is_ok());
    }

    // ── Levels ──────────────────────────────────

    #[test]
    fn nesting_under_list_item_increments_level() {
        let mut doc = Document::from_nodes(vec![item(1, 2), para(2)]);
        doc.move_block_by_id(2, 1, Direction::Bottom, true).unwrap();
        let moved = doc.node_by_id(2).unwrap();
        assert_eq!(moved.kind, NodeKind::ListItem);
        assert_eq!(moved.level, Some(3));
    }

    #[test]
    fn bottom_drop_on_list_item_takes_its_level() {
        let mut doc = Document::from_nodes(vec![item(1, 2), para(2)]);
        doc.move_block_by_id(2, 1, Direction::Bottom, false).unwrap();
        let moved = doc.node_by_id(2).unwrap();
        assert_eq!(moved.kind, NodeKind::ListItem);
        assert_eq!(moved.level, Some(2));
    }

    #[test]
    fn nesting_clamps_at_max_level() {
        let mut doc = Document::from_nodes(vec![item(1, 6), item(2, 0)]);
        doc.move_block_by_id(2, 1, Direction::Bottom, true).unwrap();
        assert_eq!(doc.node_by_id(2).unwrap().level, Some(6));
    }

    #[test]
    fn heading_keeps_kind_under_list() {
        let mut doc = Document::from_nodes(vec![item(1, 1), Node::heading(2, 2, "title")]);
        doc.move_block_by_id(2, 1, Direction::Bottom, true).unwrap();
        let moved = doc.node_by_id(2).unwrap();
        assert_eq!(moved.kind, NodeKind::Heading(2));
        assert_eq!(moved.level, Some(2));
    }

    #[test]
    fn leaving_a_list_strips_level_of_plain_blocks() {
        let mut doc = Document::from_nodes(vec![
            para(1),
            para(2).with_level(Some(3)),
            item(3, 2),
        ]);
        doc.move_block_by_id(2, 1, Direction::Bottom, false).unwrap();
        assert_eq!(doc.node_by_id(2).unwrap().level, None);
        doc.move_block_by_id(3, 1, Direction::Top, false).unwrap();
        let list_item = doc.node_by_id(3).unwrap();
        assert_eq!(list_item.kind, NodeKind::ListItem);
        assert_eq!(list_item.level, Some(2));
        assert_eq!(doc.top_level_ids(), vec![3, 1, 2]);
    }

    // ── Splitting into columns ──────────────────

    #[test]
    fn left_drop_splits_target_into_columns() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3)]);
        doc.move_block(&path(&[0]), &path(&[2]), Direction::Left, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![2, 4]);
        let list = doc.node_by_id(4).unwrap();
        assert!(list.is_column_list());
        assert_eq!(child_ids(&doc, 4), vec![5, 6]);
        assert_eq!(child_ids(&doc, 5), vec![1]);
        assert_eq!(child_ids(&doc, 6), vec![3]);
        assert_eq!(ratios(&doc, 4), vec![0.5, 0.5]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn right_drop_puts_source_second() {
        let mut doc = Document::from_nodes(vec![para(1), para(2)]);
        doc.move_block_by_id(2, 1, Direction::Right, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![3]);
        assert_eq!(child_ids(&doc, 4), vec![1]);
        assert_eq!(child_ids(&doc, 5), vec![2]);
    }

    #[test]
    fn split_strips_level_of_moved_paragraph() {
        let mut doc = Document::from_nodes(vec![para(1).with_level(Some(2)), para(2)]);
        doc.move_block_by_id(1, 2, Direction::Left, false).unwrap();
        assert_eq!(doc.node_by_id(1).unwrap().level, None);
    }

    #[test]
    fn left_drop_on_next_sibling_splits_it() {
        let mut doc = Document::from_nodes(vec![para(1), para(2)]);
        doc.move_block_by_id(1, 2, Direction::Left, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![3]);
        assert_eq!(child_ids(&doc, 3), vec![4, 5]);
        assert_eq!(child_ids(&doc, 4), vec![1]);
        assert_eq!(child_ids(&doc, 5), vec![2]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn split_of_nested_block_is_rejected() {
        let mut doc = two_columns();
        let before = doc.nodes().to_vec();
        let result = doc.move_block_by_id(4, 1, Direction::Left, false);
        assert!(matches!(result, Err(MoveError::IllegalPlacement(_))));
        assert_eq!(doc.nodes(), before.as_slice());
    }

    #[test]
    fn split_then_move_back_restores_flat_tree() {
        let original = vec![para(1), para(2), para(3)];
        let mut doc = Document::from_nodes(original.clone());
        doc.move_block_by_id(2, 3, Direction::Left, false).unwrap();
        assert_eq!(doc.top_level_ids().len(), 2);
        doc.move_block_by_id(2, 1, Direction::Bottom, false).unwrap();
        assert_eq!(doc.nodes(), original.as_slice());
    }

    // ── Adding columns ──────────────────────────

    #[test]
    fn new_column_gets_equal_share() {
        let mut doc = two_columns();
        doc.move_block_by_id(4, 12, Direction::Right, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![10]);
        assert_eq!(child_ids(&doc, 10), vec![11, 12, 13]);
        assert_eq!(child_ids(&doc, 13), vec![4]);
        for r in ratios(&doc, 10) {
            assert!(approx_eq(r, 1.0 / 3.0));
        }
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn new_column_scales_others_proportionally() {
        let mut doc = Document::from_nodes(vec![
            Node::column_list(10, vec![col(11, 0.25, vec![para(1)]), col(12, 0.75, vec![para(2)])]),
            para(3),
        ]);
        doc.move_block_by_id(3, 11, Direction::Left, false).unwrap();
        assert_eq!(child_ids(&doc, 10), vec![13, 11, 12]);
        let r = ratios(&doc, 10);
        assert!(approx_eq(r[0], 1.0 / 3.0));
        assert!(approx_eq(r[1], 0.25 * 2.0 / 3.0));
        assert!(approx_eq(r[2], 0.75 * 2.0 / 3.0));
    }

    #[test]
    fn moving_block_out_of_its_column_into_a_new_one() {
        let mut doc = two_columns();
        doc.move_block_by_id(1, 11, Direction::Right, false).unwrap();
        assert_eq!(child_ids(&doc, 10), vec![11, 13, 12]);
        assert_eq!(child_ids(&doc, 11), vec![2]);
        assert_eq!(child_ids(&doc, 13), vec![1]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn block_above_list_opens_new_column() {
        let mut doc = Document::from_nodes(vec![
            para(1),
            Node::column_list(10, vec![col(11, 0.5, vec![para(2)]), col(12, 0.5, vec![para(3)])]),
        ]);
        doc.move_block_by_id(1, 12, Direction::Right, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![10]);
        assert_eq!(child_ids(&doc, 10), vec![11, 12, 13]);
        assert_eq!(child_ids(&doc, 13), vec![1]);
        assert!(ratios(&doc, 10).iter().all(|r| approx_eq(*r, 1.0 / 3.0)));
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn lone_block_beside_its_own_column_is_degenerate() {
        let mut doc = Document::from_nodes(vec![Node::column_list(
            10,
            vec![col(11, 0.5, vec![para(1)]), col(12, 0.5, vec![para(2)])],
        )]);
        let before = doc.nodes().to_vec();
        for (target, direction) in [
            (11, Direction::Left),
            (11, Direction::Right),
            (12, Direction::Left),
        ] {
            assert_eq!(
                doc.move_block_by_id(1, target, direction, false),
                Err(MoveError::DegenerateMove)
            );
            assert_eq!(doc.nodes(), before.as_slice());
        }
    }

    #[test]
    fn lone_block_to_far_side_swaps_columns() {
        let mut doc = Document::from_nodes(vec![Node::column_list(
            10,
            vec![col(11, 0.5, vec![para(1)]), col(12, 0.5, vec![para(2)])],
        )]);
        doc.move_block_by_id(1, 12, Direction::Right, false).unwrap();
        assert_eq!(child_ids(&doc, 10), vec![12, 13]);
        assert_eq!(ratios(&doc, 10), vec![0.5, 0.5]);
        assert!(doc.check_invariants().is_ok());
    }

    // ── Pruning ─────────────────────────────────

    #[test]
    fn emptied_column_dissolves_two_column_list() {
        let mut doc = Document::from_nodes(vec![
            Node::column_list(10, vec![col(11, 0.5, vec![para(1)]), col(12, 0.5, vec![para(2)])]),
            para(3),
        ]);
        doc.move_block_by_id(1, 3, Direction::Bottom, false).unwrap();
        assert_eq!(doc.nodes(), &[para(2), para(3), para(1)]);
    }

    #[test]
    fn emptied_column_of_three_is_removed_and_ratios_renormalized() {
        let mut doc = Document::from_nodes(vec![
            Node::column_list(
                10,
                vec![
                    col(11, 0.2, vec![para(1)]),
                    col(12, 0.3, vec![para(2)]),
                    col(13, 0.5, vec![para(3)]),
                ],
            ),
            para(4),
        ]);
        doc.move_block_by_id(1, 4, Direction::Bottom, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![10, 4, 1]);
        assert_eq!(child_ids(&doc, 10), vec![12, 13]);
        let r = ratios(&doc, 10);
        assert!(approx_eq(r[0], 0.375));
        assert!(approx_eq(r[1], 0.625));
        assert!(doc.check_invariants().is_ok());
    }

    // ── Multi-block moves ───────────────────────

    #[test]
    fn multi_bottom_keeps_order_after_target() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4), para(5)]);
        doc.move_blocks(&[4, 1, 3], &path(&[1]), Direction::Bottom, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![2, 1, 3, 4, 5]);
    }

    #[test]
    fn multi_top_keeps_order_before_target() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4), para(5)]);
        doc.move_blocks(&[3, 4, 5], &path(&[0]), Direction::Top, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![3, 4, 5, 1, 2]);
    }

    #[test]
    fn multi_nesting_applies_to_first_moved_only() {
        let mut doc = Document::from_nodes(vec![item(1, 1), para(2), para(3)]);
        doc.move_blocks(&[2, 3], &path(&[0]), Direction::Bottom, true).unwrap();
        assert_eq!(doc.node_by_id(2).unwrap().level, Some(2));
        // The second block follows the first one's level without nesting further.
        assert_eq!(doc.node_by_id(3).unwrap().level, Some(2));
    }

    #[test]
    fn multi_skips_missing_ids() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3)]);
        doc.move_blocks(&[1, 42], &path(&[2]), Direction::Bottom, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![2, 3, 1]);
        assert_eq!(
            doc.move_blocks(&[41, 42], &path(&[0]), Direction::Bottom, false),
            Err(MoveError::InvalidPath)
        );
    }

    #[test]
    fn multi_split_puts_whole_set_in_one_column() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3), para(4)]);
        doc.move_blocks(&[1, 2], &path(&[3]), Direction::Right, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![3, 5]);
        assert_eq!(child_ids(&doc, 6), vec![4]);
        assert_eq!(child_ids(&doc, 7), vec![1, 2]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn multi_into_new_column_prunes_vacated_columns() {
        let mut doc = two_columns();
        doc.move_blocks(&[2, 3], &path(&[0, 1]), Direction::Right, false).unwrap();
        assert_eq!(child_ids(&doc, 10), vec![11, 13]);
        assert_eq!(child_ids(&doc, 11), vec![1]);
        assert_eq!(child_ids(&doc, 13), vec![2, 3]);
        assert_eq!(ratios(&doc, 10), vec![0.5, 0.5]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn multi_draining_every_column_flattens_the_list() {
        let mut doc = Document::from_nodes(vec![
            Node::column_list(10, vec![col(11, 0.5, vec![para(1)]), col(12, 0.5, vec![para(2)])]),
            para(3),
        ]);
        doc.move_blocks(&[1, 2, 3], &path(&[0, 1]), Direction::Right, false).unwrap();
        assert_eq!(doc.nodes(), &[para(1), para(2), para(3)]);
    }

    #[test]
    fn multi_full_column_beside_itself_is_degenerate() {
        let mut doc = two_columns();
        let before = doc.nodes().to_vec();
        assert_eq!(
            doc.move_blocks(&[1, 2], &path(&[0, 1]), Direction::Left, false),
            Err(MoveError::DegenerateMove)
        );
        assert_eq!(doc.nodes(), before.as_slice());
    }

    #[test]
    fn multi_subset_of_column_beside_itself_is_degenerate() {
        let mut doc = Document::from_nodes(vec![Node::column_list(
            10,
            vec![col(11, 0.5, vec![para(1), para(2), para(3)]), col(12, 0.5, vec![para(4)])],
        )]);
        let before = doc.nodes().to_vec();
        assert_eq!(
            doc.move_blocks(&[1, 2], &path(&[0, 1]), Direction::Left, false),
            Err(MoveError::DegenerateMove)
        );
        assert_eq!(doc.nodes(), before.as_slice());
    }

    #[test]
    fn one_block_of_several_opens_new_column_beside_its_own() {
        let mut doc = two_columns();
        doc.move_blocks(&[2], &path(&[0, 1]), Direction::Left, false).unwrap();
        assert_eq!(child_ids(&doc, 10), vec![11, 13, 12]);
        assert_eq!(child_ids(&doc, 13), vec![2]);
    }

    #[test]
    fn multi_split_of_next_siblings() {
        let mut doc = Document::from_nodes(vec![para(1), para(2), para(3)]);
        doc.move_blocks(&[1, 2], &path(&[2]), Direction::Left, false).unwrap();
        assert_eq!(doc.top_level_ids(), vec![4]);
        assert_eq!(child_ids(&doc, 5), vec![1, 2]);
        assert_eq!(child_ids(&doc, 6), vec![3]);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn multi_split_strips_levels_like_single_split() {
        let mut doc = Document::from_nodes(vec![
            para(1).with_level(Some(2)),
            para(2).with_level(Some(2)),
            para(9),
            para(3),
        ]);
        doc.move_blocks(&[1, 2], &path(&[3]), Direction::Left, false).unwrap();
        assert_eq!(doc.node_by_id(1).unwrap().level, None);
        assert_eq!(doc.node_by_id(2).unwrap().level, None);
    }

    #[test]
    fn multi_new_column_keeps_list_item_levels() {
        let mut doc = Document::from_nodes(vec![
            item(1, 2),
            para(2).with_level(Some(1)),
            Node::column_list(10, vec![col(11, 0.5, vec![para(3)]), col(12, 0.5, vec![para(4)])]),
        ]);
        doc.move_blocks(&[1, 2], &path(&[2, 1]), Direction::Right, false).unwrap();
        assert_eq!(doc.node_by_id(1).unwrap().level, Some(2));
        assert_eq!(doc.node_by_id(2).unwrap().level, None);
        assert!(doc.check_invariants().is_ok());
    }

    // ── Rejections ──────────────────────────────

    #[test]
    fn self_target_is_rejected() {
        let mut doc = Document::from_nodes(vec![para(1), para(2)]);
        assert_eq!(
            doc.move_block_by_id(1, 1, Direction::Bottom, false),
            Err(MoveError::SelfTarget(1))
        );
        assert_eq!(
            doc.move_blocks(&[1, 2], &path(&[1]), Direction::Top, false),
            Err(MoveError::SelfTarget(2))
        );
    }

    #[test]
    fn stale_paths_are_rejected() {
        let mut doc = Document::from_nodes(vec![para(1), para(2)]);
        assert_eq!(
            doc.move_block(&path(&[5]), &path(&[0]), Direction::Bottom, false),
            Err(MoveError::InvalidPath)
        );
        assert_eq!(
            doc.move_block(&path(&[0]), &path(&[0, 3]), Direction::Bottom, false),
            Err(MoveError::InvalidPath)
        );
    }

    #[test]
    fn containers_cannot_be_dragged_or_flanked() {
        let mut doc = two_columns();
        let before = doc.nodes().to_vec();
        assert!(matches!(
            doc.move_block_by_id(10, 4, Direction::Bottom, false),
            Err(MoveError::IllegalPlacement(_))
        ));
        assert!(matches!(
            doc.move_block_by_id(4, 11, Direction::Bottom, false),
            Err(MoveError::IllegalPlacement(_))
        ));
        assert!(matches!(
            doc.move_block_by_id(4, 10, Direction::Left, false),
            Err(MoveError::IllegalPlacement(_))
        ));
        assert_eq!(doc.nodes(), before.as_slice());
    }

    // ── Gestures ────────────────────────────────

    #[test]
    fn indent_list_blocks() {
        let mut doc = Document::from_nodes(vec![
            item(1, 1),
            item(2, 6),
            item(3, 0),
            para(4),
            para(5).with_level(Some(2)),
        ]);
        assert_eq!(doc.indent(1), Some(2));
        assert_eq!(doc.indent(2), Some(6));
        assert_eq!(doc.indent(3), Some(1));
        assert_eq!(doc.indent(4), None);
        assert_eq!(doc.indent(5), Some(3));
        assert_eq!(doc.indent(99), None);
    }

    #[test]
    fn divider_resize_clamps_and_keeps_total() {
        let mut doc = two_columns();
        assert!(doc.resize_divider(11, 0.3, crate::MIN_RATIO));
        let r = ratios(&doc, 10);
        assert!(approx_eq(r[0], 0.3) && approx_eq(r[1], 0.7));
        assert!(doc.resize_divider(11, 0.0, crate::MIN_RATIO));
        let r = ratios(&doc, 10);
        assert!(approx_eq(r[0], 0.1) && approx_eq(r[1], 0.9));
        // No column to the right of the last one.
        assert!(!doc.resize_divider(12, 0.5, crate::MIN_RATIO));
        assert!(!doc.resize_divider(4, 0.5, crate::MIN_RATIO));
    }

    #[test]
    fn word_count_weighs_wide_characters() {
        let doc = Document::from_nodes(vec![
            Node::paragraph(1, "ab"),
            Node::column_list(
                2,
                vec![
                    col(3, 0.5, vec![Node::paragraph(4, "你好")]),
                    col(5, 0.5, vec![Node::paragraph(6, "é")]),
                ],
            ),
        ]);
        assert_eq!(doc.word_count(), 2 + 4 + 1);
    }

    // ── Invariant checks ────────────────────────

    #[test]
    fn invariant_check_reports_broken_shapes() {
        let single = Document::from_nodes(vec![Node::column_list(1, vec![col(2, 1.0, vec![para(3)])])]);
        assert_eq!(
            single.check_invariants(),
            Err(InvariantViolation::UnderfilledColumnList { id: 1, columns: 1 })
        );

        let skewed = Document::from_nodes(vec![Node::column_list(
            1,
            vec![col(2, 0.5, vec![para(3)]), col(4, 0.6, vec![para(5)])],
        )]);
        assert!(matches!(
            skewed.check_invariants(),
            Err(InvariantViolation::RatioSum { id: 1, .. })
        ));

        let orphan = Document::from_nodes(vec![col(1, 1.0, vec![para(2)])]);
        assert_eq!(orphan.check_invariants(), Err(InvariantViolation::OrphanColumn(1)));

        let bare = Document::from_nodes(vec![item(1, 0).with_level(None)]);
        assert_eq!(bare.check_invariants(), Err(InvariantViolation::MissingLevel(1)));

        let empty = Document::from_nodes(vec![Node::column_list(
            1,
            vec![col(2, 0.5, vec![]), col(4, 0.5, vec![para(5)])],
        )]);
        assert_eq!(empty.check_invariants(), Err(InvariantViolation::EmptyContainer(2)));

        assert!(two_columns().check_invariants().is_ok());
    }
}
