use strata_core::BlockId;

/// Deepest indentation level a block may carry.
pub const MAX_LEVEL: u8 = 6;

// ──────────────────────────────────────────────
// Node: one block of the document tree
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Paragraph,
    Heading(u8),
    ListItem,
    /// One column of a column list; `ratio` is its share of the list width.
    Column { ratio: f64 },
    ColumnList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: BlockId,
    pub kind: NodeKind,
    /// Indentation level. List items always carry one.
    pub level: Option<u8>,
    /// Opaque leaf content of text blocks.
    pub content: String,
    pub children: Vec<Node>,
}

impl Node {
    fn text(id: BlockId, kind: NodeKind, content: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            level: None,
            content: content.into(),
            children: Vec::new(),
        }
    }

    pub fn paragraph(id: BlockId, content: impl Into<String>) -> Self {
        Self::text(id, NodeKind::Paragraph, content)
    }

    pub fn heading(id: BlockId, rank: u8, content: impl Into<String>) -> Self {
        Self::text(id, NodeKind::Heading(rank), content)
    }

    pub fn list_item(id: BlockId, level: u8, content: impl Into<String>) -> Self {
        Self::text(id, NodeKind::ListItem, content).with_level(Some(level))
    }

    pub fn column(id: BlockId, ratio: f64, children: Vec<Node>) -> Self {
        Self {
            id,
            kind: NodeKind::Column { ratio },
            level: None,
            content: String::new(),
            children,
        }
    }

    pub fn column_list(id: BlockId, columns: Vec<Node>) -> Self {
        Self {
            id,
            kind: NodeKind::ColumnList,
            level: None,
            content: String::new(),
            children: columns,
        }
    }

    pub fn with_level(mut self, level: Option<u8>) -> Self {
        self.level = level;
        self
    }

    pub fn is_column(&self) -> bool {
        matches!(self.kind, NodeKind::Column { .. })
    }

    pub fn is_column_list(&self) -> bool {
        matches!(self.kind, NodeKind::ColumnList)
    }

    /// Columns and column lists hold blocks; everything else holds content.
    pub fn is_container(&self) -> bool {
        self.is_column() || self.is_column_list()
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self.kind, NodeKind::ListItem)
    }

    /// List items and indented blocks take part in list nesting.
    pub fn is_list_like(&self) -> bool {
        self.is_list_item() || self.level.is_some_and(|l| l > 0)
    }

    pub fn ratio(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Column { ratio } => Some(ratio),
            _ => None,
        }
    }

    pub(crate) fn set_ratio(&mut self, value: f64) {
        if let NodeKind::Column { ratio } = &mut self.kind {
            *ratio = value;
        }
    }

    /// Find the child-index path to the node with the given id.
    pub(crate) fn find_path(&self, id: BlockId, out: &mut Vec<usize>) -> bool {
        if self.id == id {
            return true;
        }
        for (i, child) in self.children.iter().enumerate() {
            out.push(i);
            if child.find_path(id, out) {
                return true;
            }
            out.pop();
        }
        false
    }

    /// Collect ids of this subtree in document order.
    pub(crate) fn block_ids(&self, out: &mut Vec<BlockId>) {
        out.push(self.id);
        for child in &self.children {
            child.block_ids(out);
        }
    }

    pub(crate) fn max_id(&self) -> BlockId {
        self.children
            .iter()
            .map(Node::max_id)
            .fold(self.id, BlockId::max)
    }

    /// Weighted character count: code points below 256 count once,
    /// everything else twice.
    pub(crate) fn word_count(&self) -> usize {
        let own: usize = self
            .content
            .chars()
            .map(|c| if (c as u32) < 256 { 1 } else { 2 })
            .sum();
        own + self.children.iter().map(Node::word_count).sum::<usize>()
    }
}
