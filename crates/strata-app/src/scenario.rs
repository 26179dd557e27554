// Scenario files: a document, its measured block geometry and a pointer script.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;

use strata_core::{BlockId, Direction, DropTarget, PointerEvent, PressTarget, Rect, ScrollMetrics, Vec2};
use strata_tree::{Node, NodeKind};

// ──────────────────────────────────────────────
// Serializable scenario types
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub document: Vec<BlockData>,
    #[serde(default)]
    pub rects: Vec<RectData>,
    #[serde(default)]
    pub scroll: ScrollData,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockData {
    Paragraph {
        id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        #[serde(default)]
        content: String,
    },
    Heading {
        id: BlockId,
        rank: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
        #[serde(default)]
        content: String,
    },
    ListItem {
        id: BlockId,
        #[serde(default)]
        level: u8,
        #[serde(default)]
        content: String,
    },
    Column {
        id: BlockId,
        ratio: f64,
        children: Vec<BlockData>,
    },
    ColumnList {
        id: BlockId,
        children: Vec<BlockData>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectData {
    pub id: BlockId,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollData {
    #[serde(default)]
    pub scroll_top: f32,
    #[serde(default)]
    pub scroll_height: f32,
    #[serde(default)]
    pub client_height: f32,
}

/// One entry of the pointer script. Coordinates are viewport-relative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Press on the handle of `handle`, or on blank space when absent.
    Down {
        x: f32,
        y: f32,
        #[serde(default)]
        handle: Option<BlockId>,
    },
    Move {
        x: f32,
        y: f32,
    },
    Up {
        x: f32,
        y: f32,
    },
    Cancel,
    /// One animation frame.
    Frame,
    /// Replace the host's block geometry, as after a re-render.
    Layout {
        rects: Vec<RectData>,
    },
    Remeasure,
    Indent {
        id: BlockId,
    },
    Resize {
        column: BlockId,
        fraction: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetData {
    pub id: BlockId,
    pub direction: DirectionData,
    pub nested: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionData {
    Top,
    Bottom,
    Left,
    Right,
}

// ──────────────────────────────────────────────
// Scenario file I/O
// ──────────────────────────────────────────────

pub fn load_scenario(path: &Path) -> Result<Scenario, Box<dyn Error>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let scenario = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(scenario)
}

// ──────────────────────────────────────────────
// Conversions to and from engine types
// ──────────────────────────────────────────────

impl From<&BlockData> for Node {
    fn from(block: &BlockData) -> Self {
        match block {
            BlockData::Paragraph { id, level, content } => Node::paragraph(*id, content.clone()).with_level(*level),
            BlockData::Heading {
                id,
                rank,
                level,
                content,
            } => Node::heading(*id, *rank, content.clone()).with_level(*level),
            BlockData::ListItem { id, level, content } => Node::list_item(*id, *level, content.clone()),
            BlockData::Column { id, ratio, children } => {
                Node::column(*id, *ratio, nodes_from(children))
            }
            BlockData::ColumnList { id, children } => {
                Node::column_list(*id, nodes_from(children))
            }
        }
    }
}

impl From<&Node> for BlockData {
    fn from(node: &Node) -> Self {
        match node.kind {
            NodeKind::Paragraph => BlockData::Paragraph {
                id: node.id,
                level: node.level,
                content: node.content.clone(),
            },
            NodeKind::Heading(rank) => BlockData::Heading {
                id: node.id,
                rank,
                level: node.level,
                content: node.content.clone(),
            },
            NodeKind::ListItem => BlockData::ListItem {
                id: node.id,
                level: node.level.unwrap_or(0),
                content: node.content.clone(),
            },
            NodeKind::Column { ratio } => BlockData::Column {
                id: node.id,
                ratio,
                children: blocks_from(&node.children),
            },
            NodeKind::ColumnList => BlockData::ColumnList {
                id: node.id,
                children: blocks_from(&node.children),
            },
        }
    }
}

impl RectData {
    pub fn new(id: BlockId, rect: Rect) -> Self {
        RectData {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }

    pub fn to_block(self) -> (BlockId, Rect) {
        (self.id, Rect::new(self.x, self.y, self.width, self.height))
    }
}

impl From<ScrollData> for ScrollMetrics {
    fn from(s: ScrollData) -> Self {
        ScrollMetrics {
            scroll_top: s.scroll_top,
            scroll_height: s.scroll_height,
            client_height: s.client_height,
        }
    }
}

impl From<DropTarget> for TargetData {
    fn from(t: DropTarget) -> Self {
        let direction = match t.direction {
            Direction::Top => DirectionData::Top,
            Direction::Bottom => DirectionData::Bottom,
            Direction::Left => DirectionData::Left,
            Direction::Right => DirectionData::Right,
        };
        TargetData {
            id: t.id,
            direction,
            nested: t.nested,
        }
    }
}

impl Step {
    /// The pointer event this step feeds the engine, if it is one.
    pub fn pointer_event(&self) -> Option<PointerEvent> {
        match *self {
            Step::Down { x, y, handle } => Some(PointerEvent::Down {
                position: Vec2::new(x, y),
                target: handle.map_or(PressTarget::Blank, PressTarget::Handle),
            }),
            Step::Move { x, y } => Some(PointerEvent::Move {
                position: Vec2::new(x, y),
            }),
            Step::Up { x, y } => Some(PointerEvent::Up {
                position: Vec2::new(x, y),
            }),
            Step::Cancel => Some(PointerEvent::Cancel),
            _ => None,
        }
    }
}

pub fn nodes_from(blocks: &[BlockData]) -> Vec<Node> {
    blocks.iter().map(Node::from).collect()
}

pub fn blocks_from(nodes: &[Node]) -> Vec<BlockData> {
    nodes.iter().map(BlockData::from).collect()
}

pub fn rects_from(data: &[RectData]) -> Vec<(BlockId, Rect)> {
    data.iter().map(|r| r.to_block()).collect()
}
