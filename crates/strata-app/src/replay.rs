// Headless host: feeds a scenario's pointer script through the engine and
// records everything the engine asks the presentation layer to show.

use serde::Serialize;
use std::error::Error;

use strata_core::{BlockId, DropTarget, EngineHost, Rect, ScrollMetrics};
use strata_input::{DropCommand, Engine, EngineConfig};
use strata_tree::Document;

use crate::scenario::{self, BlockData, Scenario, Step, TargetData};
use crate::settings::StrataSettings;

// ──────────────────────────────────────────────
// Presentation log
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaData {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Rect> for AreaData {
    fn from(r: Rect) -> Self {
        AreaData {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Emission {
    Indicator {
        target: Option<TargetData>,
    },
    Selection {
        area: Option<AreaData>,
        selected: Vec<BlockId>,
    },
    Scroll {
        delta: f32,
        scroll_top: f32,
    },
    Drop {
        source: Vec<BlockId>,
        target: TargetData,
        #[serde(skip_serializing_if = "Option::is_none")]
        rejected: Option<String>,
    },
    Indent {
        id: BlockId,
        level: Option<u8>,
    },
    Resize {
        column: BlockId,
        applied: bool,
    },
}

// ──────────────────────────────────────────────
// ReplayHost
// ──────────────────────────────────────────────

/// Serves fixed geometry and records emissions.
pub struct ReplayHost {
    rects: Vec<(BlockId, Rect)>,
    metrics: ScrollMetrics,
    log: Vec<Emission>,
}

impl ReplayHost {
    pub fn new(rects: Vec<(BlockId, Rect)>, metrics: ScrollMetrics) -> Self {
        Self {
            rects,
            metrics,
            log: Vec::new(),
        }
    }

    pub fn set_rects(&mut self, rects: Vec<(BlockId, Rect)>) {
        self.rects = rects;
    }

    pub fn log(&self) -> &[Emission] {
        &self.log
    }

    fn record(&mut self, emission: Emission) {
        log::trace!("{:?}", emission);
        self.log.push(emission);
    }
}

impl EngineHost for ReplayHost {
    fn measure_blocks(&mut self) -> Vec<(BlockId, Rect)> {
        self.rects.clone()
    }

    fn scroll_metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    fn scroll_by(&mut self, delta: f32) {
        let max_top = (self.metrics.scroll_height - self.metrics.client_height).max(0.0);
        self.metrics.scroll_top = (self.metrics.scroll_top + delta).clamp(0.0, max_top);
        let scroll_top = self.metrics.scroll_top;
        self.record(Emission::Scroll { delta, scroll_top });
    }

    fn show_drop_indicator(&mut self, target: Option<DropTarget>) {
        self.record(Emission::Indicator {
            target: target.map(TargetData::from),
        });
    }

    fn show_selection(&mut self, area: Option<Rect>, selected: &[BlockId]) {
        self.record(Emission::Selection {
            area: area.map(AreaData::from),
            selected: selected.to_vec(),
        });
    }
}

// ──────────────────────────────────────────────
// Replay
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub document: Vec<BlockData>,
    pub word_count: usize,
    pub selected: Vec<BlockId>,
    pub log: Vec<Emission>,
}

pub struct Replay {
    document: Document,
    engine: Engine,
    host: ReplayHost,
    min_column_ratio: f64,
}

impl Replay {
    /// Rejects documents that violate the tree shape rules.
    pub fn new(scenario: &Scenario, settings: &StrataSettings) -> Result<Self, Box<dyn Error>> {
        let document = Document::from_nodes(scenario::nodes_from(&scenario.document));
        document.check_invariants()?;
        Ok(Self::with_document(
            document,
            ReplayHost::new(scenario::rects_from(&scenario.rects), scenario.scroll.into()),
            settings.engine_config(),
            settings.min_column_ratio,
        ))
    }

    pub fn with_document(document: Document, host: ReplayHost, config: EngineConfig, min_column_ratio: f64) -> Self {
        Self {
            document,
            engine: Engine::new(config),
            host,
            min_column_ratio,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn host(&self) -> &ReplayHost {
        &self.host
    }

    pub fn run(&mut self, steps: &[Step]) {
        for step in steps {
            self.step(step);
        }
    }

    pub fn step(&mut self, step: &Step) {
        if let Some(event) = step.pointer_event() {
            if let Some(command) = self.engine.handle(event, &self.document, &mut self.host) {
                self.apply(command);
            }
            return;
        }
        match step {
            Step::Frame => self.engine.frame(&self.document, &mut self.host),
            Step::Layout { rects } => self.host.set_rects(scenario::rects_from(rects)),
            Step::Remeasure => self.engine.remeasure(&self.document, &mut self.host),
            Step::Indent { id } => {
                let level = self.document.indent(*id);
                self.host.record(Emission::Indent { id: *id, level });
            }
            Step::Resize { column, fraction } => {
                let applied = self
                    .document
                    .resize_divider(*column, *fraction, self.min_column_ratio);
                self.host.record(Emission::Resize {
                    column: *column,
                    applied,
                });
            }
            Step::Down { .. } | Step::Move { .. } | Step::Up { .. } | Step::Cancel => {}
        }
    }

    fn apply(&mut self, command: DropCommand) {
        let rejected = command.apply(&mut self.document).err().map(|e| e.to_string());
        if let Some(reason) = &rejected {
            log::debug!("drop on {:?} rejected: {}", command.target, reason);
        }
        self.host.record(Emission::Drop {
            source: command.source.ids().to_vec(),
            target: command.target.into(),
            rejected,
        });
    }

    pub fn finish(self) -> ReplayReport {
        ReplayReport {
            document: scenario::blocks_from(self.document.nodes()),
            word_count: self.document.word_count(),
            selected: self.engine.selected().to_vec(),
            log: self.host.log,
        }
    }
}
