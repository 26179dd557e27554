// ──────────────────────────────────────────────
// Path: sibling indices from the document root
// ──────────────────────────────────────────────

/// Address of a node as the sequence of child indices taken from the root.
/// The derived ordering is document (pre-)order: an ancestor sorts before
/// its descendants, and earlier siblings' subtrees before later ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path(Vec<usize>);

/// A primitive tree edit, used to carry paths across mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOp {
    Insert(Path),
    Remove(Path),
    /// `to` is the node's final position, addressed after `from` was removed.
    Move { from: Path, to: Path },
}

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Index among siblings. `None` for the root.
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<Path> {
        let (_, init) = self.0.split_last()?;
        Some(Path(init.to_vec()))
    }

    pub fn child(&self, index: usize) -> Path {
        let mut indices = self.0.clone();
        indices.push(index);
        Path(indices)
    }

    pub fn next(&self) -> Option<Path> {
        let mut indices = self.0.clone();
        *indices.last_mut()? += 1;
        Some(Path(indices))
    }

    pub fn previous(&self) -> Option<Path> {
        let mut indices = self.0.clone();
        let last = indices.last_mut()?;
        *last = last.checked_sub(1)?;
        Some(Path(indices))
    }

    /// Strict prefix test.
    pub fn is_ancestor_of(&self, other: &Path) -> bool {
        self.len() < other.len() && other.0.starts_with(&self.0)
    }

    /// Same parent, different position.
    pub fn is_sibling_of(&self, other: &Path) -> bool {
        match (self.0.split_last(), other.0.split_last()) {
            (Some((a, pa)), Some((b, pb))) => pa == pb && a != b,
            _ => false,
        }
    }

    /// True when an edit at `self` shifts `other`: `self`'s parent is an
    /// ancestor-or-self of `other` and `self` sits at or before `other`'s
    /// index at that depth.
    fn shifts(&self, other: &Path) -> bool {
        let Some((&last, parent)) = self.0.split_last() else {
            return false;
        };
        other.len() >= self.len()
            && other.0.starts_with(parent)
            && last <= other.0[parent.len()]
    }

    /// Where this path points after `op` has been applied, or `None` if the
    /// node it addressed was removed.
    pub fn transform(&self, op: &PathOp) -> Option<Path> {
        match op {
            PathOp::Insert(at) => {
                let mut out = self.clone();
                if at.shifts(self) {
                    out.0[at.len() - 1] += 1;
                }
                Some(out)
            }
            PathOp::Remove(at) => {
                if at == self || at.is_ancestor_of(self) {
                    return None;
                }
                let mut out = self.clone();
                if at.shifts(self) {
                    out.0[at.len() - 1] -= 1;
                }
                Some(out)
            }
            PathOp::Move { from, to } => {
                if from == self || from.is_ancestor_of(self) {
                    let mut indices = to.0.clone();
                    indices.extend_from_slice(&self.0[from.len()..]);
                    return Some(Path(indices));
                }
                self.transform(&PathOp::Remove(from.clone()))?
                    .transform(&PathOp::Insert(to.clone()))
            }
        }
    }
}

impl From<Vec<usize>> for Path {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl From<&[usize]> for Path {
    fn from(indices: &[usize]) -> Self {
        Self(indices.to_vec())
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.0)
    }
}
