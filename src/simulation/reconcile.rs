//! Diffing alive-cell sets into create/destroy instructions for a renderer

use crate::game_of_life::{Coord, Grid};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// Visual changes needed to bring a renderer in line with the grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderDelta {
    /// Newly alive cells, in ordinal order
    pub create: Vec<Coord>,
    /// Cells that are no longer alive, in ordinal order
    pub destroy: Vec<Coord>,
}

impl RenderDelta {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.destroy.is_empty()
    }
}

/// Owner of per-cell visuals. Apply is fire-and-forget from the simulation's view.
pub trait RenderAdapter {
    fn apply(&mut self, delta: &RenderDelta);

    /// True while a previous delta is still being materialised
    fn is_busy(&self) -> bool {
        false
    }
}

/// Tracks which cells a renderer currently shows
#[derive(Debug, Default, Clone)]
pub struct Reconciler {
    rendered: BTreeSet<Coord>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Symmetric difference between what was rendered and what is alive now.
    /// Afterwards the rendered set equals the grid's alive set.
    pub fn reconcile(&mut self, grid: &Grid) -> RenderDelta {
        let alive: BTreeSet<Coord> = grid.alive_cells().into_iter().collect();

        let delta = RenderDelta {
            create: alive.difference(&self.rendered).copied().collect(),
            destroy: self.rendered.difference(&alive).copied().collect(),
        };

        self.rendered = alive;
        delta
    }

    pub fn rendered(&self) -> &BTreeSet<Coord> {
        &self.rendered
    }
}

/// Opaque id of a visual object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// In-memory render adapter: one handle per visible cell
#[derive(Debug, Default)]
pub struct VisualRegistry {
    visuals: HashMap<Coord, VisualHandle>,
    next_id: u64,
    created: usize,
    destroyed: usize,
}

impl VisualRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, coord: Coord) -> Option<VisualHandle> {
        self.visuals.get(&coord).copied()
    }

    pub fn live_visuals(&self) -> usize {
        self.visuals.len()
    }

    pub fn total_created(&self) -> usize {
        self.created
    }

    pub fn total_destroyed(&self) -> usize {
        self.destroyed
    }
}

impl RenderAdapter for VisualRegistry {
    fn apply(&mut self, delta: &RenderDelta) {
        for coord in &delta.destroy {
            if self.visuals.remove(coord).is_some() {
                self.destroyed += 1;
            }
        }
        for &coord in &delta.create {
            if !self.visuals.contains_key(&coord) {
                self.visuals.insert(coord, VisualHandle(self.next_id));
                self.next_id += 1;
                self.created += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_of_life::Dimensions;

    fn grid(alive: &[(i32, i32, i32)]) -> Grid {
        Grid::with_alive(Dimensions::cube(4), alive.iter().copied().map(Coord::from)).unwrap()
    }

    #[test]
    fn test_reconcile_symmetric_difference() {
        let mut reconciler = Reconciler::new();

        let first = reconciler.reconcile(&grid(&[(0, 0, 0), (1, 1, 1)]));
        assert_eq!(first.create, vec![Coord::new(0, 0, 0), Coord::new(1, 1, 1)]);
        assert!(first.destroy.is_empty());

        let second = reconciler.reconcile(&grid(&[(1, 1, 1), (2, 2, 2)]));
        assert_eq!(second.create, vec![Coord::new(2, 2, 2)]);
        assert_eq!(second.destroy, vec![Coord::new(0, 0, 0)]);

        let third = reconciler.reconcile(&grid(&[(1, 1, 1), (2, 2, 2)]));
        assert!(third.is_empty());
        assert_eq!(reconciler.rendered().len(), 2);
    }

    #[test]
    fn test_visual_registry_tracks_handles() {
        let mut registry = VisualRegistry::new();
        registry.apply(&RenderDelta {
            create: vec![Coord::new(0, 0, 0), Coord::new(1, 0, 0)],
            destroy: vec![],
        });
        assert_eq!(registry.live_visuals(), 2);
        let kept = registry.handle(Coord::new(1, 0, 0)).unwrap();

        registry.apply(&RenderDelta {
            create: vec![Coord::new(2, 0, 0)],
            destroy: vec![Coord::new(0, 0, 0), Coord::new(3, 3, 3)],
        });
        assert_eq!(registry.live_visuals(), 2);
        assert_eq!(registry.handle(Coord::new(1, 0, 0)), Some(kept));
        assert!(registry.handle(Coord::new(0, 0, 0)).is_none());
        assert_eq!(registry.total_created(), 3);
        assert_eq!(registry.total_destroyed(), 1);
        assert!(!registry.is_busy());
    }
}
