use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info};

use crate::error::Result;
use crate::features::FeatureAnalyzer;
use crate::floor::FloorPlan;
use crate::graph::{build_graph, Graph, GraphBuildOptions};
use crate::routing::{PathFinder, PathResult};

/// A floor description together with the graph built from it.
#[derive(Debug, Clone)]
pub struct FloorState {
    pub floor: FloorPlan,
    pub graph: Graph,
}

impl FloorState {
    pub fn build(floor: FloorPlan, options: &GraphBuildOptions) -> Result<Self> {
        let graph = build_graph(&floor, options)?;
        Ok(Self { floor, graph })
    }

    pub fn path_finder(&self) -> PathFinder<'_> {
        PathFinder::new(&self.graph)
    }

    pub fn analyzer(&self) -> FeatureAnalyzer<'_> {
        FeatureAnalyzer::new(&self.graph, self.floor.dimensions)
    }
}

/// Owns the active floor and hands out immutable snapshots of it.
///
/// Readers clone the inner `Arc` and never hold the lock while searching.
/// [`NavigationContext::reload`] builds the replacement state first and only
/// takes the write lock for the pointer swap, so a failed reload leaves the
/// previous floor active.
#[derive(Debug)]
pub struct NavigationContext {
    options: GraphBuildOptions,
    state: RwLock<Arc<FloorState>>,
}

impl NavigationContext {
    pub fn load(floor: FloorPlan, options: GraphBuildOptions) -> Result<Self> {
        let state = FloorState::build(floor, &options)?;
        info!(
            rooms = state.floor.rooms.len(),
            edges = state.graph.edge_count(),
            "navigation context ready"
        );
        Ok(Self {
            options,
            state: RwLock::new(Arc::new(state)),
        })
    }

    pub fn options(&self) -> &GraphBuildOptions {
        &self.options
    }

    /// The currently active floor.
    pub fn snapshot(&self) -> Arc<FloorState> {
        // The lock only guards a pointer swap, so a poisoned lock still holds
        // a complete state.
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Replace the active floor. On error the previous floor stays active.
    pub fn reload(&self, floor: FloorPlan) -> Result<()> {
        let next = Arc::new(FloorState::build(floor, &self.options)?);
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
        debug!(nodes = guard.graph.node_count(), "swapped in reloaded floor");
        Ok(())
    }

    /// Route between two rooms by algorithm name, folding every failure into
    /// the returned result.
    pub fn navigate(&self, start: &str, goal: &str, algorithm: &str) -> PathResult {
        let state = self.snapshot();
        let outcome = state.path_finder().find_path_named(start, goal, algorithm);
        if let Err(error) = &outcome {
            debug!(%start, %goal, %algorithm, %error, "navigation failed");
        }
        PathResult::from(outcome)
    }
}
