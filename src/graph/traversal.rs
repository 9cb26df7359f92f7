//! Iterative BFS/DFS traversal state objects (spec §3/§4.5–§4.6, C5).
//!
//! Grounded on the teacher's `dfs_reachable_count`/`bfs_reachable_count`
//! (`graph/basic/adjacency_graph.rs`), which already drive traversal off an
//! explicit work stack/queue instead of recursion, and on
//! `cassidoxa-sparsegraph`'s `DfsIter` (`other_examples/..dfs_iter.rs.rs`),
//! whose bitset-gated `visited`/`seen` fields and explicit per-vertex edge
//! cursor are the direct model for [`DfsState`]'s stack-of-cursors below.
//!
//! Both state objects capture the graph's [`crate::graph::Graph::generation`]
//! at construction and refuse to step once it has moved on, resolving spec
//! §9's Open Question about detecting traversal state invalidated by a
//! concurrent graph mutation.

use super::Graph;
use crate::bitset::WordBitSet;
use crate::error::{GraphResult, InvalidArgument};
use crate::token::GhostToken;
use std::collections::VecDeque;

/// Callbacks a caller may supply to observe a traversal as it runs.
///
/// All three are optional; a traversal with no callbacks set still updates
/// `discovered`/`processed`/`parent` (and, for DFS, `entry_time`/`exit_time`),
/// which is enough to answer reachability and shape queries on its own.
#[derive(Default)]
pub struct Callbacks<'cb, V, E> {
    /// Invoked the first time a vertex is discovered, before its edges are
    /// examined.
    pub on_vertex_early: Option<Box<dyn FnMut(u32, &V) + 'cb>>,
    /// Invoked for every edge examined during the walk, directed from the
    /// vertex currently being processed.
    pub on_edge: Option<Box<dyn FnMut(u32, u32, &E) + 'cb>>,
    /// Invoked once a vertex and all of its edges have been fully processed.
    pub on_vertex_late: Option<Box<dyn FnMut(u32, &V) + 'cb>>,
}

impl<'cb, V, E> Callbacks<'cb, V, E> {
    /// A `Callbacks` with nothing wired up.
    pub fn none() -> Self {
        Self::default()
    }
}

fn check_generation<'brand, V, E: Clone>(
    graph: &Graph<'brand, V, E>,
    token: &GhostToken<'brand>,
    captured: u64,
) -> GraphResult<()> {
    if graph.generation(token) != captured {
        Err(InvalidArgument::StaleGeneration.into())
    } else {
        Ok(())
    }
}

fn edge_weight<'brand, V, E: Clone>(
    graph: &Graph<'brand, V, E>,
    token: &GhostToken<'brand>,
    from: u32,
    to: u32,
) -> GraphResult<Option<E>> {
    Ok(graph
        .vertex_edges(token, from, None)?
        .into_iter()
        .find(|(t, _)| *t == to)
        .map(|(_, w)| w.clone()))
}

/// Breadth-first traversal state, reusable across calls to [`BfsState::run`].
pub struct BfsState<'brand> {
    discovered: WordBitSet<'brand>,
    processed: WordBitSet<'brand>,
    parent: Vec<Option<u32>>,
    queue: VecDeque<u32>,
    generation: u64,
}

impl<'brand> BfsState<'brand> {
    /// Creates traversal state sized for a graph with `vertex_capacity` slots.
    pub fn new<V, E: Clone>(
        graph: &Graph<'brand, V, E>,
        token: &GhostToken<'brand>,
        vertex_capacity: usize,
    ) -> Self {
        Self {
            discovered: WordBitSet::new(vertex_capacity),
            processed: WordBitSet::new(vertex_capacity),
            parent: vec![None; vertex_capacity],
            queue: VecDeque::new(),
            generation: graph.generation(token),
        }
    }

    /// Whether `id` has been discovered (enqueued) so far.
    pub fn is_discovered(&self, token: &GhostToken<'brand>, id: u32) -> bool {
        self.discovered.get(token, id as usize)
    }

    /// Whether `id` has been fully processed (dequeued and its edges walked).
    pub fn is_processed(&self, token: &GhostToken<'brand>, id: u32) -> bool {
        self.processed.get(token, id as usize)
    }

    /// `id`'s BFS parent, or `None` if `id` is a root or undiscovered.
    pub fn parent(&self, id: u32) -> Option<u32> {
        self.parent[id as usize]
    }

    /// Runs a complete breadth-first walk from `start`, invoking `callbacks`
    /// along the way.
    ///
    /// Fails with [`InvalidArgument::StaleGeneration`] if `graph` has been
    /// mutated since this state was created.
    pub fn run<V, E: Clone>(
        &mut self,
        graph: &Graph<'brand, V, E>,
        token: &mut GhostToken<'brand>,
        start: u32,
        mut callbacks: Callbacks<'_, V, E>,
    ) -> GraphResult<()> {
        check_generation(graph, token, self.generation)?;

        self.discovered.set(token, start as usize);
        self.queue.push_back(start);

        while let Some(current) = self.queue.pop_front() {
            if let Some(cb) = callbacks.on_vertex_early.as_mut() {
                cb(current, graph.vertex_data(token, current)?);
            }
            // Marked before exploring edges so an undirected back-edge to
            // `current` is not double-invoked below.
            self.processed.set(token, current as usize);

            let mut cursor = graph.first_out_edge(token, current);
            while let Some(edge_idx) = cursor {
                let (to, next) = graph.edge_cursor(token, edge_idx);
                let already_processed = self.processed.get(token, to as usize);
                if !already_processed || graph.mode() == super::EdgeMode::Directed {
                    if let Some(cb) = callbacks.on_edge.as_mut() {
                        if let Some(weight) = edge_weight(graph, token, current, to)? {
                            cb(current, to, &weight);
                        }
                    }
                }
                if !self.discovered.get(token, to as usize) {
                    self.discovered.set(token, to as usize);
                    self.parent[to as usize] = Some(current);
                    self.queue.push_back(to);
                }
                cursor = next;
            }
            if let Some(cb) = callbacks.on_vertex_late.as_mut() {
                cb(current, graph.vertex_data(token, current)?);
            }
        }
        Ok(())
    }
}

/// Depth-first traversal state, reusable across calls to [`DfsState::run`].
///
/// Iterative: a caller-visible stack of `(vertex, next_edge_cursor)` frames
/// stands in for the call stack a recursive DFS would use, matching spec
/// §4.6's "no recursion" requirement.
pub struct DfsState<'brand> {
    discovered: WordBitSet<'brand>,
    processed: WordBitSet<'brand>,
    parent: Vec<Option<u32>>,
    entry_time: Vec<Option<u32>>,
    exit_time: Vec<Option<u32>>,
    stack: Vec<(u32, Option<u32>)>,
    clock: u32,
    generation: u64,
}

impl<'brand> DfsState<'brand> {
    /// Creates traversal state sized for a graph with `vertex_capacity` slots.
    pub fn new<V, E: Clone>(
        graph: &Graph<'brand, V, E>,
        token: &GhostToken<'brand>,
        vertex_capacity: usize,
    ) -> Self {
        Self {
            discovered: WordBitSet::new(vertex_capacity),
            processed: WordBitSet::new(vertex_capacity),
            parent: vec![None; vertex_capacity],
            entry_time: vec![None; vertex_capacity],
            exit_time: vec![None; vertex_capacity],
            stack: Vec::new(),
            clock: 0,
            generation: graph.generation(token),
        }
    }

    /// Whether `id` has been discovered so far.
    pub fn is_discovered(&self, token: &GhostToken<'brand>, id: u32) -> bool {
        self.discovered.get(token, id as usize)
    }

    /// Whether `id` has exited (every descendant fully explored).
    pub fn is_processed(&self, token: &GhostToken<'brand>, id: u32) -> bool {
        self.processed.get(token, id as usize)
    }

    /// `id`'s DFS parent, or `None` if `id` is a root or undiscovered.
    pub fn parent(&self, id: u32) -> Option<u32> {
        self.parent[id as usize]
    }

    /// `id`'s discovery timestamp, or `None` if not yet discovered.
    pub fn entry_time(&self, id: u32) -> Option<u32> {
        self.entry_time[id as usize]
    }

    /// `id`'s finish timestamp, or `None` if not yet processed.
    pub fn exit_time(&self, id: u32) -> Option<u32> {
        self.exit_time[id as usize]
    }

    /// Whether `id` is currently on the DFS stack (an ancestor of the
    /// vertex being processed) — used by [`super::topo::topological_sort`]
    /// to recognize a back edge.
    pub fn is_on_stack(&self, id: u32) -> bool {
        self.stack.iter().any(|&(v, _)| v == id)
    }

    fn discover<V, E: Clone>(
        &mut self,
        graph: &Graph<'brand, V, E>,
        token: &mut GhostToken<'brand>,
        id: u32,
        callbacks: &mut Callbacks<'_, V, E>,
    ) -> GraphResult<()> {
        self.discovered.set(token, id as usize);
        self.entry_time[id as usize] = Some(self.clock);
        self.clock += 1;
        if let Some(cb) = callbacks.on_vertex_early.as_mut() {
            cb(id, graph.vertex_data(token, id)?);
        }
        let first = graph.first_out_edge(token, id);
        self.stack.push((id, first));
        Ok(())
    }

    /// Runs a complete depth-first walk rooted at `start`, invoking
    /// `callbacks` along the way.
    ///
    /// Fails with [`InvalidArgument::StaleGeneration`] if `graph` has been
    /// mutated since this state was created.
    pub fn run<V, E: Clone>(
        &mut self,
        graph: &Graph<'brand, V, E>,
        token: &mut GhostToken<'brand>,
        start: u32,
        mut callbacks: Callbacks<'_, V, E>,
    ) -> GraphResult<()> {
        check_generation(graph, token, self.generation)?;

        self.discover(graph, token, start, &mut callbacks)?;

        while let Some(&(current, cursor)) = self.stack.last() {
            match cursor {
                Some(edge_idx) => {
                    let (to, next) = graph.edge_cursor(token, edge_idx);
                    self.stack.last_mut().expect("stack non-empty in this branch").1 = next;

                    if !self.discovered.get(token, to as usize) {
                        // Tree edge: always reported once, from this side.
                        if let Some(cb) = callbacks.on_edge.as_mut() {
                            if let Some(weight) = edge_weight(graph, token, current, to)? {
                                cb(current, to, &weight);
                            }
                        }
                        self.parent[to as usize] = Some(current);
                        self.discover(graph, token, to, &mut callbacks)?;
                    } else {
                        // Non-tree edge. Undirected graphs store both
                        // directions of every edge, so without suppression a
                        // tree edge would fire a second time when its mirror
                        // is examined from the other endpoint: once when
                        // `to` is still `current`'s unfinished parent (the
                        // edge back up the tree we just came from), and once
                        // more after `to` has exited (the mirror of a tree
                        // edge discovered deeper in the search). Directed
                        // graphs have no mirror edge, so neither condition
                        // can spuriously trigger and every edge still fires.
                        let suppress = graph.mode() == super::EdgeMode::Undirected
                            && (self.parent[current as usize] == Some(to)
                                || self.processed.get(token, to as usize));
                        if !suppress {
                            if let Some(cb) = callbacks.on_edge.as_mut() {
                                if let Some(weight) = edge_weight(graph, token, current, to)? {
                                    cb(current, to, &weight);
                                }
                            }
                        }
                    }
                }
                None => {
                    self.processed.set(token, current as usize);
                    self.exit_time[current as usize] = Some(self.clock);
                    self.clock += 1;
                    if let Some(cb) = callbacks.on_vertex_late.as_mut() {
                        cb(current, graph.vertex_data(token, current)?);
                    }
                    self.stack.pop();
                }
            }
        }
        Ok(())
    }
}
