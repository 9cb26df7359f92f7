//! `Graph` — an adjacency-list graph over vertex/edge pools, supporting
//! directed and undirected modes (spec §3/§4.4, C4).
//!
//! Grounded on the teacher's `BrandedPoolGraph` (`graph/pool_graph.rs`) for
//! the overall pool-backed vertex/edge shape, and on `GhostAdjacencyGraph`
//! (`graph/basic/adjacency_graph.rs`) for the free-standing
//! vertex-id-to-index bookkeeping. Vertices and edges are each intrusive
//! linked lists threaded through a [`crate::pool::PoolAllocator`]-style
//! arena rather than `Vec<Vec<usize>>` adjacency lists, so that removing a
//! vertex or edge is O(degree) instead of requiring a full adjacency-list
//! rebuild.
//!
//! The `generation` counter resolves spec §9's Open Question about detecting
//! stale traversal state: every structural mutation (`add_vertex`,
//! `remove_vertex`, `add_edge`, `remove_edge`) increments it, and
//! [`crate::graph::traversal`] state objects capture the generation they were
//! built against, refusing to step once the graph has moved on.

pub mod topo;
pub mod traversal;

use crate::cell::GhostCell;
use crate::error::{GraphResult, InvalidArgument, OperationFailed};
use crate::token::GhostToken;
use crate::value::TaggedValue;

/// Whether a graph's edges are traversable in one direction or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// `add_edge(a, b)` makes `b` reachable from `a` only.
    Directed,
    /// `add_edge(a, b)` makes `a` and `b` mutually reachable.
    Undirected,
}

enum VertexSlot<V> {
    Occupied {
        data: V,
        first_out: Option<u32>,
        first_in: Option<u32>,
        out_degree: u32,
        in_degree: u32,
        /// Index into `valid_vertex_ids`, kept in sync for O(1) removal.
        valid_index: u32,
    },
    Free(Option<u32>),
}

struct EdgeSlot<E> {
    from: u32,
    to: u32,
    weight: E,
    next_out: Option<u32>,
    next_in: Option<u32>,
    live: bool,
}

/// An adjacency-list graph over a fixed-capacity vertex pool and a
/// fixed-capacity edge pool.
///
/// `V` is the per-vertex payload type and `E` the per-edge weight type;
/// both default to [`TaggedValue`] at the call site when the caller has no
/// richer type to store.
pub struct Graph<'brand, V, E> {
    mode: EdgeMode,
    vertices: GhostCell<'brand, Vec<VertexSlot<V>>>,
    vertex_free_head: GhostCell<'brand, Option<u32>>,
    vertex_count: GhostCell<'brand, usize>,
    vertex_capacity: usize,

    edges: GhostCell<'brand, Vec<EdgeSlot<E>>>,
    edge_free_head: GhostCell<'brand, Option<u32>>,
    edge_count: GhostCell<'brand, usize>,
    edge_capacity: usize,

    /// Dense list of currently-live vertex ids, for O(1) iteration.
    valid_vertex_ids: GhostCell<'brand, Vec<u32>>,

    generation: GhostCell<'brand, u64>,
}

impl<'brand, V, E: Clone> Graph<'brand, V, E> {
    /// The number of vertex slots a graph of this capacity will occupy; a
    /// pure function of `vertex_capacity`, mirroring the source's
    /// `computeBufferSize`.
    #[inline]
    pub const fn vertex_capacity_for(vertex_capacity: usize) -> usize {
        vertex_capacity
    }

    /// The number of edge slots a graph of this capacity will occupy.
    #[inline]
    pub const fn edge_capacity_for(edge_capacity: usize) -> usize {
        // Undirected edges consume one slot per direction so neighbor walks
        // stay O(degree) from either endpoint.
        edge_capacity * 2
    }

    /// Creates an empty graph bounded at `vertex_capacity` vertices and
    /// `edge_capacity` logical edges, in `mode`.
    pub fn new(mode: EdgeMode, vertex_capacity: usize, edge_capacity: usize) -> Self {
        let edge_slots = Self::edge_capacity_for(edge_capacity);
        Self {
            mode,
            vertices: GhostCell::new(Vec::with_capacity(vertex_capacity)),
            vertex_free_head: GhostCell::new(None),
            vertex_count: GhostCell::new(0),
            vertex_capacity,
            edges: GhostCell::new(Vec::with_capacity(edge_slots)),
            edge_free_head: GhostCell::new(None),
            edge_count: GhostCell::new(0),
            edge_capacity: edge_slots,
            valid_vertex_ids: GhostCell::new(Vec::with_capacity(vertex_capacity)),
            generation: GhostCell::new(0),
        }
    }

    /// Whether this graph treats edges as directed or undirected.
    #[inline]
    pub fn mode(&self) -> EdgeMode {
        self.mode
    }

    /// The generation counter, incremented on every structural mutation.
    /// Traversal state objects capture this to detect staleness.
    #[inline]
    pub fn generation(&self, token: &GhostToken<'brand>) -> u64 {
        *self.generation.borrow(token)
    }

    /// The number of live vertices.
    #[inline]
    pub fn vertex_count(&self, token: &GhostToken<'brand>) -> usize {
        *self.vertex_count.borrow(token)
    }

    /// The number of live logical edges (an undirected edge still counts once).
    #[inline]
    pub fn edge_count(&self, token: &GhostToken<'brand>) -> usize {
        *self.edge_count.borrow(token)
    }

    /// The capacity in vertices this graph was constructed with.
    #[inline]
    pub fn vertex_capacity(&self) -> usize {
        self.vertex_capacity
    }

    /// A snapshot of currently-live vertex ids.
    pub fn valid_vertex_ids(&self, token: &GhostToken<'brand>) -> &[u32] {
        self.valid_vertex_ids.borrow(token)
    }

    fn is_live(&self, token: &GhostToken<'brand>, id: u32) -> bool {
        matches!(
            self.vertices.borrow(token).get(id as usize),
            Some(VertexSlot::Occupied { .. })
        )
    }

    fn check_live(&self, token: &GhostToken<'brand>, id: u32) -> GraphResult<()> {
        if self.is_live(token, id) {
            Ok(())
        } else {
            Err(InvalidArgument::VertexNotLive.into())
        }
    }

    /// Inserts a vertex carrying `data`, returning its id.
    pub fn add_vertex(&self, token: &mut GhostToken<'brand>, data: V) -> GraphResult<u32> {
        if *self.vertex_count.borrow(token) >= self.vertex_capacity {
            return Err(OperationFailed::Exhausted.into());
        }

        let free_head = *self.vertex_free_head.borrow(token);
        let valid_index = self.valid_vertex_ids.borrow(token).len() as u32;

        let id = if let Some(id) = free_head {
            let next = match &self.vertices.borrow(token)[id as usize] {
                VertexSlot::Free(next) => *next,
                VertexSlot::Occupied { .. } => {
                    debug_assert!(false, "vertex free_head pointed to an occupied slot");
                    None
                }
            };
            *self.vertex_free_head.borrow_mut(token) = next;
            self.vertices.borrow_mut(token)[id as usize] = VertexSlot::Occupied {
                data,
                first_out: None,
                first_in: None,
                out_degree: 0,
                in_degree: 0,
                valid_index,
            };
            id
        } else {
            let id = self.vertices.borrow(token).len() as u32;
            self.vertices.borrow_mut(token).push(VertexSlot::Occupied {
                data,
                first_out: None,
                first_in: None,
                out_degree: 0,
                in_degree: 0,
                valid_index,
            });
            id
        };

        self.valid_vertex_ids.borrow_mut(token).push(id);
        *self.vertex_count.borrow_mut(token) += 1;
        *self.generation.borrow_mut(token) += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(vertex_id = id, "add_vertex");
        Ok(id)
    }

    /// Removes a vertex and every edge incident to it.
    pub fn remove_vertex(&self, token: &mut GhostToken<'brand>, id: u32) -> GraphResult<V> {
        self.check_live(token, id)?;

        // Collect incident edges first; removing while iterating the
        // intrusive list would invalidate the cursor.
        let mut incident = Vec::new();
        let mut cursor = match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { first_out, .. } => *first_out,
            VertexSlot::Free(_) => unreachable!(),
        };
        while let Some(e) = cursor {
            incident.push(e);
            cursor = self.edges.borrow(token)[e as usize].next_out;
        }
        let mut cursor = match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { first_in, .. } => *first_in,
            VertexSlot::Free(_) => unreachable!(),
        };
        while let Some(e) = cursor {
            if self.edges.borrow(token)[e as usize].from != id || self.mode == EdgeMode::Undirected {
                incident.push(e);
            }
            cursor = self.edges.borrow(token)[e as usize].next_in;
        }
        incident.sort_unstable();
        incident.dedup();
        for e in incident {
            let (from, to) = {
                let slot = &self.edges.borrow(token)[e as usize];
                (slot.from, slot.to)
            };
            let _ = self.remove_edge(token, from, to);
        }

        let valid_index = match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { valid_index, .. } => *valid_index,
            VertexSlot::Free(_) => unreachable!(),
        };

        let free_head = *self.vertex_free_head.borrow(token);
        let old = core::mem::replace(
            &mut self.vertices.borrow_mut(token)[id as usize],
            VertexSlot::Free(free_head),
        );
        *self.vertex_free_head.borrow_mut(token) = Some(id);
        *self.vertex_count.borrow_mut(token) -= 1;
        *self.generation.borrow_mut(token) += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(vertex_id = id, "remove_vertex");

        // Swap-remove from the dense valid-id list, fixing up the moved
        // entry's `valid_index`.
        let last = self.valid_vertex_ids.borrow(token).len() - 1;
        self.valid_vertex_ids.borrow_mut(token).swap(valid_index as usize, last);
        self.valid_vertex_ids.borrow_mut(token).pop();
        if (valid_index as usize) < self.valid_vertex_ids.borrow(token).len() {
            let moved_id = self.valid_vertex_ids.borrow(token)[valid_index as usize];
            if let VertexSlot::Occupied { valid_index: vi, .. } =
                &mut self.vertices.borrow_mut(token)[moved_id as usize]
            {
                *vi = valid_index;
            }
        }

        match old {
            VertexSlot::Occupied { data, .. } => Ok(data),
            VertexSlot::Free(_) => unreachable!(),
        }
    }

    fn alloc_edge_slot(
        &self,
        token: &mut GhostToken<'brand>,
        from: u32,
        to: u32,
        weight: E,
    ) -> GraphResult<u32> {
        if *self.edge_count.borrow(token) * if self.mode == EdgeMode::Undirected { 2 } else { 1 }
            >= self.edge_capacity
        {
            return Err(OperationFailed::Exhausted.into());
        }
        let free_head = *self.edge_free_head.borrow(token);
        let idx = if let Some(idx) = free_head {
            let next = self.edges.borrow(token)[idx as usize].next_out;
            *self.edge_free_head.borrow_mut(token) = next;
            self.edges.borrow_mut(token)[idx as usize] = EdgeSlot {
                from,
                to,
                weight,
                next_out: None,
                next_in: None,
                live: true,
            };
            idx
        } else {
            let idx = self.edges.borrow(token).len() as u32;
            self.edges.borrow_mut(token).push(EdgeSlot {
                from,
                to,
                weight,
                next_out: None,
                next_in: None,
                live: true,
            });
            idx
        };
        Ok(idx)
    }

    fn link_edge(&self, token: &mut GhostToken<'brand>, edge_idx: u32, from: u32, to: u32) {
        let prev_out = match &mut self.vertices.borrow_mut(token)[from as usize] {
            VertexSlot::Occupied { first_out, out_degree, .. } => {
                *out_degree += 1;
                core::mem::replace(first_out, Some(edge_idx))
            }
            VertexSlot::Free(_) => unreachable!(),
        };
        self.edges.borrow_mut(token)[edge_idx as usize].next_out = prev_out;

        let prev_in = match &mut self.vertices.borrow_mut(token)[to as usize] {
            VertexSlot::Occupied { first_in, in_degree, .. } => {
                *in_degree += 1;
                core::mem::replace(first_in, Some(edge_idx))
            }
            VertexSlot::Free(_) => unreachable!(),
        };
        self.edges.borrow_mut(token)[edge_idx as usize].next_in = prev_in;
    }

    /// Adds an edge from `from` to `to` carrying `weight`.
    ///
    /// In [`EdgeMode::Undirected`] mode this reserves two edge slots (one per
    /// direction) before linking either, so a mid-operation allocation
    /// failure never leaves a half-added undirected edge visible.
    pub fn add_edge(
        &self,
        token: &mut GhostToken<'brand>,
        from: u32,
        to: u32,
        weight: E,
    ) -> GraphResult<()> {
        self.check_live(token, from)?;
        self.check_live(token, to)?;
        if from == to {
            return Err(InvalidArgument::SelfEdge.into());
        }

        match self.mode {
            EdgeMode::Directed => {
                let idx = self.alloc_edge_slot(token, from, to, weight)?;
                self.link_edge(token, idx, from, to);
            }
            EdgeMode::Undirected => {
                // Reserve both directions' capacity up front (see doc comment).
                let remaining = self.edge_capacity - *self.edge_count.borrow(token) * 2;
                if remaining < 2 {
                    return Err(OperationFailed::Exhausted.into());
                }
                let fwd = self.alloc_edge_slot(token, from, to, weight.clone())?;
                let back = self.alloc_edge_slot(token, to, from, weight)?;
                self.link_edge(token, fwd, from, to);
                self.link_edge(token, back, to, from);
            }
        }

        *self.edge_count.borrow_mut(token) += 1;
        *self.generation.borrow_mut(token) += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(from, to, "add_edge");
        Ok(())
    }

    fn unlink_and_free(&self, token: &mut GhostToken<'brand>, from: u32, to: u32) -> GraphResult<()> {
        // Walk `from`'s out-list to find and splice out the edge to `to`.
        let mut prev: Option<u32> = None;
        let mut cursor = match &self.vertices.borrow(token)[from as usize] {
            VertexSlot::Occupied { first_out, .. } => *first_out,
            VertexSlot::Free(_) => unreachable!(),
        };
        let found = loop {
            match cursor {
                None => break None,
                Some(e) => {
                    let slot = &self.edges.borrow(token)[e as usize];
                    if slot.live && slot.to == to {
                        break Some(e);
                    }
                    prev = Some(e);
                    cursor = slot.next_out;
                }
            }
        };
        let edge_idx = match found {
            Some(e) => e,
            None => return Err(OperationFailed::NoSuchEdge.into()),
        };

        let next = self.edges.borrow(token)[edge_idx as usize].next_out;
        match prev {
            Some(p) => self.edges.borrow_mut(token)[p as usize].next_out = next,
            None => {
                if let VertexSlot::Occupied { first_out, .. } =
                    &mut self.vertices.borrow_mut(token)[from as usize]
                {
                    *first_out = next;
                }
            }
        }
        if let VertexSlot::Occupied { out_degree, .. } = &mut self.vertices.borrow_mut(token)[from as usize] {
            *out_degree -= 1;
        }

        // Splice out of `to`'s in-list.
        let mut prev_in: Option<u32> = None;
        let mut cursor = match &self.vertices.borrow(token)[to as usize] {
            VertexSlot::Occupied { first_in, .. } => *first_in,
            VertexSlot::Free(_) => unreachable!(),
        };
        while let Some(e) = cursor {
            if e == edge_idx {
                break;
            }
            prev_in = Some(e);
            cursor = self.edges.borrow(token)[e as usize].next_in;
        }
        let next_in = self.edges.borrow(token)[edge_idx as usize].next_in;
        match prev_in {
            Some(p) => self.edges.borrow_mut(token)[p as usize].next_in = next_in,
            None => {
                if let VertexSlot::Occupied { first_in, .. } =
                    &mut self.vertices.borrow_mut(token)[to as usize]
                {
                    *first_in = next_in;
                }
            }
        }
        if let VertexSlot::Occupied { in_degree, .. } = &mut self.vertices.borrow_mut(token)[to as usize] {
            *in_degree -= 1;
        }

        let free_head = *self.edge_free_head.borrow(token);
        let slot = &mut self.edges.borrow_mut(token)[edge_idx as usize];
        slot.live = false;
        slot.next_out = free_head;
        *self.edge_free_head.borrow_mut(token) = Some(edge_idx);

        Ok(())
    }

    /// Removes the edge from `from` to `to` (both directions, if undirected).
    pub fn remove_edge(&self, token: &mut GhostToken<'brand>, from: u32, to: u32) -> GraphResult<()> {
        self.check_live(token, from)?;
        self.check_live(token, to)?;

        self.unlink_and_free(token, from, to)?;
        if self.mode == EdgeMode::Undirected {
            self.unlink_and_free(token, to, from)?;
        }

        *self.edge_count.borrow_mut(token) -= 1;
        *self.generation.borrow_mut(token) += 1;
        #[cfg(feature = "tracing")]
        tracing::trace!(from, to, "remove_edge");
        Ok(())
    }

    /// The out-degree of `id` (for undirected graphs, simply its degree).
    pub fn vertex_degree(&self, token: &GhostToken<'brand>, id: u32) -> GraphResult<u32> {
        self.check_live(token, id)?;
        match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { out_degree, .. } => Ok(*out_degree),
            VertexSlot::Free(_) => unreachable!(),
        }
    }

    /// Collects the ids of `id`'s out-neighbors (or, for undirected graphs,
    /// all neighbors).
    ///
    /// `expected_degree`, if provided, must match the vertex's actual
    /// out-degree or this returns [`InvalidArgument::DegreeMismatch`] — a
    /// cheap caller-side consistency check before writing into a
    /// fixed-size buffer sized from a previous `vertex_degree` call.
    pub fn vertex_edges<'a>(
        &'a self,
        token: &'a GhostToken<'brand>,
        id: u32,
        expected_degree: Option<u32>,
    ) -> GraphResult<Vec<(u32, &'a E)>> {
        self.check_live(token, id)?;
        let (first_out, actual_degree) = match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { first_out, out_degree, .. } => (*first_out, *out_degree),
            VertexSlot::Free(_) => unreachable!(),
        };
        if let Some(expected) = expected_degree {
            if expected != actual_degree {
                return Err(InvalidArgument::DegreeMismatch.into());
            }
        }
        let mut out = Vec::with_capacity(actual_degree as usize);
        let mut cursor = first_out;
        while let Some(e) = cursor {
            let slot = &self.edges.borrow(token)[e as usize];
            out.push((slot.to, &slot.weight));
            cursor = slot.next_out;
        }
        Ok(out)
    }

    /// Shared access to a vertex's payload.
    pub fn vertex_data<'a>(&'a self, token: &'a GhostToken<'brand>, id: u32) -> GraphResult<&'a V> {
        self.check_live(token, id)?;
        match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { data, .. } => Ok(data),
            VertexSlot::Free(_) => unreachable!(),
        }
    }

    /// Overwrites a vertex's payload in place.
    pub fn set_vertex_data(&self, token: &mut GhostToken<'brand>, id: u32, data: V) -> GraphResult<()> {
        self.check_live(token, id)?;
        match &mut self.vertices.borrow_mut(token)[id as usize] {
            VertexSlot::Occupied { data: slot, .. } => {
                *slot = data;
                Ok(())
            }
            VertexSlot::Free(_) => unreachable!(),
        }
    }

    /// The first out-edge index in `id`'s intrusive adjacency list, for
    /// traversal cursors. Crate-internal: `traversal` and `topo` walk edges
    /// one link at a time instead of materializing a `Vec` per vertex.
    pub(crate) fn first_out_edge(&self, token: &GhostToken<'brand>, id: u32) -> Option<u32> {
        match &self.vertices.borrow(token)[id as usize] {
            VertexSlot::Occupied { first_out, .. } => *first_out,
            VertexSlot::Free(_) => None,
        }
    }

    /// The `(target, next link)` pair for an edge index, for traversal cursors.
    pub(crate) fn edge_cursor(&self, token: &GhostToken<'brand>, edge_idx: u32) -> (u32, Option<u32>) {
        let slot = &self.edges.borrow(token)[edge_idx as usize];
        (slot.to, slot.next_out)
    }

    /// Exhaustive consistency check (spec §4.4's `validate`):
    ///
    /// - `valid_vertex_ids` contains exactly the live vertices, and its
    ///   embedded reverse index (`valid_index`) is its exact inverse.
    /// - every live vertex's `out_degree`/`in_degree` match its actual
    ///   adjacency-list lengths.
    /// - the vertex free-list is acyclic, and live-vertex count plus its
    ///   length equals the number of vertex slots ever allocated (which in
    ///   turn never exceeds `vertex_capacity`).
    /// - every edge reachable from a live vertex's out-list is live and
    ///   targets another live vertex.
    /// - the number of live edge-pool slots reachable this way equals
    ///   `edge_count * (1 or 2)` depending on `mode`.
    pub fn validate(&self, token: &GhostToken<'brand>) -> GraphResult<()> {
        let bad = || InvalidArgument::InvariantViolated.into();

        let valid_ids = self.valid_vertex_ids.borrow(token);
        if valid_ids.len() != *self.vertex_count.borrow(token) {
            return Err(bad());
        }
        for (i, &id) in valid_ids.iter().enumerate() {
            match &self.vertices.borrow(token)[id as usize] {
                VertexSlot::Occupied { valid_index, .. } if *valid_index as usize == i => {}
                _ => return Err(bad()),
            }
        }
        drop(valid_ids);

        let mut free_count = 0usize;
        let mut cursor = *self.vertex_free_head.borrow(token);
        let mut seen_free = std::collections::HashSet::new();
        while let Some(id) = cursor {
            if !seen_free.insert(id) {
                return Err(bad()); // cyclic free-list
            }
            free_count += 1;
            cursor = match &self.vertices.borrow(token)[id as usize] {
                VertexSlot::Free(next) => *next,
                VertexSlot::Occupied { .. } => return Err(bad()),
            };
        }
        // Slots are allocated into `vertices` lazily (on first use past the
        // free-list), so the invariant is against the number of slots ever
        // created, not the nominal capacity directly: every created slot is
        // either live or on the free-list, and the vector never exceeds
        // `vertex_capacity` (enforced by `add_vertex`'s exhaustion check).
        let created = self.vertices.borrow(token).len();
        if free_count + *self.vertex_count.borrow(token) != created || created > self.vertex_capacity {
            return Err(bad());
        }

        let mut live_edge_slots = 0usize;
        for &id in self.valid_vertex_ids.borrow(token) {
            let (first_out, out_degree) = match &self.vertices.borrow(token)[id as usize] {
                VertexSlot::Occupied { first_out, out_degree, .. } => (*first_out, *out_degree),
                VertexSlot::Free(_) => return Err(bad()),
            };
            let mut counted = 0u32;
            let mut cursor = first_out;
            while let Some(e) = cursor {
                let slot = &self.edges.borrow(token)[e as usize];
                if !slot.live || !self.is_live(token, slot.to) {
                    return Err(bad());
                }
                counted += 1;
                live_edge_slots += 1;
                cursor = slot.next_out;
            }
            if counted != out_degree {
                return Err(bad());
            }

            let (first_in, in_degree) = match &self.vertices.borrow(token)[id as usize] {
                VertexSlot::Occupied { first_in, in_degree, .. } => (*first_in, *in_degree),
                VertexSlot::Free(_) => unreachable!(),
            };
            let mut counted_in = 0u32;
            let mut cursor = first_in;
            while let Some(e) = cursor {
                counted_in += 1;
                cursor = self.edges.borrow(token)[e as usize].next_in;
            }
            if counted_in != in_degree {
                return Err(bad());
            }
        }

        let expected_slots_per_edge = if self.mode == EdgeMode::Undirected { 2 } else { 1 };
        if live_edge_slots != *self.edge_count.borrow(token) * expected_slots_per_edge {
            return Err(bad());
        }

        Ok(())
    }
}
