//! Arc membership for candidate-list pruning.

use std::ops::Range;
use std::slice;

use crate::error::{RoutingError, RoutingResult};
use crate::models::{Instance, VertexId};

#[derive(Debug, Clone)]
struct ExplicitArcs {
    allowed: Vec<bool>,
    successors: Vec<Vec<VertexId>>,
}

/// Set of ordered vertex pairs operators are allowed to introduce.
///
/// A freshly created set is unrestricted and costs O(1) memory; queries on
/// it always succeed. The first call to [`ArcSet::include_arc`] or
/// [`ArcSet::forbid_arc`] materializes an explicit n×n table together with
/// sorted successor lists.
///
/// # Examples
///
/// ```
/// use u_localsearch::arc_set::ArcSet;
///
/// let mut arcs = ArcSet::new(4);
/// assert!(arcs.is_unrestricted());
/// assert!(arcs.includes_arc(1, 2));
///
/// arcs.forbid_arc(1, 2);
/// assert!(!arcs.includes_arc(1, 2));
/// assert_eq!(arcs.successors(1).collect::<Vec<_>>(), vec![0, 1, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct ArcSet {
    size: usize,
    explicit: Option<ExplicitArcs>,
}

impl ArcSet {
    /// Creates an unrestricted arc set over `size` vertices.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            explicit: None,
        }
    }

    /// Creates an arc set over `size` vertices with no arc included.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            explicit: Some(ExplicitArcs {
                allowed: vec![false; size * size],
                successors: vec![Vec::new(); size],
            }),
        }
    }

    /// Unrestricted arc set sized for `instance`.
    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(instance.len())
    }

    /// Granular arc set: every vertex keeps the arcs to its `k` nearest
    /// vertices, and every arc into or out of the depot is kept.
    ///
    /// Ties in distance are broken by vertex id.
    pub fn granular(instance: &Instance, k: usize) -> Self {
        let n = instance.len();
        let depot = instance.depot();
        let mut set = Self::empty(n);
        for u in 0..n {
            let mut others: Vec<VertexId> = (0..n).filter(|&v| v != u).collect();
            others.sort_by(|&a, &b| {
                instance
                    .distance(u, a)
                    .total_cmp(&instance.distance(u, b))
                    .then(a.cmp(&b))
            });
            for &v in others.iter().take(k) {
                set.include_arc(u, v);
            }
            set.include_arc(u, depot);
            set.include_arc(depot, u);
        }
        set
    }

    /// Number of vertices covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if every arc is permitted without an explicit table.
    pub fn is_unrestricted(&self) -> bool {
        self.explicit.is_none()
    }

    /// Returns `true` if the arc `from → to` may be introduced.
    #[inline]
    pub fn includes_arc(&self, from: VertexId, to: VertexId) -> bool {
        match &self.explicit {
            None => from < self.size && to < self.size,
            Some(arcs) => from < self.size && to < self.size && arcs.allowed[from * self.size + to],
        }
    }

    /// Permits the arc `from → to`.
    pub fn include_arc(&mut self, from: VertexId, to: VertexId) {
        let size = self.size;
        let arcs = self.materialize();
        let idx = from * size + to;
        if !arcs.allowed[idx] {
            arcs.allowed[idx] = true;
            let list = &mut arcs.successors[from];
            let pos = list.partition_point(|&v| v < to);
            list.insert(pos, to);
        }
    }

    /// Forbids the arc `from → to`.
    pub fn forbid_arc(&mut self, from: VertexId, to: VertexId) {
        let size = self.size;
        let arcs = self.materialize();
        let idx = from * size + to;
        if arcs.allowed[idx] {
            arcs.allowed[idx] = false;
            arcs.successors[from].retain(|&v| v != to);
        }
    }

    /// Vertices `v` with `vertex → v` permitted, in ascending id order.
    pub fn successors(&self, vertex: VertexId) -> Successors<'_> {
        match &self.explicit {
            None => Successors::All(0..self.size),
            Some(arcs) => Successors::Listed(arcs.successors[vertex].iter()),
        }
    }

    /// Number of permitted arcs.
    pub fn num_arcs(&self) -> usize {
        match &self.explicit {
            None => self.size * self.size,
            Some(arcs) => arcs.successors.iter().map(Vec::len).sum(),
        }
    }

    /// Checks that this set covers exactly the instance's vertices.
    pub fn check_size(&self, instance: &Instance) -> RoutingResult<()> {
        if self.size != instance.len() {
            return Err(RoutingError::ArcSetSizeMismatch {
                expected: instance.len(),
                actual: self.size,
            });
        }
        Ok(())
    }

    fn materialize(&mut self) -> &mut ExplicitArcs {
        let size = self.size;
        self.explicit.get_or_insert_with(|| ExplicitArcs {
            allowed: vec![true; size * size],
            successors: (0..size).map(|_| (0..size).collect()).collect(),
        })
    }
}

/// Iterator over the successors of a vertex in an [`ArcSet`].
#[derive(Debug, Clone)]
pub enum Successors<'a> {
    /// Every vertex, for unrestricted sets.
    All(Range<usize>),
    /// Explicit successor list.
    Listed(slice::Iter<'a, VertexId>),
}

impl Iterator for Successors<'_> {
    type Item = VertexId;

    fn next(&mut self) -> Option<VertexId> {
        match self {
            Successors::All(range) => range.next(),
            Successors::Listed(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Successors::All(range) => range.size_hint(),
            Successors::Listed(iter) => iter.size_hint(),
        }
    }
}
