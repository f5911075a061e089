use thiserror::Error;
use wfarg_core::{DemeId, NodeId, Position, Time};

/// Errors from recording nodes and edges.
#[derive(Error, Debug, PartialEq)]
pub enum TablesError {
    /// Nodes must be recorded in id order
    #[error("Node {found} recorded out of order, expected {expected}")]
    NonContiguousNode {
        /// The id the node table expects next
        expected: NodeId,
        /// The id given
        found: NodeId,
    },
    /// Nodes must be allocated before being recorded
    #[error("Node {found} has not been allocated")]
    UnallocatedNode {
        /// The id given
        found: NodeId,
    },
    /// Edges require `left < right`
    #[error("Invalid position range: {found:?}")]
    InvalidLeftRight {
        /// `(left, right)`
        found: (Position, Position),
    },
    /// An edge refers to a node not in the node table
    #[error("Node {found} is out of bounds")]
    NodeOutOfBounds {
        /// The id given
        found: NodeId,
    },
    /// Parent ids must be less than child ids
    #[error("Node id order violation: parent {parent}, child {child}")]
    NodeIdsUnordered {
        /// The parent id
        parent: NodeId,
        /// The child id
        child: NodeId,
    },
    /// Parents must be born before their children
    #[error("Node time order violation: parent {parent}, child {child}")]
    NodeTimesUnordered {
        /// The parent id
        parent: NodeId,
        /// The child id
        child: NodeId,
    },
    /// No more node ids can be represented
    #[error("Node id space exhausted")]
    IdOverflow,
}

/// Result type for operations on tables
pub type TablesResult<T> = std::result::Result<T, TablesError>;

/// A Node is the birth of one chromosome.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Node {
    /// Id of this node, equal to its row in the [``NodeTable``]
    pub id: NodeId,
    /// Birth time, forwards in time
    pub generation: Time,
    /// Population (deme) of node
    pub population: DemeId,
}

/// An Edge is a transmission event:
/// the interval `[left, right)` of `child`
/// was inherited from `parent`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    /// Left edge of the interval
    pub left: Position,
    /// Right edge of the interval
    pub right: Position,
    /// Id of parent in a [``NodeTable``]
    pub parent: NodeId,
    /// Id of child in a [``NodeTable``]
    pub child: NodeId,
}

impl Edge {
    /// Create a new edge.
    ///
    /// # Errors
    ///
    /// [``TablesError::InvalidLeftRight``] unless `left < right`.
    pub fn new(left: Position, right: Position, parent: NodeId, child: NodeId) -> TablesResult<Self> {
        if right <= left {
            return Err(TablesError::InvalidLeftRight {
                found: (left, right),
            });
        }
        Ok(Self {
            left,
            right,
            parent,
            child,
        })
    }
}

/// Nodes, ordered by id
pub type NodeTable = Vec<Node>;
/// Edges, in the order they were recorded
pub type EdgeTable = Vec<Edge>;

/// Return a closure to help reverse time.
///
/// For all input values, ``t`` the closure will
/// return ``x - t``, converting forward birth times
/// into the "time ago" used by genealogy libraries.
///
/// ```
/// use wfarg::Time;
/// let reverser = wfarg::simple_time_reverser(Time::from(10));
/// assert_eq!(reverser(Time::from(10)), 0.0);
/// assert_eq!(reverser(Time::from(0)), 10.0);
/// ```
pub fn simple_time_reverser(x: Time) -> Box<dyn Fn(Time) -> f64> {
    Box::new(move |t: Time| f64::from(x) - f64::from(t))
}

/// Append-only storage of the nodes and
/// edges created during a simulation,
/// plus the allocator of node ids.
///
/// Entries are never modified or removed
/// once recorded.
///
/// # Example
///
/// ```
/// use wfarg::{AncestryTracker, DemeId, Edge, Position, Time};
///
/// // Two founder chromosomes, ids 0 and 1.
/// let mut tracker = AncestryTracker::new(1).unwrap();
/// let child = tracker.allocate_offspring_id().unwrap();
/// assert_eq!(child, 2);
/// tracker.record_node(child, Time::from(1), DemeId::from(0)).unwrap();
/// let breakpoint = Position::new_valid(0.5);
/// tracker
///     .record_edges(&[
///         Edge::new(Position::LEFT, breakpoint, 0.into(), child).unwrap(),
///         Edge::new(breakpoint, Position::RIGHT, 1.into(), child).unwrap(),
///     ])
///     .unwrap();
/// assert_eq!(tracker.num_nodes(), 3);
/// assert_eq!(tracker.num_edges(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct AncestryTracker {
    nodes: NodeTable,
    edges: EdgeTable,
    next_id: NodeId,
}

impl AncestryTracker {
    /// Create a tracker holding the `2 * popsize`
    /// founder nodes, ids `[0, 2 * popsize)`, born at time 0
    /// in deme 0.
    pub fn new(popsize: u32) -> TablesResult<Self> {
        Self::with_capacity(popsize, 0, 0)
    }

    /// As [``AncestryTracker::new``], reserving room for
    /// `nodes` nodes and `edges` edges in total.
    pub fn with_capacity(popsize: u32, nodes: usize, edges: usize) -> TablesResult<Self> {
        let num_founders = popsize.checked_mul(2).ok_or(TablesError::IdOverflow)?;
        let mut tracker = Self {
            nodes: NodeTable::with_capacity(std::cmp::max(nodes, num_founders as usize)),
            edges: EdgeTable::with_capacity(edges),
            next_id: NodeId::from(0),
        };
        for _ in 0..num_founders {
            let id = tracker.allocate_offspring_id()?;
            tracker.record_node(id, Time::from(0), DemeId::from(0))?;
        }
        Ok(tracker)
    }

    /// Return the next unused id and advance the allocator.
    ///
    /// Ids are strictly increasing over the lifetime of `self`.
    pub fn allocate_offspring_id(&mut self) -> TablesResult<NodeId> {
        let id = self.next_id;
        self.next_id = id.next().ok_or(TablesError::IdOverflow)?;
        Ok(id)
    }

    /// Append a node.
    ///
    /// # Errors
    ///
    /// * [``TablesError::UnallocatedNode``] if `id` has not been
    ///   returned by [``AncestryTracker::allocate_offspring_id``].
    /// * [``TablesError::NonContiguousNode``] unless `id` is
    ///   the next row of the node table.
    pub fn record_node(
        &mut self,
        id: NodeId,
        generation: Time,
        population: DemeId,
    ) -> TablesResult<NodeId> {
        if id >= self.next_id {
            return Err(TablesError::UnallocatedNode { found: id });
        }
        let expected =
            NodeId::try_from(self.nodes.len()).map_err(|_| TablesError::IdOverflow)?;
        if id != expected {
            return Err(TablesError::NonContiguousNode {
                expected,
                found: id,
            });
        }
        self.nodes.push(Node {
            id,
            generation,
            population,
        });
        Ok(id)
    }

    fn validate_edge(&self, edge: &Edge) -> TablesResult<()> {
        if edge.right <= edge.left {
            return Err(TablesError::InvalidLeftRight {
                found: (edge.left, edge.right),
            });
        }
        let parent = self
            .node(edge.parent)
            .ok_or(TablesError::NodeOutOfBounds { found: edge.parent })?;
        let child = self
            .node(edge.child)
            .ok_or(TablesError::NodeOutOfBounds { found: edge.child })?;
        if edge.parent >= edge.child {
            return Err(TablesError::NodeIdsUnordered {
                parent: edge.parent,
                child: edge.child,
            });
        }
        // child time must be > parent time b/c time goes forwards
        if child.generation <= parent.generation {
            return Err(TablesError::NodeTimesUnordered {
                parent: edge.parent,
                child: edge.child,
            });
        }
        Ok(())
    }

    /// Append edges in the order given.
    ///
    /// Both nodes of every edge must already be recorded,
    /// and the parent must precede the child in both id and birth time.
    /// Nothing is appended if any edge is invalid.
    pub fn record_edges(&mut self, edges: &[Edge]) -> TablesResult<()> {
        for e in edges {
            self.validate_edge(e)?;
        }
        self.edges.extend_from_slice(edges);
        Ok(())
    }

    /// Reserve room for `nodes` more nodes and `edges` more edges.
    pub fn reserve(&mut self, nodes: usize, edges: usize) {
        self.nodes.reserve(nodes);
        self.edges.reserve(edges);
    }

    /// The id the next call to
    /// [``AncestryTracker::allocate_offspring_id``] will return.
    pub fn next_id(&self) -> NodeId {
        self.next_id
    }

    /// Return immutable reference to the [node table](type.NodeTable.html)
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return immutable reference to the [edge table](type.EdgeTable.html)
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        usize::try_from(id).ok().and_then(|i| self.nodes.get(i))
    }

    /// Return number of nodes
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Return number of edges
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Provide an enumeration over the [node table](type.NodeTable.html)
    pub fn enumerate_nodes(&self) -> std::iter::Enumerate<std::slice::Iter<Node>> {
        self.nodes.iter().enumerate()
    }

    /// Provide an enumeration over the [edge table](type.EdgeTable.html)
    pub fn enumerate_edges(&self) -> std::iter::Enumerate<std::slice::Iter<Edge>> {
        self.edges.iter().enumerate()
    }

    /// Birth time of the youngest node.
    pub fn max_generation(&self) -> Option<Time> {
        self.nodes.last().map(|n| n.generation)
    }

    /// Give up ownership of the tables.
    pub fn into_tables(self) -> (NodeTable, EdgeTable) {
        (self.nodes, self.edges)
    }
}
