//! MCTS tree node representation.
//!
//! Each node represents the position reached by dropping a disc from the
//! parent's position. Nodes store the visit/win statistics used for UCB1
//! selection, plus terminal flags cached when the node is created.

use games_connect4::Board;

/// Exploration constant `c` in UCB1, fixed at √2.
pub const EXPLORATION_CONSTANT: f64 = std::f64::consts::SQRT_2;

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Position at this node
    pub board: Board,

    /// Parent node index (NONE for root). Navigation only; the arena owns every node.
    pub parent: NodeId,

    /// Column played from the parent to reach this node (0 for the root)
    pub column: u8,

    /// Expanded children, in expansion order
    pub children: Vec<NodeId>,

    /// Number of playouts that passed through this node
    pub visits: u64,

    /// Playouts won by the player who made the move into this node
    pub wins: u64,

    /// Legal columns not yet expanded. Popped from the back.
    pub untried: Vec<u8>,

    /// The move into this node completed four in a row
    pub is_win: bool,

    /// This node is a full board without a winner
    pub is_draw: bool,
}

impl SearchNode {
    /// Create a new root node.
    pub fn new_root(board: Board) -> Self {
        Self::new(board, NodeId::NONE, 0)
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, column: u8, board: Board) -> Self {
        Self::new(board, parent, column)
    }

    fn new(board: Board, parent: NodeId, column: u8) -> Self {
        Self {
            board,
            parent,
            column,
            children: Vec::new(),
            visits: 0,
            wins: 0,
            untried: board.legal_moves(),
            is_win: board.has_four_in_a_row(),
            is_draw: board.is_draw(),
        }
    }

    /// Playable columns at this node, ascending.
    pub fn legal_moves(&self) -> Vec<u8> {
        self.board.legal_moves()
    }

    /// Cached terminal check: the game ended on the move into this node.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.is_win || self.is_draw
    }

    /// Every legal move already has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// Observed win rate, 0.0 if never visited.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins as f64 / self.visits as f64
        }
    }

    /// UCB1 score used by the parent when choosing which child to descend into.
    ///
    /// `wins/visits + c * sqrt(ln(parent_visits) / visits)`, or `+inf` for an
    /// unvisited node so every child is tried once before any is exploited.
    #[inline]
    pub fn exploration_score(&self, parent_visits: u64) -> f64 {
        if self.visits == 0 {
            return f64::INFINITY;
        }
        let visits = self.visits as f64;
        self.win_rate() + EXPLORATION_CONSTANT * ((parent_visits as f64).ln() / visits).sqrt()
    }
}
