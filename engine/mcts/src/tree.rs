//! MCTS tree structure with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices.
//! Each node lists its own children; the parent link is a plain index used
//! only for walking back up during backpropagation. Dropping the tree frees
//! every node at once.

use games_connect4::{Board, Outcome};

use crate::node::{NodeId, SearchNode};
use crate::search::SearchError;

/// Per-column statistics read off the root's children.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveEstimate {
    /// Column played from the root (0-based, left to right)
    pub column: u8,
    pub visits: u64,
    /// Playouts won by the player to move at the root
    pub wins: u64,
    /// `wins / visits`, 0.0 when unvisited. Always within [0, 1].
    pub win_probability: f64,
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0)
    root: NodeId,
}

impl SearchTree {
    /// Create a new tree rooted at `board`.
    pub fn new(board: Board) -> Self {
        Self {
            nodes: vec![SearchNode::new_root(board)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0 as usize]
    }

    fn allocate(&mut self, node: SearchNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Select the child of `node_id` with the strictly highest UCB1 score.
    ///
    /// Ties keep the earliest child. Returns None if the node has no children.
    pub fn select_best_child(&self, node_id: NodeId) -> Option<NodeId> {
        let node = self.get(node_id);
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;

        for &child_id in &node.children {
            let score = self.get(child_id).exploration_score(node.visits);
            if best.is_none() || score > best_score {
                best = Some(child_id);
                best_score = score;
            }
        }

        best
    }

    /// Expand the most recently generated untried move of `node_id`.
    ///
    /// Moves are generated in ascending column order and popped from the back,
    /// so the highest remaining column is expanded first.
    pub fn expand_one_child(&mut self, node_id: NodeId) -> Result<NodeId, SearchError> {
        let node = self.get_mut(node_id);
        let column = node.untried.pop().ok_or_else(|| {
            SearchError::InvalidState(format!("node {} has no untried moves", node_id.0))
        })?;
        let board = node.board.apply_move(column)?;

        let child_id = self.allocate(SearchNode::new_child(node_id, column, board));
        self.get_mut(node_id).children.push(child_id);

        Ok(child_id)
    }

    /// Backpropagate a playout result from `leaf_id` to the root.
    ///
    /// Every node on the path gets a visit. A node gets a win when the
    /// winner is the player who moved into it, i.e. its parent's mover.
    pub fn propagate_result(&mut self, leaf_id: NodeId, outcome: Outcome) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let parent_id = self.get(current_id).parent;
            let credited = match outcome {
                Outcome::Winner(winner) => {
                    parent_id.is_some() && self.get(parent_id).board.current_player() == winner
                }
                Outcome::Draw => false,
            };

            let node = self.get_mut(current_id);
            node.visits += 1;
            if credited {
                node.wins += 1;
            }

            current_id = parent_id;
        }
    }

    /// Statistics for every expanded root child, in expansion order.
    pub fn root_estimates(&self) -> Vec<MoveEstimate> {
        self.get(self.root)
            .children
            .iter()
            .map(|&id| {
                let child = self.get(id);
                MoveEstimate {
                    column: child.column,
                    visits: child.visits,
                    wins: child.wins,
                    win_probability: child.win_rate(),
                }
            })
            .collect()
    }

    /// Estimates for every legal root column.
    ///
    /// Expanded children come first, in expansion order, followed by the
    /// columns not yet expanded, ascending, with zero visits and a 0.0 win
    /// probability. Empty when the root is a decided position.
    pub fn legal_move_estimates(&self) -> Vec<MoveEstimate> {
        let root = self.get(self.root);
        if root.is_terminal() {
            return Vec::new();
        }

        let mut estimates = self.root_estimates();
        let mut untried = root.untried.clone();
        untried.sort_unstable();
        estimates.extend(untried.into_iter().map(|column| MoveEstimate {
            column,
            visits: 0,
            wins: 0,
            win_probability: 0.0,
        }));
        estimates
    }

    /// Most visited root column. Ties keep the earliest child.
    /// Returns None if the root has no children.
    pub fn best_move(&self) -> Option<u8> {
        let mut best: Option<&SearchNode> = None;
        for &id in &self.get(self.root).children {
            let child = self.get(id);
            if best.map_or(true, |b| child.visits > b.visits) {
                best = Some(child);
            }
        }
        best.map(|node| node.column)
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visits,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        self.get(node_id)
            .children
            .iter()
            .map(|&id| self.compute_max_depth(id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u64,
    pub max_depth: u32,
}
