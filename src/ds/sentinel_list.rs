//! Intrusive doubly-linked list with permanent HEAD/TAIL sentinels.
//!
//! Nodes live in a [`NodeArena`] and link to their neighbors by [`NodeId`],
//! giving stable handles and O(1) splicing without pointer chasing. Two
//! sentinel nodes are allocated at construction and stay linked for the
//! lifetime of the list; live nodes sit strictly between them.
//!
//! ## Architecture
//!
//! ```text
//!   HEAD ◄──► [A] ◄──► [B] ◄──► [C] ◄──► TAIL
//!    │        MRU               LRU        │
//!    └─ sentinel (End::Head)    sentinel (End::Tail) ─┘
//! ```
//!
//! Sentinels carry an [`End`] tag instead of a payload, so traversal code can
//! detect a boundary with [`is_sentinel`](SentinelList::is_sentinel) rather
//! than a null check, and [`unlink`](SentinelList::unlink) can refuse to
//! touch them. The two splice primitives are
//! [`insert_between`](SentinelList::insert_between) and `unlink`; everything
//! else (`push_front`, `pop_back`, `move_to_front`) is sugar over them.
//!
//! ## Operations
//!
//! | Operation        | Description                               | Complexity |
//! |------------------|-------------------------------------------|------------|
//! | `insert_between` | Splice a fresh node between two others    | O(1)       |
//! | `unlink`         | Detach and free a node (sentinel: no-op)  | O(1)       |
//! | `move_to_front`  | Re-splice an existing node after HEAD     | O(1)       |
//! | `prev_id`/`next_id` | Neighbor handles, sentinels included   | O(1)       |
//!
//! `debug_validate_invariants()` is available in debug/test builds.

use crate::ds::node_arena::{NodeArena, NodeId};

/// Tag identifying which end of the list a sentinel anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

#[derive(Debug)]
enum Payload<T> {
    Sentinel(End),
    Live(T),
}

#[derive(Debug)]
struct Node<T> {
    payload: Payload<T>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Doubly-linked list whose endpoints are permanently linked sentinel nodes.
#[derive(Debug)]
pub struct SentinelList<T> {
    arena: NodeArena<Node<T>>,
    head: NodeId,
    tail: NodeId,
    len: usize,
}

impl<T> SentinelList<T> {
    /// Creates an empty list with its two sentinels linked to each other.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room reserved for `capacity` live nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = NodeArena::with_capacity(capacity.saturating_add(2));
        let head = arena.alloc(Node {
            payload: Payload::Sentinel(End::Head),
            prev: None,
            next: None,
        });
        let tail = arena.alloc(Node {
            payload: Payload::Sentinel(End::Tail),
            prev: None,
            next: None,
        });
        arena.get_mut(head).expect("head sentinel missing").next = Some(tail);
        arena.get_mut(tail).expect("tail sentinel missing").prev = Some(head);
        Self {
            arena,
            head,
            tail,
            len: 0,
        }
    }

    /// Returns the number of live nodes (sentinels excluded).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no live nodes are linked.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the HEAD sentinel.
    pub fn head_id(&self) -> NodeId {
        self.head
    }

    /// Handle of the TAIL sentinel.
    pub fn tail_id(&self) -> NodeId {
        self.tail
    }

    /// Returns `true` if `id` names one of the two sentinels.
    pub fn is_sentinel(&self, id: NodeId) -> bool {
        matches!(
            self.arena.get(id),
            Some(Node {
                payload: Payload::Sentinel(_),
                ..
            })
        )
    }

    /// Returns the sentinel tag for `id`, or `None` for live/freed nodes.
    pub fn sentinel_end(&self, id: NodeId) -> Option<End> {
        match self.arena.get(id) {
            Some(Node {
                payload: Payload::Sentinel(end),
                ..
            }) => Some(*end),
            _ => None,
        }
    }

    /// Returns `true` if `id` names a live (non-sentinel) node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(
            self.arena.get(id),
            Some(Node {
                payload: Payload::Live(_),
                ..
            })
        )
    }

    /// Handle of the node after `id` (may be the TAIL sentinel).
    pub fn next_id(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.next)
    }

    /// Handle of the node before `id` (may be the HEAD sentinel).
    pub fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.prev)
    }

    /// Handle of the newest live node, if any.
    pub fn front_id(&self) -> Option<NodeId> {
        let first = self.next_id(self.head)?;
        (first != self.tail).then_some(first)
    }

    /// Handle of the oldest live node, if any.
    pub fn back_id(&self) -> Option<NodeId> {
        let last = self.prev_id(self.tail)?;
        (last != self.head).then_some(last)
    }

    /// Returns the payload at `id`, if it names a live node.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.arena.get(id) {
            Some(Node {
                payload: Payload::Live(value),
                ..
            }) => Some(value),
            _ => None,
        }
    }

    /// Returns a mutable payload reference, if `id` names a live node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.arena.get_mut(id) {
            Some(Node {
                payload: Payload::Live(value),
                ..
            }) => Some(value),
            _ => None,
        }
    }

    /// Splices a fresh node carrying `payload` between `prev` and `next`.
    ///
    /// `prev` and `next` must be adjacent, with sentinels allowed on either
    /// side. Returns the new node's handle.
    pub fn insert_between(&mut self, prev: NodeId, next: NodeId, payload: T) -> NodeId {
        debug_assert_eq!(self.next_id(prev), Some(next), "splice points not adjacent");
        let id = self.arena.alloc(Node {
            payload: Payload::Live(payload),
            prev: Some(prev),
            next: Some(next),
        });
        if let Some(node) = self.arena.get_mut(prev) {
            node.next = Some(id);
        }
        if let Some(node) = self.arena.get_mut(next) {
            node.prev = Some(id);
        }
        self.len += 1;
        id
    }

    /// Inserts `payload` directly after the HEAD sentinel (MRU position).
    pub fn push_front(&mut self, payload: T) -> NodeId {
        let first = self.next_id(self.head).expect("head sentinel unlinked");
        self.insert_between(self.head, first, payload)
    }

    /// Inserts `payload` directly before the TAIL sentinel (LRU position).
    pub fn push_back(&mut self, payload: T) -> NodeId {
        let last = self.prev_id(self.tail).expect("tail sentinel unlinked");
        self.insert_between(last, self.tail, payload)
    }

    /// Detaches the node at `id` and returns its payload.
    ///
    /// Unlinking a sentinel or an already-freed node is a silent no-op that
    /// returns `None`.
    pub fn unlink(&mut self, id: NodeId) -> Option<T> {
        if self.is_sentinel(id) {
            return None;
        }
        self.detach(id)?;
        match self.arena.free(id)?.payload {
            Payload::Live(value) => {
                self.len -= 1;
                Some(value)
            },
            // detach already refused sentinels
            Payload::Sentinel(_) => None,
        }
    }

    /// Removes and returns the newest live payload.
    pub fn pop_front(&mut self) -> Option<T> {
        let id = self.front_id()?;
        self.unlink(id)
    }

    /// Removes and returns the oldest live payload.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.back_id()?;
        self.unlink(id)
    }

    /// Re-splices an existing live node to the MRU position.
    ///
    /// Returns `false` if `id` is a sentinel or not live.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.next_id(self.head) == Some(id) {
            return true;
        }
        self.detach(id);
        let first = self.next_id(self.head).expect("head sentinel unlinked");
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = Some(self.head);
            node.next = Some(first);
        }
        if let Some(node) = self.arena.get_mut(self.head) {
            node.next = Some(id);
        }
        if let Some(node) = self.arena.get_mut(first) {
            node.prev = Some(id);
        }
        true
    }

    /// Unlinks every live node; sentinels stay linked to each other.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Iterates payloads from front (MRU) to back (LRU).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.next_id(self.head),
        }
    }

    /// Iterates live node handles from front to back.
    pub fn iter_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.next_id(self.head);
        std::iter::from_fn(move || {
            let id = current?;
            if id == self.tail {
                return None;
            }
            current = self.next_id(id);
            Some(id)
        })
    }

    fn detach(&mut self, id: NodeId) -> Option<()> {
        let (prev, next) = {
            let node = self.arena.get(id)?;
            if matches!(node.payload, Payload::Sentinel(_)) {
                return None;
            }
            (node.prev?, node.next?)
        };
        if let Some(node) = self.arena.get_mut(prev) {
            node.next = Some(next);
        }
        if let Some(node) = self.arena.get_mut(next) {
            node.prev = Some(prev);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.prev = None;
            node.next = None;
        }
        Some(())
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert_eq!(self.sentinel_end(self.head), Some(End::Head));
        assert_eq!(self.sentinel_end(self.tail), Some(End::Tail));
        assert_eq!(self.prev_id(self.head), None);
        assert_eq!(self.next_id(self.tail), None);

        let mut count = 0usize;
        let mut prev = self.head;
        let mut current = self.next_id(self.head).expect("head sentinel unlinked");
        while current != self.tail {
            assert!(self.contains(current), "sentinel or freed node mid-list");
            assert_eq!(self.prev_id(current), Some(prev));
            prev = current;
            current = self.next_id(current).expect("interior node missing next");
            count += 1;
            assert!(count <= self.len, "cycle detected");
        }
        assert_eq!(self.prev_id(self.tail), Some(prev));
        assert_eq!(count, self.len);
        // arena holds the live nodes plus the two sentinels
        assert_eq!(self.arena.len(), self.len + 2);
    }
}

impl<T> Default for SentinelList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    list: &'a SentinelList<T>,
    current: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let value = self.list.get(id)?;
        self.current = self.list.next_id(id);
        Some(value)
    }
}
