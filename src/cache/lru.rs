//! LRU List Module
//!
//! Implements Least Recently Used ordering for cache eviction.

const NIL: usize = usize::MAX;

// == LRU Handle ==
/// Stable reference to a key's node inside an [`LruList`].
///
/// Handles stay valid until the node is removed; removed slots are recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LruHandle(usize);

#[derive(Debug)]
struct Node<K> {
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == LRU List ==
/// Index-based doubly linked list ordering keys by recency.
///
/// - Front = Least recently used (next eviction candidate)
/// - Back = Most recently used
///
/// Every operation is O(1): nodes live in a slab and link to each other by
/// index, so moving a key to the back never scans the list.
#[derive(Debug)]
pub struct LruList<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<K> Default for LruList<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruList<K> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            head: NIL,
            tail: NIL,
            len: 0,
        }
    }

    // == Push Back ==
    /// Inserts a key at the most recently used position.
    pub fn push_back(&mut self, key: K) -> LruHandle {
        let node = Node {
            key: Some(key),
            prev: NIL,
            next: NIL,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        };
        self.link_back(idx);
        self.len += 1;
        LruHandle(idx)
    }

    // == Move To Back ==
    /// Marks a key as most recently used.
    pub fn move_to_back(&mut self, handle: LruHandle) {
        let idx = handle.0;
        if !self.is_live(idx) || idx == self.tail {
            return;
        }
        self.unlink(idx);
        self.link_back(idx);
    }

    // == Remove ==
    /// Unlinks a node and returns its key.
    pub fn remove(&mut self, handle: LruHandle) -> Option<K> {
        let idx = handle.0;
        if !self.is_live(idx) {
            return None;
        }
        self.unlink(idx);
        self.len -= 1;
        self.free.push(idx);
        self.nodes[idx].key.take()
    }

    // == Pop Front ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if the list is empty.
    pub fn pop_front(&mut self) -> Option<K> {
        if self.head == NIL {
            return None;
        }
        self.remove(LruHandle(self.head))
    }

    // == Peek Front ==
    /// Returns the least recently used key without removing it.
    pub fn front(&self) -> Option<&K> {
        self.nodes.get(self.head).and_then(|node| node.key.as_ref())
    }

    // == Iterate ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let node = self.nodes.get(cursor)?;
            cursor = node.next;
            node.key.as_ref()
        })
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.head = NIL;
        self.tail = NIL;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn is_live(&self, idx: usize) -> bool {
        self.nodes.get(idx).is_some_and(|node| node.key.is_some())
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev == NIL {
            self.head = next;
        } else {
            self.nodes[prev].next = next;
        }
        if next == NIL {
            self.tail = prev;
        } else {
            self.nodes[next].prev = prev;
        }
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = NIL;
    }

    fn link_back(&mut self, idx: usize) {
        self.nodes[idx].prev = self.tail;
        self.nodes[idx].next = NIL;
        if self.tail == NIL {
            self.head = idx;
        } else {
            self.nodes[self.tail].next = idx;
        }
        self.tail = idx;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(lru: &LruList<&'static str>) -> Vec<&'static str> {
        lru.iter().copied().collect()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruList<String> = LruList::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.front(), None);
    }

    #[test]
    fn test_lru_push_back_orders_by_insertion() {
        let mut lru = LruList::new();

        lru.push_back("key1");
        lru.push_back("key2");
        lru.push_back("key3");

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.front(), Some(&"key1"));
        assert_eq!(keys(&lru), vec!["key1", "key2", "key3"]);
    }

    #[test]
    fn test_lru_move_to_back() {
        let mut lru = LruList::new();

        let a = lru.push_back("a");
        lru.push_back("b");
        lru.push_back("c");

        lru.move_to_back(a);

        assert_eq!(lru.len(), 3);
        assert_eq!(lru.front(), Some(&"b"));
        assert_eq!(keys(&lru), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_lru_move_tail_is_noop() {
        let mut lru = LruList::new();

        lru.push_back("a");
        let b = lru.push_back("b");
        lru.move_to_back(b);

        assert_eq!(keys(&lru), vec!["a", "b"]);
    }

    #[test]
    fn test_lru_pop_front() {
        let mut lru = LruList::new();

        lru.push_back("key1");
        lru.push_back("key2");
        lru.push_back("key3");

        assert_eq!(lru.pop_front(), Some("key1"));
        assert_eq!(lru.len(), 2);
        assert_eq!(lru.pop_front(), Some("key2"));
        assert_eq!(lru.pop_front(), Some("key3"));
        assert_eq!(lru.pop_front(), None);
        assert!(lru.is_empty());
    }

    #[test]
    fn test_lru_remove_middle() {
        let mut lru = LruList::new();

        lru.push_back("key1");
        let key2 = lru.push_back("key2");
        lru.push_back("key3");

        assert_eq!(lru.remove(key2), Some("key2"));
        assert_eq!(lru.len(), 2);
        assert_eq!(keys(&lru), vec!["key1", "key3"]);

        // A stale handle is ignored
        assert_eq!(lru.remove(key2), None);
        lru.move_to_back(key2);
        assert_eq!(keys(&lru), vec!["key1", "key3"]);
    }

    #[test]
    fn test_lru_recycles_freed_slots() {
        let mut lru = LruList::new();

        let a = lru.push_back("a");
        lru.push_back("b");
        lru.remove(a);
        let c = lru.push_back("c");

        assert_eq!(c, a, "freed slot should be reused");
        assert_eq!(keys(&lru), vec!["b", "c"]);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruList::new();

        let a = lru.push_back("a");
        let b = lru.push_back("b");
        let c = lru.push_back("c");

        lru.move_to_back(a);
        lru.move_to_back(c);
        lru.move_to_back(b);

        assert_eq!(lru.pop_front(), Some("a"));
        assert_eq!(lru.pop_front(), Some("c"));
        assert_eq!(lru.pop_front(), Some("b"));
    }

    #[test]
    fn test_lru_clear() {
        let mut lru = LruList::new();

        lru.push_back("a");
        lru.push_back("b");
        lru.clear();

        assert!(lru.is_empty());
        assert_eq!(lru.front(), None);

        lru.push_back("c");
        assert_eq!(keys(&lru), vec!["c"]);
    }
}
