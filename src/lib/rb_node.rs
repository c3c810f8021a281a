use crate::error::AuditError;

/// Index of a node record in the arena.
pub(super) type NodeId = usize;

/// The shared leaf sentinel. Every missing child points here and it is never
/// written to, so the rebalancing code needs no null checks.
pub(super) const NIL: NodeId = 0;

/// The end sentinel: a payload-less real node that is always the right-most
/// node of the tree and denotes the one-past-the-last position.
pub(super) const END: NodeId = 1;

/// Number of arena slots taken by the two sentinels.
const SENTINELS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Color {
    Red,
    Black,
}

#[derive(Clone)]
pub(super) struct Node<T> {
    // None only for the two sentinels and for vacant slots.
    pub(super) payload: Option<T>,
    pub(super) color: Color,
    pub(super) parent: NodeId,
    pub(super) left: NodeId,
    pub(super) right: NodeId,
    // Bumped every time the slot is vacated so that stale handles can be told apart.
    pub(super) generation: u32,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Node {
            payload: None,
            color: Color::Black,
            parent: NIL,
            left: NIL,
            right: NIL,
            generation: 0,
        }
    }
}

/// The node graph of one tree: an arena of records linked by index.
#[derive(Clone)]
pub(super) struct Nodes<T> {
    slots: Vec<Node<T>>,
    free: Vec<NodeId>,
    pub(super) root: NodeId,
    // Bumped whenever the arena is cut back to the sentinels.
    epoch: u32,
}

impl<T> Nodes<T> {
    pub(super) fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + SENTINELS);
        slots.push(Node::sentinel());
        slots.push(Node::sentinel());
        Nodes {
            slots,
            free: Vec::new(),
            root: END,
            epoch: 0,
        }
    }

    /// Number of slots in the arena, sentinels included.
    pub(super) fn capacity_used(&self) -> usize {
        self.slots.len()
    }

    /// Number of vacant slots waiting for reuse.
    pub(super) fn vacant(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub(super) fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Number of element nodes currently in use.
    pub(super) fn live(&self) -> usize {
        self.slots.len() - SENTINELS - self.free.len()
    }

    #[inline]
    pub(super) fn color(&self, id: NodeId) -> Color {
        self.slots[id].color
    }

    #[inline]
    pub(super) fn is_red(&self, id: NodeId) -> bool {
        self.slots[id].color == Color::Red
    }

    #[inline]
    pub(super) fn is_black(&self, id: NodeId) -> bool {
        self.slots[id].color == Color::Black
    }

    #[inline]
    pub(super) fn left(&self, id: NodeId) -> NodeId {
        self.slots[id].left
    }

    #[inline]
    pub(super) fn right(&self, id: NodeId) -> NodeId {
        self.slots[id].right
    }

    #[inline]
    pub(super) fn parent(&self, id: NodeId) -> NodeId {
        self.slots[id].parent
    }

    #[inline]
    pub(super) fn generation(&self, id: NodeId) -> u32 {
        self.slots[id].generation
    }

    /// Payload of a node; `None` for the sentinels.
    #[inline]
    pub(super) fn payload(&self, id: NodeId) -> Option<&T> {
        self.slots[id].payload.as_ref()
    }

    /// True if `id` is an element node currently linked into the tree.
    pub(super) fn is_live(&self, id: NodeId) -> bool {
        id >= SENTINELS && id < self.slots.len() && self.slots[id].payload.is_some()
    }

    #[inline]
    fn paint(&mut self, id: NodeId, color: Color) {
        debug_assert_ne!(id, NIL, "leaf sentinel must stay black");
        self.slots[id].color = color;
    }

    /// Stores a new Red node with both children on the leaf sentinel.
    /// The node is not linked into the tree until [`Nodes::attach`].
    pub(super) fn alloc(&mut self, payload: T) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                let node = &mut self.slots[id];
                node.payload = Some(payload);
                node.color = Color::Red;
                id
            }
            None => {
                self.slots.push(Node {
                    payload: Some(payload),
                    color: Color::Red,
                    parent: NIL,
                    left: NIL,
                    right: NIL,
                    generation: 0,
                });
                self.slots.len() - 1
            }
        }
    }

    /// Vacates a node that has already been detached, returning its payload.
    pub(super) fn release(&mut self, id: NodeId) -> Option<T> {
        debug_assert!(id >= SENTINELS, "sentinels are never released");
        let node = &mut self.slots[id];
        let payload = node.payload.take();
        node.generation = node.generation.wrapping_add(1);
        node.color = Color::Black;
        node.parent = NIL;
        node.left = NIL;
        node.right = NIL;
        self.free.push(id);
        if self.live() == 0 {
            self.reset();
        }
        payload
    }

    // Drops every element slot and returns the end sentinel to its initial
    // state. Slots handed out afterwards start again at generation 0, so the
    // epoch moves on to keep older handles from matching them.
    fn reset(&mut self) {
        self.slots.truncate(SENTINELS);
        self.free.clear();
        let end = &mut self.slots[END];
        end.color = Color::Black;
        end.parent = NIL;
        end.left = NIL;
        end.right = NIL;
        self.root = END;
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Swaps the payload of a live node, returning the old one.
    pub(super) fn replace_payload(&mut self, id: NodeId, payload: T) -> Option<T> {
        debug_assert!(self.is_live(id));
        self.slots[id].payload.replace(payload)
    }

    /// Moves the payload out of a node without touching the links.
    pub(super) fn take_payload(&mut self, id: NodeId) -> Option<T> {
        self.slots[id].payload.take()
    }

    /// Drops every element node and leaves only the end sentinel as root.
    /// The `Vec` keeps its allocation. Returns the number of nodes dropped.
    pub(super) fn clear(&mut self) -> usize {
        let released = self.live();
        self.reset();
        released
    }

    pub(super) fn minimum(&self, mut id: NodeId) -> NodeId {
        while self.left(id) != NIL {
            id = self.left(id);
        }
        id
    }

    pub(super) fn maximum(&self, mut id: NodeId) -> NodeId {
        while self.right(id) != NIL {
            id = self.right(id);
        }
        id
    }

    /// The left-most node; the end sentinel when the tree is empty.
    #[inline]
    pub(super) fn first(&self) -> NodeId {
        self.minimum(self.root)
    }

    /// In-order successor. `NIL` only when called on the end sentinel.
    pub(super) fn successor(&self, mut id: NodeId) -> NodeId {
        if self.right(id) != NIL {
            return self.minimum(self.right(id));
        }
        let mut up = self.parent(id);
        while up != NIL && id == self.right(up) {
            id = up;
            up = self.parent(up);
        }
        up
    }

    /// In-order predecessor. `NIL` only when called on the first node.
    pub(super) fn predecessor(&self, mut id: NodeId) -> NodeId {
        if self.left(id) != NIL {
            return self.maximum(self.left(id));
        }
        let mut up = self.parent(id);
        while up != NIL && id == self.left(up) {
            id = up;
            up = self.parent(up);
        }
        up
    }

    /// Points whichever link of `parent` held `old` at `new`; updates the root
    /// when `parent` is `NIL`.
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent == NIL {
            self.root = new;
        } else if self.left(parent) == old {
            self.slots[parent].left = new;
        } else {
            self.slots[parent].right = new;
        }
    }

    pub(super) fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        let inner = self.left(y);
        self.slots[x].right = inner;
        if inner != NIL {
            self.slots[inner].parent = x;
        }
        let up = self.parent(x);
        self.slots[y].parent = up;
        self.replace_child(up, x, y);
        self.slots[y].left = x;
        self.slots[x].parent = y;
    }

    pub(super) fn rotate_right(&mut self, x: NodeId) {
        let y = self.left(x);
        let inner = self.right(y);
        self.slots[x].left = inner;
        if inner != NIL {
            self.slots[inner].parent = x;
        }
        let up = self.parent(x);
        self.slots[y].parent = up;
        self.replace_child(up, x, y);
        self.slots[y].right = x;
        self.slots[x].parent = y;
    }

    /// Links a freshly allocated node under `parent` and rebalances.
    pub(super) fn attach(&mut self, z: NodeId, parent: NodeId, as_left: bool) {
        debug_assert_ne!(parent, NIL);
        self.slots[z].parent = parent;
        if as_left {
            debug_assert_eq!(self.left(parent), NIL);
            self.slots[parent].left = z;
        } else {
            debug_assert_eq!(self.right(parent), NIL);
            self.slots[parent].right = z;
        }
        self.insert_fixup(z);
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.is_red(self.parent(z)) {
            let p = self.parent(z);
            // p is Red, so it is not the root and g is a real node.
            let g = self.parent(p);
            if p == self.left(g) {
                let uncle = self.right(g);
                if self.is_red(uncle) {
                    self.paint(p, Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.paint(p, Color::Black);
                    self.paint(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.is_red(uncle) {
                    self.paint(p, Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.paint(p, Color::Black);
                    self.paint(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.paint(root, Color::Black);
    }

    /// Replaces the subtree rooted at `u` with the one rooted at `v`.
    fn transplant(&mut self, u: NodeId, v: NodeId) {
        let up = self.parent(u);
        self.replace_child(up, u, v);
        if v != NIL {
            self.slots[v].parent = up;
        }
    }

    /// Unlinks `z` from the tree and rebalances. The slot itself is left
    /// for [`Nodes::release`].
    ///
    /// A node with two children trades structural position with its in-order
    /// successor; payloads never move between slots, so every other position
    /// keeps denoting the same payload.
    pub(super) fn detach(&mut self, z: NodeId) {
        debug_assert!(self.is_live(z));
        let z_left = self.left(z);
        let z_right = self.right(z);
        let x;
        let x_parent;
        let spliced;
        if z_left == NIL {
            x = z_right;
            x_parent = self.parent(z);
            spliced = self.color(z);
            self.transplant(z, z_right);
        } else if z_right == NIL {
            x = z_left;
            x_parent = self.parent(z);
            spliced = self.color(z);
            self.transplant(z, z_left);
        } else {
            let y = self.minimum(z_right);
            spliced = self.color(y);
            x = self.right(y);
            if self.parent(y) == z {
                x_parent = y;
            } else {
                x_parent = self.parent(y);
                self.transplant(y, x);
                self.slots[y].right = z_right;
                self.slots[z_right].parent = y;
            }
            self.transplant(z, y);
            self.slots[y].left = z_left;
            self.slots[z_left].parent = y;
            let color = self.color(z);
            self.paint(y, color);
        }
        self.slots[z].parent = NIL;
        self.slots[z].left = NIL;
        self.slots[z].right = NIL;
        if spliced == Color::Black {
            self.delete_fixup(x, x_parent);
        }
    }

    // `x` may be the leaf sentinel, whose parent link is never written, so the
    // parent travels alongside it.
    fn delete_fixup(&mut self, mut x: NodeId, mut parent: NodeId) {
        while x != self.root && self.is_black(x) {
            if x == self.left(parent) {
                let mut w = self.right(parent);
                if self.is_red(w) {
                    self.paint(w, Color::Black);
                    self.paint(parent, Color::Red);
                    self.rotate_left(parent);
                    w = self.right(parent);
                }
                if self.is_black(self.left(w)) && self.is_black(self.right(w)) {
                    self.paint(w, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.is_black(self.right(w)) {
                        let near = self.left(w);
                        self.paint(near, Color::Black);
                        self.paint(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(parent);
                    }
                    let color = self.color(parent);
                    self.paint(w, color);
                    self.paint(parent, Color::Black);
                    let far = self.right(w);
                    self.paint(far, Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut w = self.left(parent);
                if self.is_red(w) {
                    self.paint(w, Color::Black);
                    self.paint(parent, Color::Red);
                    self.rotate_right(parent);
                    w = self.left(parent);
                }
                if self.is_black(self.left(w)) && self.is_black(self.right(w)) {
                    self.paint(w, Color::Red);
                    x = parent;
                    parent = self.parent(x);
                } else {
                    if self.is_black(self.left(w)) {
                        let near = self.right(w);
                        self.paint(near, Color::Black);
                        self.paint(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(parent);
                    }
                    let color = self.color(parent);
                    self.paint(w, color);
                    self.paint(parent, Color::Black);
                    let far = self.left(w);
                    self.paint(far, Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        if x != NIL {
            self.paint(x, Color::Black);
        }
    }

    /// Black nodes between the root and the leaf sentinel, excluding both.
    pub(super) fn black_height(&self) -> usize {
        let mut height = 0;
        let mut id = self.left(self.root);
        while id != NIL {
            if self.is_black(id) {
                height += 1;
            }
            id = self.left(id);
        }
        height
    }

    /// Number of nodes on the longest root-to-leaf path, end sentinel included.
    pub(super) fn height(&self) -> usize {
        self.height_below(self.root)
    }

    fn height_below(&self, id: NodeId) -> usize {
        if id == NIL {
            return 0;
        }
        1 + self
            .height_below(self.left(id))
            .max(self.height_below(self.right(id)))
    }

    /// Checks every structural invariant. Returns the black-height.
    pub(super) fn audit(&self) -> Result<usize, AuditError> {
        let nil = &self.slots[NIL];
        if nil.color != Color::Black
            || nil.parent != NIL
            || nil.left != NIL
            || nil.right != NIL
            || nil.payload.is_some()
        {
            return Err(AuditError::LeafSentinelTouched);
        }
        if self.is_red(self.root) {
            return Err(AuditError::RootNotBlack);
        }
        if self.parent(self.root) != NIL {
            return Err(AuditError::RootHasParent);
        }
        if self.maximum(self.root) != END {
            return Err(AuditError::EndNotRightmost);
        }
        let (height, counted) = self.audit_subtree(self.root)?;
        // The end sentinel is reachable but is not an element.
        if counted - 1 != self.live() {
            return Err(AuditError::LengthMismatch {
                counted: counted - 1,
                expected: self.live(),
            });
        }
        Ok(height)
    }

    // Returns (black-height below `id`, nodes in the subtree).
    fn audit_subtree(&self, id: NodeId) -> Result<(usize, usize), AuditError> {
        let mut heights = [0usize; 2];
        let mut count = 1;
        for (side, child) in [self.left(id), self.right(id)].into_iter().enumerate() {
            if child == NIL {
                continue;
            }
            if self.parent(child) != id {
                return Err(AuditError::BrokenParentLink { node: child });
            }
            if self.is_red(id) && self.is_red(child) {
                return Err(AuditError::RedRed { node: child });
            }
            let (below, nodes) = self.audit_subtree(child)?;
            heights[side] = below + usize::from(self.is_black(child));
            count += nodes;
        }
        if heights[0] != heights[1] {
            return Err(AuditError::BlackHeight {
                node: id,
                left: heights[0],
                right: heights[1],
            });
        }
        Ok((heights[0], count))
    }
}

#[cfg(test)]
impl<T: Clone> Nodes<T> {
    /// Collects (payload, color) per layer, the end sentinel showing as `None`.
    pub(super) fn bfs(&self, id: NodeId, layer: usize, result: &mut Vec<Vec<(Option<T>, Color)>>) {
        if id == NIL {
            return;
        }
        let entry = (self.payload(id).cloned(), self.color(id));
        if result.len() > layer {
            result[layer].push(entry);
        } else {
            result.push(vec![entry]);
        }
        self.bfs(self.left(id), layer + 1, result);
        self.bfs(self.right(id), layer + 1, result);
    }
}
