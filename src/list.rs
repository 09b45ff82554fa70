//! An ordered collection addressable both by position and by key.
//!
//! Elements live in an arena of nodes. Two sentinel slots (head and tail) bound
//! the chain, and the links between nodes are plain slot indices: there are no
//! reference cycles, and walking the list never recurses.
//!
//! Positional lookups start from whichever sentinel is nearer to the target, so
//! reaching any index costs at most `count / 2` steps. Once a node is located,
//! inserting or removing it only rewires its two neighbours.

use thiserror::Error;

const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ListError {
    /// The index doesn't address an element of the list.
    #[error("index {index} is out of bounds for a list of {count} elements")]
    OutOfBounds { index: usize, count: usize },
}

/// Elements that can be looked up by a string key, e.g. an account by its id
/// or a customer by their username.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for String {
    fn key(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone)]
struct Node<T> {
    // Sentinels never carry a payload.
    payload: Option<T>,
    next: usize,
    prev: usize,
}

#[derive(Debug, Clone)]
pub struct IndexedList<T> {
    nodes: Vec<Node<T>>,
    // Slots released by `remove`, reused by the next insertion.
    free: Vec<usize>,
    count: usize,
}

impl<T> Default for IndexedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IndexedList<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![
                Node {
                    payload: None,
                    next: TAIL,
                    prev: HEAD,
                },
                Node {
                    payload: None,
                    next: TAIL,
                    prev: HEAD,
                },
            ],
            free: Vec::new(),
            count: 0,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether `index` addresses an element. Same bounds as `get`.
    pub fn exists(&self, index: usize) -> bool {
        index < self.count
    }

    pub fn get(&self, index: usize) -> Result<&T, ListError> {
        self.check_bounds(index)?;
        let slot = self.locate(index);
        self.nodes[slot]
            .payload
            .as_ref()
            .ok_or_else(|| self.out_of_bounds(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ListError> {
        self.check_bounds(index)?;
        let slot = self.locate(index);
        let err = self.out_of_bounds(index);
        self.nodes[slot].payload.as_mut().ok_or(err)
    }

    /// Insert `element` before the element currently at `index`.
    /// Any index at or past the end appends.
    ///
    /// Returns the index the element ended up at.
    pub fn put(&mut self, element: T, index: usize) -> usize {
        let index = index.min(self.count);
        let next = if index == self.count {
            TAIL
        } else {
            self.locate(index)
        };
        let prev = self.nodes[next].prev;

        let slot = self.allocate(Node {
            payload: Some(element),
            next,
            prev,
        });
        self.nodes[prev].next = slot;
        self.nodes[next].prev = slot;
        self.count += 1;

        index
    }

    /// Append `element`, returning its index.
    pub fn push(&mut self, element: T) -> usize {
        self.put(element, self.count)
    }

    /// Unlink the element at `index` and hand it back to the caller.
    pub fn remove(&mut self, index: usize) -> Result<T, ListError> {
        self.check_bounds(index)?;
        let slot = self.locate(index);
        let err = self.out_of_bounds(index);

        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.count -= 1;
        self.free.push(slot);

        self.nodes[slot].payload.take().ok_or(err)
    }

    /// Replace the element at `index` in place, returning the previous one.
    pub fn update(&mut self, index: usize, element: T) -> Result<T, ListError> {
        self.check_bounds(index)?;
        let slot = self.locate(index);
        let err = self.out_of_bounds(index);
        self.nodes[slot].payload.replace(element).ok_or(err)
    }

    /// Iterate from the front to the back. The iterator is double-ended, so
    /// `.rev()` walks back to front.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: &self.nodes,
            front: self.nodes[HEAD].next,
            back: self.nodes[TAIL].prev,
            remaining: self.count,
        }
    }

    /// Visit every element mutably, front to back.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        let mut slot = self.nodes[HEAD].next;
        while slot != TAIL {
            if let Some(payload) = self.nodes[slot].payload.as_mut() {
                f(payload);
            }
            slot = self.nodes[slot].next;
        }
    }

    fn check_bounds(&self, index: usize) -> Result<(), ListError> {
        if index >= self.count {
            return Err(self.out_of_bounds(index));
        }
        Ok(())
    }

    fn out_of_bounds(&self, index: usize) -> ListError {
        ListError::OutOfBounds {
            index,
            count: self.count,
        }
    }

    // Find the slot of the element at `index`, which must be in bounds.
    fn locate(&self, index: usize) -> usize {
        if index > self.count / 2 {
            let mut slot = self.nodes[TAIL].prev;
            for _ in 0..(self.count - 1 - index) {
                slot = self.nodes[slot].prev;
            }
            slot
        } else {
            let mut slot = self.nodes[HEAD].next;
            for _ in 0..index {
                slot = self.nodes[slot].next;
            }
            slot
        }
    }

    fn allocate(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = node;
                slot
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }
}

impl<T: Keyed> IndexedList<T> {
    /// Index of the first element whose key matches, scanning from the front.
    pub fn find(&self, key: &str) -> Option<usize> {
        self.iter().position(|element| element.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    pub fn get_by_key(&self, key: &str) -> Option<&T> {
        let index = self.find(key)?;
        self.get(index).ok()
    }

    pub fn get_by_key_mut(&mut self, key: &str) -> Option<&mut T> {
        let index = self.find(key)?;
        self.get_mut(index).ok()
    }

    pub fn remove_by_key(&mut self, key: &str) -> Option<T> {
        let index = self.find(key)?;
        self.remove(index).ok()
    }
}

pub struct Iter<'a, T> {
    nodes: &'a [Node<T>],
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.front;
        self.front = self.nodes[slot].next;
        self.remaining -= 1;
        self.nodes[slot].payload.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.back;
        self.back = self.nodes[slot].prev;
        self.remaining -= 1;
        self.nodes[slot].payload.as_ref()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a IndexedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Extend<T> for IndexedList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push(element);
        }
    }
}

impl<T> FromIterator<T> for IndexedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}
