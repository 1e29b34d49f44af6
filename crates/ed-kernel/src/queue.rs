//! `FifoQueue<T>` — a named first-in, first-out waiting line.

use std::collections::VecDeque;

use crate::{KernelError, KernelResult};

/// Ordered waiting line with set-like membership.
///
/// - `enter` appends; entering an item already present is an error.
/// - `leave` removes wherever the item sits and is idempotent, because two
///   processes may race to remove the same item (an ambulance taking a call
///   while its review completes).
/// - `pop_first` on an empty queue is a precondition violation.
///
/// Queues hold a few hundred entries at most, so membership is a linear
/// scan.
#[derive(Clone, Debug)]
pub struct FifoQueue<T> {
    name:  &'static str,
    items: VecDeque<T>,
}

impl<T: Copy + PartialEq> FifoQueue<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, items: VecDeque::new() }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append `item` at the tail.
    pub fn enter(&mut self, item: T) -> KernelResult<()> {
        if self.contains(item) {
            return Err(KernelError::DuplicateEntry { queue: self.name });
        }
        self.items.push_back(item);
        Ok(())
    }

    /// Remove `item` if present.  Returns whether it was there.
    pub fn leave(&mut self, item: T) -> bool {
        match self.items.iter().position(|&x| x == item) {
            Some(pos) => {
                self.items.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove and return the head.
    pub fn pop_first(&mut self) -> KernelResult<T> {
        self.items
            .pop_front()
            .ok_or(KernelError::EmptyQueue { queue: self.name })
    }

    pub fn peek_first(&self) -> Option<T> {
        self.items.front().copied()
    }

    pub fn contains(&self, item: T) -> bool {
        self.items.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.items.iter().copied()
    }
}
