// src/model/queues.rs

use std::collections::VecDeque;

/// A fixed-length delay line between two tiers (orders going up, goods coming down).
///
/// Whatever is pushed at the end of week `t` pops out at the start of week `t + delay`.
#[derive(Debug, Clone)]
pub struct TransitLane {
    slots: VecDeque<u32>,
}

impl TransitLane {
    /// A lane pre-loaded with `delay` slots of `initial_flow`, so the chain starts in motion.
    pub fn new(delay: usize, initial_flow: u32) -> Self {
        Self {
            slots: std::iter::repeat(initial_flow).take(delay).collect(),
        }
    }

    /// Start of the week: the oldest slot arrives. A zero-delay lane has nothing queued.
    pub fn pop_arrival(&mut self) -> u32 {
        self.slots.pop_front().unwrap_or(0)
    }

    /// End of the week: new quantity enters the lane.
    pub fn push_departure(&mut self, quantity: u32) {
        self.slots.push_back(quantity);
    }

    /// Units currently travelling through the lane.
    pub fn in_transit(&self) -> u32 {
        self.slots.iter().sum()
    }
}
