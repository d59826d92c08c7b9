use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Deterministic deferred-action queue.
///
/// Entries fire in `(deadline, insertion order)` order: when two deadlines
/// coincide, the earlier-scheduled action fires first. Every entry is tagged
/// with the queue generation current at scheduling time; `cancel_pending`
/// bumps the generation so superseded entries are dropped on pop instead of
/// firing late.
#[derive(Debug)]
pub struct TimerQueue<A> {
    heap: BinaryHeap<Reverse<Entry<A>>>,
    generation: u64,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry<A> {
    at: u64,
    seq: u64,
    generation: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.at, self.seq).cmp(&(other.at, other.seq))
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            generation: 0,
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, at: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            at,
            seq,
            generation: self.generation,
            action,
        }));
    }

    /// Invalidate every currently scheduled entry. Entries scheduled after
    /// this call belong to the new generation and fire normally.
    pub fn cancel_pending(&mut self) {
        self.generation += 1;
    }

    /// Pop the next live entry with `deadline <= now`, skipping cancelled
    /// generations.
    pub fn pop_due(&mut self, now: u64) -> Option<A> {
        loop {
            let (at, generation) = {
                let Reverse(head) = self.heap.peek()?;
                (head.at, head.generation)
            };
            if generation != self.generation {
                self.heap.pop();
                continue;
            }
            if at > now {
                return None;
            }
            return self.heap.pop().map(|Reverse(e)| e.action);
        }
    }

    /// Earliest live deadline, if any. Lazily discards cancelled entries.
    pub fn next_deadline(&mut self) -> Option<u64> {
        loop {
            let (at, generation) = {
                let Reverse(head) = self.heap.peek()?;
                (head.at, head.generation)
            };
            if generation != self.generation {
                self.heap.pop();
                continue;
            }
            return Some(at);
        }
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_then_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(20, "b");
        q.schedule(10, "a");
        q.schedule(20, "c");

        let mut out = Vec::new();
        while let Some(a) = q.pop_due(100) {
            out.push(a);
        }
        assert_eq!(out, vec!["a", "b", "c"]);
    }

    #[test]
    fn pop_due_respects_now() {
        let mut q = TimerQueue::new();
        q.schedule(50, "late");
        assert!(q.pop_due(49).is_none());
        assert_eq!(q.pop_due(50), Some("late"));
    }

    #[test]
    fn cancel_pending_drops_stale_entries() {
        let mut q = TimerQueue::new();
        q.schedule(10, "stale");
        q.cancel_pending();
        q.schedule(10, "live");

        assert_eq!(q.pop_due(10), Some("live"));
        assert!(q.pop_due(u64::MAX).is_none());
    }

    #[test]
    fn next_deadline_skips_cancelled() {
        let mut q = TimerQueue::new();
        q.schedule(5, "stale");
        q.cancel_pending();
        assert_eq!(q.next_deadline(), None);

        q.schedule(7, "live");
        assert_eq!(q.next_deadline(), Some(7));
    }
}
