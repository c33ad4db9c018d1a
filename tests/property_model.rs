//! Property tests checking `CircularQueue` against a `VecDeque` model.
//!
//! The model is a `VecDeque` plus an explicit capacity, updated with the
//! queue's documented rules: pushes on a full queue evict from the other end,
//! push and pop keep the capacity, range edits leave `capacity == len`.

mod common;

use std::collections::VecDeque;

use circularqueue::CircularQueue;
use common::{init_test_logging, test_proptest_config};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Push { front: bool, value: i32 },
    Pop { front: bool },
    PushIter { front: bool, values: Vec<i32> },
    Reserve(usize),
    Insert(usize, i32),
    Remove(usize),
    Replace(usize, usize, Vec<i32>),
    RemoveAll(bool),
    Snapshot,
}

#[derive(Clone, Debug)]
struct Model {
    items: VecDeque<i32>,
    capacity: usize,
}

impl Model {
    fn new(capacity: usize) -> Self {
        Model {
            items: VecDeque::new(),
            capacity,
        }
    }

    fn push(&mut self, front: bool, value: i32) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            if front {
                self.items.pop_back();
            } else {
                self.items.pop_front();
            }
        }
        if front {
            self.items.push_front(value);
        } else {
            self.items.push_back(value);
        }
    }

    fn pack(&mut self) {
        self.capacity = self.items.len();
    }
}

fn arb_values(max: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-100i32..100, 0..max)
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<bool>(), -100i32..100).prop_map(|(front, value)| Op::Push { front, value }),
        any::<bool>().prop_map(|front| Op::Pop { front }),
        (any::<bool>(), arb_values(12)).prop_map(|(front, values)| Op::PushIter { front, values }),
        (0usize..8).prop_map(Op::Reserve),
        (any::<usize>(), -100i32..100).prop_map(|(at, value)| Op::Insert(at, value)),
        any::<usize>().prop_map(Op::Remove),
        (any::<usize>(), any::<usize>(), arb_values(4)).prop_map(|(a, b, values)| Op::Replace(a, b, values)),
        any::<bool>().prop_map(Op::RemoveAll),
        Just(Op::Snapshot),
    ]
}

fn apply(queue: &mut CircularQueue<i32>, model: &mut Model, op: Op) {
    match op {
        Op::Push { front, value } => {
            if front {
                queue.push_front(value);
            } else {
                queue.push_back(value);
            }
            model.push(front, value);
        }
        Op::Pop { front } => {
            let (got, expected) = if front {
                (queue.pop_front(), model.items.pop_front())
            } else {
                (queue.pop_back(), model.items.pop_back())
            };
            assert_eq!(got, expected);
        }
        Op::PushIter { front, values } => {
            if front {
                queue.push_front_iter(values.clone());
            } else {
                queue.push_back_iter(values.clone());
            }
            for value in values {
                model.push(front, value);
            }
        }
        Op::Reserve(additional) => {
            queue.reserve_capacity(additional);
            let residual = model.capacity - model.items.len();
            if additional > residual {
                model.capacity += additional - residual;
            }
        }
        Op::Insert(at, value) => {
            let at = at % (model.items.len() + 1);
            queue.insert(at, value);
            model.items.insert(at, value);
            model.pack();
        }
        Op::Remove(at) => {
            if model.items.is_empty() {
                return;
            }
            let at = at % model.items.len();
            assert_eq!(Some(queue.remove(at)), model.items.remove(at));
            model.pack();
        }
        Op::Replace(a, b, values) => {
            let len = model.items.len();
            let start = a % (len + 1);
            let end = start + b % (len - start + 1);
            queue.replace_subrange(start..end, values.clone());
            if start == end && values.is_empty() {
                return;
            }
            let tail: Vec<i32> = model.items.drain(start..).skip(end - start).collect();
            model.items.extend(values);
            model.items.extend(tail);
            model.pack();
        }
        Op::RemoveAll(keep) => {
            queue.remove_all(keep);
            model.items.clear();
            if !keep {
                model.capacity = 0;
            }
        }
        Op::Snapshot => {}
    }
}

proptest! {
    #![proptest_config(test_proptest_config(256))]

    /// Content, length and capacity follow the model after every operation.
    #[test]
    fn queue_follows_the_model(capacity in 0usize..6, ops in prop::collection::vec(arb_op(), 0..40)) {
        init_test_logging();
        let mut queue = CircularQueue::with_capacity(capacity);
        let mut model = Model::new(capacity);
        let mut snapshots = Vec::new();

        for op in ops {
            if let Op::Snapshot = op {
                snapshots.push((queue.clone(), model.clone()));
            }
            apply(&mut queue, &mut model, op);

            prop_assert_eq!(queue.len(), model.items.len());
            prop_assert_eq!(queue.capacity(), model.capacity);
            prop_assert_eq!(queue.residual_capacity(), model.capacity - model.items.len());
            prop_assert_eq!(queue.is_full(), model.items.len() == model.capacity);
            prop_assert!(queue.iter().eq(model.items.iter()));
            prop_assert!(queue.iter().rev().eq(model.items.iter().rev()));
        }

        // later mutations never leak into earlier copies
        for (copy, model) in snapshots {
            prop_assert_eq!(copy.capacity(), model.capacity);
            prop_assert!(copy.iter().eq(model.items.iter()));
        }
    }

    /// The two slices cover the content in order, and relinearizing does not
    /// change what is observed.
    #[test]
    fn slices_and_contiguous_view_agree(
        capacity in 1usize..8,
        skip in 0usize..8,
        values in arb_values(16),
    ) {
        init_test_logging();
        let mut queue = CircularQueue::with_capacity(capacity);
        queue.push_back_iter(0..skip as i32);
        for _ in 0..skip.min(capacity) {
            queue.pop_front();
        }
        queue.push_back_iter(values.clone());

        let expected: Vec<i32> = values.iter().rev().take(capacity).rev().cloned().collect();
        let (a, b) = queue.as_slices();
        let joined: Vec<i32> = a.iter().chain(b.iter()).cloned().collect();
        prop_assert_eq!(&joined, &expected);
        prop_assert_eq!(queue.as_contiguous().to_vec(), expected.clone());
        prop_assert_eq!(queue.as_slices().1.len(), 0);
        prop_assert_eq!(queue.capacity(), capacity);
    }

    /// Bulk pushes behave like pushing one element at a time.
    #[test]
    fn bulk_pushes_match_single_pushes(
        initial in arb_values(6),
        extra in 0usize..6,
        front in any::<bool>(),
        values in arb_values(16),
    ) {
        init_test_logging();
        let mut bulk: CircularQueue<i32> = initial.into_iter().collect();
        bulk.reserve_capacity(extra);
        let mut single = bulk.clone();

        if front {
            bulk.push_front_iter(values.clone());
            for value in values {
                single.push_front(value);
            }
        } else {
            bulk.push_back_iter(values.clone());
            for value in values {
                single.push_back(value);
            }
        }
        prop_assert_eq!(&bulk, &single);
        prop_assert_eq!(bulk.capacity(), single.capacity());
    }
}
