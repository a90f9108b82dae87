//! End-to-end scheduling properties, driven through the public surface
//! with scripted clocks: sequence tick accounting, group completion rules,
//! OR-race cleanup, builder flattening, and wire liveness.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use takt_core::prelude::*;

/// Leaf completing on its `n`-th update, journaling lifecycle events.
fn step_leaf(journal: &Rc<RefCell<Vec<String>>>, name: &'static str, n: u32) -> LambdaProcess {
    let upd = journal.clone();
    let end = journal.clone();
    let mut left = n;
    LambdaProcess::with_completion(
        move |_| {
            upd.borrow_mut().push(format!("{name}:u"));
            left -= 1;
            left > 0
        },
        move |_| end.borrow_mut().push(format!("{name}:c")),
    )
}

fn counting_clock() -> impl FnMut() -> Time {
    let mut t = -1.0;
    move || {
        t += 1.0;
        t
    }
}

#[test]
fn sequence_completes_at_sum_of_child_ticks() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let sequence = Sequence::new()
        .then(step_leaf(&journal, "a", 2))
        .then(step_leaf(&journal, "b", 1))
        .then(step_leaf(&journal, "c", 3));

    let mut runner = Runner::with_clock(counting_clock());
    let ticks = runner.run(sequence);
    assert_eq!(ticks, 6);

    // Element i's terminal hook fires strictly before element i+1's first
    // update.
    assert_eq!(
        *journal.borrow(),
        vec!["a:u", "a:u", "a:c", "b:u", "b:c", "c:u", "c:u", "c:u", "c:c"]
    );
}

#[test]
fn group_and_completes_at_slowest_child() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let group = step_leaf(&journal, "a", 1)
        .and(step_leaf(&journal, "b", 4))
        .and(step_leaf(&journal, "c", 2));

    let mut runner = Runner::with_clock(counting_clock());
    let ticks = runner.run(group);
    assert_eq!(ticks, 4);

    // Every terminal hook fires exactly once, after group completion, in
    // registration order.
    let tail: Vec<String> = journal.borrow().iter().rev().take(3).rev().cloned().collect();
    assert_eq!(tail, vec!["a:c", "b:c", "c:c"]);
    for name in ["a", "b", "c"] {
        let hooks = journal
            .borrow()
            .iter()
            .filter(|e| **e == format!("{name}:c"))
            .count();
        assert_eq!(hooks, 1, "terminal hook count for {name}");
    }
}

#[test]
fn group_or_completes_at_fastest_child_with_loser_cleanup() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let group = step_leaf(&journal, "slow", 10).or(step_leaf(&journal, "fast", 3));

    let mut runner = Runner::with_clock(counting_clock());
    let ticks = runner.run(group);
    assert_eq!(ticks, 3);

    // The losing child was updated up to and including the completing tick,
    // then received exactly one terminal hook and no further updates.
    let slow_updates = journal.borrow().iter().filter(|e| **e == "slow:u").count();
    let slow_hooks = journal.borrow().iter().filter(|e| **e == "slow:c").count();
    assert_eq!(slow_updates, 3);
    assert_eq!(slow_hooks, 1);
}

#[test]
fn or_chain_flattens_and_fires_on_middle_child() {
    // a | b | c built left-to-right must be one flat OR of three: completing
    // only b completes the whole on the same tick.
    let journal = Rc::new(RefCell::new(Vec::new()));
    let group = LambdaProcess::new(|_| true)
        .or(step_leaf(&journal, "b", 1))
        .or(LambdaProcess::new(|_| true));
    assert_eq!(group.len(), 3);

    let mut runner = Runner::with_clock(counting_clock());
    assert_eq!(runner.run(group), 1);
}

#[test]
fn time_window_fires_through_the_completing_tick() {
    let fired = Rc::new(RefCell::new(Vec::new()));
    let f = fired.clone();

    let clock = scripted_clock(vec![0.0, 0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0]);
    let mut runner = Runner::with_clock(clock);
    runner.run(TimeProcess::with_delay(1.0, 2.0, move |now| {
        f.borrow_mut().push(now)
    }));

    assert_eq!(*fired.borrow(), vec![1.0, 1.5, 2.0, 2.5, 3.0]);
}

#[test]
fn empty_combinators_complete_without_updates() {
    let mut runner = Runner::with_clock(counting_clock());
    assert_eq!(runner.run(Group::all()), 0);
    assert_eq!(runner.run(Group::any()), 0);
    assert_eq!(runner.run(Sequence::new()), 0);
}

#[test]
fn nested_trees_propagate_lifecycle() {
    // (a AND b) THEN (c OR d): the inner group's fan-out runs when the
    // sequence pops it, before c/d ever start.
    let journal = Rc::new(RefCell::new(Vec::new()));
    let tree = step_leaf(&journal, "a", 1)
        .and(step_leaf(&journal, "b", 2))
        .then(step_leaf(&journal, "c", 2).or(step_leaf(&journal, "d", 1)));

    let mut runner = Runner::with_clock(counting_clock());
    let ticks = runner.run(tree);
    assert_eq!(ticks, 3);

    let events = journal.borrow();
    let pos = |e: &str| events.iter().position(|x| x == e).unwrap();
    assert!(pos("a:c") < pos("c:u"));
    assert!(pos("b:c") < pos("c:u"));
    assert!(pos("d:c") > pos("d:u"));
}

#[test]
fn wire_sum_reflects_provider_changes_immediately() {
    let left = Rc::new(Cell::new(1.0));
    let right = Rc::new(Cell::new(2.0));
    let (l, r) = (left.clone(), right.clone());
    let sum = FloatWire::new(move || l.get()) + FloatWire::new(move || r.get());

    assert_eq!(sum.value(), 3.0);
    left.set(10.0);
    assert_eq!(sum.value(), 12.0);
    right.set(-2.0);
    assert_eq!(sum.value(), 8.0);
}

#[test]
fn shared_leaf_observable_after_tree_completes() {
    let result = Rc::new(Cell::new(0));
    let r = result.clone();
    let mut sample = 0;
    let leaf = share(LambdaProcess::with_completion(
        move |_| {
            sample += 1;
            sample < 3
        },
        move |now| r.set(now as i64),
    ));

    let tree = sequence_of([leaf.clone() as SharedProcess])
        .then(TimeProcess::wait(0.0));
    let mut runner = Runner::with_clock(counting_clock());
    runner.run(tree);

    // The handle retained by the application saw the terminal call, which
    // carried the completing tick's timestamp.
    assert!(leaf.borrow_mut().is_completed(99.0));
    assert_eq!(result.get(), 3);
}

#[test]
fn wires_feed_processes_across_the_tree() {
    // A wire carries a live sensor value into one process and a command out
    // of another, with no coupling between them.
    let sensor = Rc::new(Cell::new(0.0));
    let command = Rc::new(Cell::new(0.0));

    let s = sensor.clone();
    let reading = FloatWire::new(move || s.get());
    let error = FloatWire::constant(50.0) - reading;

    let c = command.clone();
    let s2 = sensor.clone();
    let follow = LambdaProcess::new(move |_| {
        c.set(error.value() * 0.1);
        s2.set(s2.get() + 10.0); // the environment drifts toward target
        error.value().abs() > 1e-9
    });

    let mut runner = Runner::with_clock(counting_clock());
    let ticks = runner.run(follow);
    assert_eq!(ticks, 5);
    assert_eq!(command.get(), 1.0); // last correction before zero error
}
