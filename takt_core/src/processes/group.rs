//! Parallel combinator: tick a set of children under an All/Any rule.

use crate::process::{Process, Slot, Time};

/// Termination rule for a [`Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// Complete when every child is complete.
    All,
    /// Complete when at least one child is complete.
    Any,
}

/// A set of child processes driven together every tick.
///
/// Children are ticked in registration order and never reordered or removed
/// while running. A child that completes is skipped on later ticks but
/// retained: when the group itself completes, every child — including the
/// losing branches of an `Any` race — receives its terminal hook exactly
/// once, in registration order, before the group's own hook finishes. That
/// is what makes "stop the motor" cleanup reliable on both sides of a race.
///
/// A group with no children is vacuously complete.
pub struct Group {
    children: Vec<Slot>,
    rule: CompletionRule,
}

impl Group {
    /// Empty group with the given termination rule.
    pub fn new(rule: CompletionRule) -> Self {
        Self {
            children: Vec::new(),
            rule,
        }
    }

    /// Empty all-must-complete ("AND") group.
    pub fn all() -> Self {
        Self::new(CompletionRule::All)
    }

    /// Empty any-completes ("OR") group.
    pub fn any() -> Self {
        Self::new(CompletionRule::Any)
    }

    /// Termination rule.
    #[inline]
    pub fn rule(&self) -> CompletionRule {
        self.rule
    }

    /// Number of registered children.
    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Append a child, preserving registration order.
    pub fn push(&mut self, child: impl Process + 'static) {
        self.children.push(Slot::new(child));
    }

    /// Builder form of [`Group::push`].
    pub fn with(mut self, child: impl Process + 'static) -> Self {
        self.push(child);
        self
    }

    /// Combine under the AND rule, flattening when `self` is already an
    /// AND group: `a.and(b).and(c)` is one flat three-child group.
    pub fn and(self, other: impl Process + 'static) -> Group {
        self.absorb(CompletionRule::All, other)
    }

    /// Combine under the OR rule, flattening when `self` is already an
    /// OR group: `a.or(b).or(c)` is one flat three-child group.
    pub fn or(self, other: impl Process + 'static) -> Group {
        self.absorb(CompletionRule::Any, other)
    }

    fn absorb(self, rule: CompletionRule, other: impl Process + 'static) -> Group {
        if self.rule == rule {
            self.with(other)
        } else {
            Group::new(rule).with(self).with(other)
        }
    }
}

impl Process for Group {
    fn update(&mut self, now: Time) {
        for child in &mut self.children {
            if child.completed() {
                continue;
            }
            child.ensure_started(now);
            if child.poll_completed(now) {
                continue;
            }
            child.update(now);
            child.poll_completed(now);
        }
    }

    fn on_completed(&mut self, now: Time) {
        // Terminal fan-out in registration order, winners and losers alike.
        for child in &mut self.children {
            child.finish(now);
        }
    }

    fn is_completed(&mut self, now: Time) -> bool {
        match self.rule {
            CompletionRule::All => self
                .children
                .iter_mut()
                .all(|child| child.poll_completed(now)),
            CompletionRule::Any => {
                self.children.is_empty()
                    || self
                        .children
                        .iter_mut()
                        .any(|child| child.poll_completed(now))
            }
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
