//! Rule invocation contexts.
//!
//! A [`RuleContext`] is one frame of the call stack active when a lookahead
//! query is issued. Frames are immutable and shared through [`Arc`], so a
//! parse can hand the same chain to several queries, or threads, without
//! copying it.
//!
//! ```
//! use atnkit_core::RuleContext;
//!
//! let root = RuleContext::root();
//! let outer = root.push(12);
//! let inner = outer.push(40);
//!
//! assert_eq!(inner.invoking_state(), Some(40));
//! assert_eq!(inner.depth(), 3);
//! assert!(inner.frames().last().is_some_and(|f| f.is_root()));
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// One frame of a rule invocation stack.
///
/// Chains may be arbitrarily deep. Dropping, comparing, hashing and
/// formatting a chain walk it iteratively.
#[derive(Clone)]
pub struct RuleContext {
    parent: Option<Arc<RuleContext>>,
    invoking_state: Option<usize>,
}

impl RuleContext {
    /// The outermost frame: no caller, no invoking state.
    pub fn root() -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            invoking_state: None,
        })
    }

    /// Creates the frame for a rule called from `invoking_state`, a state in
    /// the rule of `self` whose first transition is the rule transition.
    pub fn push(self: &Arc<Self>, invoking_state: usize) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(Arc::clone(self)),
            invoking_state: Some(invoking_state),
        })
    }

    #[inline]
    pub fn parent(&self) -> Option<&RuleContext> {
        self.parent.as_deref()
    }

    /// State number, in the caller's rule, from which this rule was invoked.
    /// `None` for the root frame.
    #[inline]
    pub fn invoking_state(&self) -> Option<usize> {
        self.invoking_state
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.invoking_state.is_none()
    }

    /// Number of frames from this one up to and including the root.
    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    /// Iterates from this frame towards the root.
    pub fn frames(&self) -> Frames<'_> {
        Frames { next: Some(self) }
    }
}

impl Drop for RuleContext {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(parent) = next {
            match Arc::try_unwrap(parent) {
                Ok(mut frame) => next = frame.parent.take(),
                // still shared: the other owner drops the rest
                Err(_) => break,
            }
        }
    }
}

/// Chains compare equal when they have the same invoking states, frame by
/// frame.
impl PartialEq for RuleContext {
    fn eq(&self, other: &Self) -> bool {
        let mut ours = self.frames();
        let mut theirs = other.frames();
        loop {
            match (ours.next(), theirs.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if core::ptr::eq(a, b) => return true,
                (Some(a), Some(b)) if a.invoking_state == b.invoking_state => {}
                _ => return false,
            }
        }
    }
}

impl Eq for RuleContext {}

impl Hash for RuleContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for frame in self.frames() {
            frame.invoking_state.hash(state);
        }
    }
}

impl fmt::Debug for RuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames().map(RuleContext::invoking_state))
            .finish()
    }
}

/// Iterator over a context chain, innermost frame first.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    next: Option<&'a RuleContext>,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a RuleContext;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}
