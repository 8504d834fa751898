//! Execution of a per-request middleware chain.
//!
//! An [`ExecutionStack`] is the ordered list of middleware selected for one
//! request. It is never mutated while running. Progress through it is tracked
//! by [`Next`], a cursor holding an index into the stack: running a cursor
//! invokes the middleware at that index and hands it a cursor pointing one
//! further. A middleware that drops its cursor instead of running it ends the
//! chain, and nothing after it is invoked.

use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use std::fmt;

/// The ordered middleware selected for a single request.
#[derive(Default)]
pub struct ExecutionStack<'router> {
    middlewares: Vec<&'router dyn Middleware>,
}

impl<'router> ExecutionStack<'router> {
    pub fn new() -> Self {
        Self { middlewares: Vec::new() }
    }

    /// Appends `middlewares` in order, after everything already on the stack.
    pub fn extend<I>(&mut self, middlewares: I)
    where
        I: IntoIterator<Item = &'router dyn Middleware>,
    {
        self.middlewares.extend(middlewares);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'router dyn Middleware> {
        self.middlewares.get(index).copied()
    }

    /// Returns a cursor positioned at the first middleware.
    pub fn cursor(&self) -> Next<'_> {
        Next { stack: self, position: 0 }
    }

    /// Runs the chain from the first middleware.
    ///
    /// Returns once the chain has ended, either because the stack is exhausted or
    /// because a middleware did not continue it.
    pub async fn execute(&self, req: &mut Request, res: &mut Response) {
        self.cursor().run(req, res).await;
    }
}

impl fmt::Debug for ExecutionStack<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionStack").field("len", &self.len()).finish()
    }
}

/// The continuation handed to every middleware.
///
/// Consumed by [`Next::run`], so a middleware can continue the chain at most once.
pub struct Next<'a> {
    stack: &'a ExecutionStack<'a>,
    position: usize,
}

impl<'a> Next<'a> {
    /// Index of the middleware this cursor will invoke.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of middleware that have not run yet, including the one at the cursor.
    pub fn remaining(&self) -> usize {
        self.stack.len().saturating_sub(self.position)
    }

    /// Advances the chain by invoking the middleware at the cursor.
    ///
    /// When the stack is exhausted this returns immediately without touching the
    /// response.
    pub async fn run(self, req: &mut Request, res: &mut Response) {
        let Some(middleware) = self.stack.get(self.position) else {
            return;
        };

        let next = Next { stack: self.stack, position: self.position + 1 };
        middleware.handle(req, res, next).await;
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("position", &self.position).field("len", &self.stack.len()).finish()
    }
}
