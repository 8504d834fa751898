//! The middleware abstraction.
//!
//! A [`Middleware`] is one link of the chain. It receives the request, the
//! response and a [`Next`] cursor. Calling [`Next::run`] continues the chain,
//! returning without calling it ends the chain.

use crate::chain::Next;
use crate::request::Request;
use crate::response::Response;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>);
}

#[async_trait]
impl<M: Middleware + ?Sized> Middleware for Box<M> {
    async fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        (**self).handle(req, res, next).await;
    }
}

#[async_trait]
impl<M: Middleware + ?Sized> Middleware for std::sync::Arc<M> {
    async fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        (**self).handle(req, res, next).await;
    }
}

/// a closure holder which represents any `Fn(&mut Request, &mut Response, Next) -> BoxFuture`
pub struct FnMiddleware<F> {
    f: F,
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMiddleware").finish_non_exhaustive()
    }
}

/// Wraps a closure as a [`Middleware`].
///
/// # Example
/// ```
/// use micro_chain::middleware_fn;
///
/// let log = middleware_fn(|req, res, next| {
///     Box::pin(async move {
///         tracing::info!(url = req.url(), "incoming");
///         next.run(req, res).await;
///     })
/// });
/// # let _ = log;
/// ```
pub fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, ()> + Send + Sync,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: for<'a> Fn(&'a mut Request, &'a mut Response, Next<'a>) -> BoxFuture<'a, ()> + Send + Sync,
{
    async fn handle(&self, req: &mut Request, res: &mut Response, next: Next<'_>) {
        (self.f)(req, res, next).await;
    }
}

#[cfg(test)]
mod tests {
    use super::{middleware_fn, Middleware};

    fn assert_is_middleware<M: Middleware>(_middleware: &M) {
        // no op
    }

    #[test]
    fn closure_is_middleware() {
        let middleware = middleware_fn(|req, res, next| Box::pin(async move { next.run(req, res).await }));
        assert_is_middleware(&middleware);
    }

    #[test]
    fn terminating_closure_is_middleware() {
        let middleware = middleware_fn(|_req, _res, _next| Box::pin(async {}));
        assert_is_middleware(&middleware);
        assert_is_middleware(&Box::new(middleware));
    }
}
