//! Registration of middleware and per-request dispatch.
//!
//! Middleware are registered on a [`RouterBuilder`] into one of three buckets:
//! every verb, GET only, or POST only. [`RouterBuilder::build`] freezes the
//! table into a [`Router`], which is only ever read afterwards and can be shared
//! between concurrently served requests.
//!
//! For every request the router selects the candidate entries (all-verb entries
//! first, then the entries of the request's verb, each in registration order),
//! keeps the ones whose path prefix the request url starts with, and runs their
//! middleware one after another as an [`ExecutionStack`].
//!
//! # Example
//! ```
//! use micro_chain::router::{PathPrefix, Registration, Router};
//! use micro_chain::middleware_fn;
//!
//! let router = Router::builder()
//!     .register_all(Registration::global().with(middleware_fn(|req, res, next| {
//!         Box::pin(async move { next.run(req, res).await })
//!     })))
//!     .register_get(Registration::scoped(PathPrefix::new("/user").unwrap()).with(middleware_fn(|_req, res, _next| {
//!         Box::pin(async move {
//!             let _ = res.end("user");
//!         })
//!     })))
//!     .build();
//!
//! let stack = router.execution_stack(&http::Method::GET, "/user/1");
//! assert_eq!(stack.len(), 2);
//! ```

mod path;
mod table;

pub use path::InvalidPathPrefix;
pub use path::PathPrefix;
pub use table::Bucket;
pub use table::MiddlewareEntry;
pub use table::RouterTable;

use crate::chain::ExecutionStack;
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use http::Method;
use std::fmt;
use tracing::{debug, warn};

/// Requests for exactly this url never run any middleware.
pub const FAVICON_URL: &str = "/favicon.ico";

/// The arguments of one registration call.
///
/// A registration is either scoped to an explicit path prefix or global. Global
/// registrations use the prefix `/` and therefore match every url.
pub enum Registration {
    Scoped { path: PathPrefix, middlewares: Vec<Box<dyn Middleware>> },
    Global { middlewares: Vec<Box<dyn Middleware>> },
}

impl Registration {
    /// Starts a registration scoped to `path`, with no middleware yet.
    pub fn scoped(path: PathPrefix) -> Self {
        Registration::Scoped { path, middlewares: Vec::new() }
    }

    /// Starts a registration without a path, with no middleware yet.
    pub fn global() -> Self {
        Registration::Global { middlewares: Vec::new() }
    }

    /// Appends a middleware to this registration.
    pub fn with<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares_mut().push(Box::new(middleware));
        self
    }

    /// The prefix this registration resolves to.
    pub fn path(&self) -> PathPrefix {
        match self {
            Registration::Scoped { path, .. } => path.clone(),
            Registration::Global { .. } => PathPrefix::root(),
        }
    }

    fn middlewares_mut(&mut self) -> &mut Vec<Box<dyn Middleware>> {
        match self {
            Registration::Scoped { middlewares, .. } | Registration::Global { middlewares } => middlewares,
        }
    }

    fn into_entry(self) -> MiddlewareEntry {
        match self {
            Registration::Scoped { path, middlewares } => MiddlewareEntry::new(path, middlewares),
            Registration::Global { middlewares } => MiddlewareEntry::new(PathPrefix::root(), middlewares),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registration::Scoped { path, middlewares } => {
                f.debug_struct("Scoped").field("path", path).field("middlewares", &middlewares.len()).finish()
            }
            Registration::Global { middlewares } => {
                f.debug_struct("Global").field("middlewares", &middlewares.len()).finish()
            }
        }
    }
}

/// Main router structure that dispatches requests through the middleware chain
#[derive(Debug)]
pub struct Router {
    table: RouterTable,
}

impl Router {
    /// Creates a new, empty router builder
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Gets the registered entries
    pub fn table(&self) -> &RouterTable {
        &self.table
    }

    /// Selects the middleware to run for a request with `method` and `url`.
    ///
    /// `url` is the request target including any query string. Entries match when
    /// `url` starts with their prefix; the favicon url never matches anything.
    pub fn execution_stack(&self, method: &Method, url: &str) -> ExecutionStack<'_> {
        let mut stack = ExecutionStack::new();

        if url == FAVICON_URL {
            debug!(url, "favicon request, skipping all middleware");
            return stack;
        }

        let matched = self
            .table
            .candidates(method)
            .filter(|entry| entry.matches(url))
            .flat_map(|entry| entry.middlewares().iter().map(|middleware| &**middleware as &dyn Middleware));
        stack.extend(matched);
        stack
    }

    /// Runs the middleware chain selected for `req`.
    ///
    /// Returns when the chain has ended. Nothing is written to `res` by the router
    /// itself: if no middleware ends the response, it stays open.
    pub async fn dispatch(&self, req: &mut Request, res: &mut Response) {
        let stack = self.execution_stack(req.method(), req.url());
        debug!(method = %req.method(), url = req.url(), middlewares = stack.len(), "dispatching request");

        stack.execute(req, res).await;

        if !res.is_ended() {
            warn!(method = %req.method(), url = req.url(), "middleware chain finished without ending the response");
        }
    }
}

/// Collects registrations in call order, see [`Router::builder`].
#[derive(Debug, Default)]
pub struct RouterBuilder {
    table: RouterTable,
}

macro_rules! register_method {
    ($method:ident, $bucket:ident) => {
        #[doc = concat!("Appends a registration to the `", stringify!($bucket), "` bucket.")]
        pub fn $method(self, registration: Registration) -> Self {
            self.register(Bucket::$bucket, registration)
        }
    };
}

impl RouterBuilder {
    fn new() -> Self {
        Self { table: RouterTable::default() }
    }

    /// Appends a registration to `bucket`. Never fails.
    pub fn register(mut self, bucket: Bucket, registration: Registration) -> Self {
        let entry = registration.into_entry();
        debug!(?bucket, path = %entry.path(), middlewares = entry.middlewares().len(), "register middleware");
        self.table.push(bucket, entry);
        self
    }

    register_method!(register_all, All);
    register_method!(register_get, Get);
    register_method!(register_post, Post);

    /// Builds the router from the accumulated registrations
    pub fn build(self) -> Router {
        Router { table: self.table }
    }
}
