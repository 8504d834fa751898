//! A micro middleware-chain web framework
//!
//! Handlers ("middleware") are registered against a path prefix and, optionally,
//! an HTTP verb. For every request the matching middleware run one at a time in
//! registration order, and each one decides whether the chain continues by
//! calling [`Next::run`].
//!
//! # Example
//!
//! ```no_run
//! use micro_chain::router::{PathPrefix, Registration, Router};
//! use micro_chain::{middleware_fn, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::builder()
//!         .register_all(Registration::global().with(middleware_fn(|req, res, next| {
//!             Box::pin(async move {
//!                 tracing::info!(url = req.url(), "incoming request");
//!                 next.run(req, res).await;
//!             })
//!         })))
//!         .register_get(Registration::scoped(PathPrefix::new("/user").unwrap()).with(middleware_fn(
//!             |_req, res, _next| {
//!                 Box::pin(async move {
//!                     let _ = res.json(&["zava"]);
//!                 })
//!             },
//!         )))
//!         .build();
//!
//!     Server::builder().router(router).address("127.0.0.1:3000").build().unwrap().start().await.unwrap();
//! }
//! ```
//!
//! # Matching
//!
//! - all-verb registrations run before GET or POST registrations
//! - a prefix matches any url that starts with it, `/user` matches `/users`
//! - `/favicon.ico` never runs any middleware
//! - nothing answers a request on its own: if no middleware ends the response,
//!   the request stays open

mod chain;
mod middleware;
mod request;
mod response;
mod server;

pub mod router;

pub use chain::ExecutionStack;
pub use chain::Next;
pub use middleware::middleware_fn;
pub use middleware::FnMiddleware;
pub use middleware::Middleware;
pub use request::Request;
pub use response::PendingResponse;
pub use response::Response;
pub use response::ResponseBody;
pub use response::ResponseError;
pub use router::Router;
pub use server::Server;
pub use server::ServerBuildError;
pub use server::ServerBuilder;
pub use server::ServerError;
pub use server::DEFAULT_BODY_LIMIT;
