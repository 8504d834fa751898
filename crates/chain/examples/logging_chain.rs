use futures::future::BoxFuture;
use micro_chain::router::{PathPrefix, Registration, Router};
use micro_chain::{middleware_fn, Next, Request, Response, Server};
use serde::Serialize;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Serialize)]
struct User {
    id: u32,
    name: &'static str,
}

fn log<'a>(req: &'a mut Request, res: &'a mut Response, next: Next<'a>) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        info!(method = %req.method(), url = req.url(), "incoming request");
        next.run(req, res).await;
    })
}

fn user<'a>(_req: &'a mut Request, res: &'a mut Response, _next: Next<'a>) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        if let Err(e) = res.json(&User { id: 1, name: "zava" }) {
            error!(cause = %e, "failed to write user");
        }
    })
}

fn create_user<'a>(req: &'a mut Request, res: &'a mut Response, _next: Next<'a>) -> BoxFuture<'a, ()> {
    Box::pin(async move {
        res.set_status(http::StatusCode::CREATED);
        let body = req.body().clone();
        if let Err(e) = res.end(body) {
            error!(cause = %e, "failed to echo user");
        }
    })
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let user_path = PathPrefix::new("/user").expect("static prefix is valid");

    let router = Router::builder()
        .register_all(Registration::global().with(middleware_fn(log)))
        .register_get(Registration::scoped(user_path.clone()).with(middleware_fn(user)))
        .register_post(Registration::scoped(user_path).with(middleware_fn(create_user)))
        .build();

    let server = match Server::builder().router(router).address("127.0.0.1:3000").build() {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "invalid server config");
            return;
        }
    };

    if let Err(e) = server.start().await {
        error!(cause = %e, "server stopped");
    }
}
