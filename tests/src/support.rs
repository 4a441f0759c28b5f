use http_intercept::{ClientEntries, HttpClients, HyperHttpClient, ReqwestHttpClient};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server,
};
use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Real clients that talk to the local echo server directly, whatever the proxy environment says.
pub fn local_clients() -> HttpClients {
    let blocking = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    HttpClients::new(ClientEntries::new(
        Arc::new(HyperHttpClient::new()),
        Arc::new(ReqwestHttpClient::with_client(blocking)),
    ))
}

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Starts a server on a free local port that answers `201` with "<method> <uri> <body>" and
/// counts the requests it gets.
pub fn start_echo_server() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let server_hits = hits.clone();
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        Runtime::new().unwrap().block_on(async move {
            let addr = SocketAddr::from(([127, 0, 0, 1], 0));

            let server = Server::bind(&addr).serve(make_service_fn(move |_| {
                let hits = server_hits.clone();
                async move {
                    Ok::<_, Infallible>(service_fn(move |request: Request<Body>| {
                        let hits = hits.clone();
                        async move {
                            hits.fetch_add(1, Ordering::SeqCst);
                            let head = format!("{} {}", request.method(), request.uri());
                            let body = body::to_bytes(request.into_body())
                                .await
                                .unwrap_or_default();

                            Ok::<_, Infallible>(
                                Response::builder()
                                    .status(201)
                                    .header("x-echo", "real")
                                    .body(Body::from(format!(
                                        "{} {}",
                                        head,
                                        String::from_utf8_lossy(&body)
                                    )))
                                    .unwrap(),
                            )
                        }
                    }))
                }
            }));

            sender.send(server.local_addr()).unwrap();

            if let Err(e) = server.await {
                tracing::error!("echo server error: {}", e);
            }
        });
    });

    (receiver.recv().unwrap(), hits)
}
