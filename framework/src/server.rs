use crate::config::ServerConfig;
use crate::error::FrameworkError;
use crate::http::{collect_body, HttpResponse, Request};
use crate::module::ApplicationGraph;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::net::TcpListener;

pub struct Server {
    graph: ApplicationGraph,
    host: String,
    port: u16,
    max_body_size: usize,
}

impl Server {
    pub fn new(graph: ApplicationGraph) -> Self {
        Self::from_config(ServerConfig::default(), graph)
    }

    pub fn from_config(config: ServerConfig, graph: ApplicationGraph) -> Self {
        Self {
            graph,
            host: config.host,
            port: config.port,
            max_body_size: config.max_body_size,
        }
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    fn get_addr(&self) -> Result<SocketAddr, FrameworkError> {
        let ip = self
            .host
            .parse()
            .map_err(|_| FrameworkError::server(format!("invalid listen host {:?}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Serve until Ctrl+C
    pub async fn run(self) -> Result<(), FrameworkError> {
        let addr = self.get_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| FrameworkError::server(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(module = self.graph.name(), "application listening on http://{}", addr);

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                },
                _ = &mut shutdown => {
                    tracing::info!("shutting down");
                    return Ok(());
                }
            };

            let io = TokioIo::new(stream);
            let graph = self.graph.clone();
            let limit = self.max_body_size;

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let graph = graph.clone();
                    async move { Ok::<_, Infallible>(handle_request(graph, limit, req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%peer, error = %err, "error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    graph: ApplicationGraph,
    limit: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let (parts, body) = req.into_parts();
    let response = match collect_body(body, limit).await {
        Ok(bytes) => {
            let request = Request::new(http::Request::from_parts(parts, bytes));
            graph.handle(request).await
        }
        Err(e) => HttpResponse::from(e),
    };

    tracing::info!(
        %method,
        %path,
        status = response.status_code(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    response.into_hyper()
}
