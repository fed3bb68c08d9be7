//! # Status endpoint.
//!
//! [`Supervisor::start_monitor`] binds a TCP listener and answers every HTTP
//! request, whatever its method or path, with the current
//! [`snapshot`](Supervisor::snapshot) as `text/plain`. There is no routing,
//! no authentication and no keep-alive: one request, one response, close.
//! Connections are served by hyper's HTTP/1 server; a client that does not
//! send its request head within 10 seconds is disconnected.
//!
//! Starting is idempotent per supervisor; the accept loop holds only a weak
//! reference, so dropping the last `Arc<Supervisor>` ends it.

use std::convert::Infallible;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Weak};
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::Supervisor;
use crate::error::MonitorError;
use crate::events::{Event, EventKind};

/// A client that has not sent a full request head by then is dropped.
const HEADER_READ_TIMEOUT: Duration = Duration::from_secs(10);

impl Supervisor {
    /// Starts the status endpoint on `addr`, at most once.
    ///
    /// Returns the bound address when this call started the listener, or
    /// `Ok(None)` when it was already running. A failed bind can be retried.
    pub async fn start_monitor(
        self: &Arc<Self>,
        addr: SocketAddr,
    ) -> Result<Option<SocketAddr>, MonitorError> {
        if self
            .monitor_started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("monitor already started");
            return Ok(None);
        }

        let (listener, local) = match bind(addr).await {
            Ok(bound) => bound,
            Err(e) => {
                self.monitor_started.store(false, Ordering::Release);
                return Err(e);
            }
        };

        info!(%local, "monitor listening");
        self.bus()
            .publish(Event::new(EventKind::MonitorStarted).with_reason(local.to_string()));
        tokio::spawn(accept_loop(listener, Arc::downgrade(self)));
        Ok(Some(local))
    }

    /// Starts the status endpoint on `0.0.0.0:port`, at most once.
    pub async fn start_monitor_on_port(
        self: &Arc<Self>,
        port: u16,
    ) -> Result<Option<SocketAddr>, MonitorError> {
        self.start_monitor(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
            .await
    }
}

async fn bind(addr: SocketAddr) -> Result<(TcpListener, SocketAddr), MonitorError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| MonitorError::Bind { addr, source })?;
    let local = listener.local_addr().map_err(MonitorError::LocalAddr)?;
    Ok((listener, local))
}

async fn accept_loop(listener: TcpListener, sup: Weak<Supervisor>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                if sup.strong_count() == 0 {
                    debug!("supervisor dropped; monitor stops");
                    break;
                }
                let sup = sup.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |_req: Request<Incoming>| {
                        let sup = sup.clone();
                        async move { Ok::<_, Infallible>(status_page(&sup)) }
                    });
                    let served = http1::Builder::new()
                        .timer(TokioTimer::new())
                        .header_read_timeout(HEADER_READ_TIMEOUT)
                        .keep_alive(false)
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                    if let Err(e) = served {
                        debug!(%peer, error = %e, "monitor connection failed");
                    }
                });
            }
            Err(e) => {
                warn!(error = %e, "monitor accept failed");
            }
        }
    }
}

/// Renders the current snapshot, or 503 once the supervisor is gone.
fn status_page(sup: &Weak<Supervisor>) -> Response<Full<Bytes>> {
    let (status, body) = match sup.upgrade() {
        Some(sup) => (StatusCode::OK, sup.snapshot().to_string()),
        None => (StatusCode::SERVICE_UNAVAILABLE, String::new()),
    };
    let mut resp = Response::new(Full::new(Bytes::from(body)));
    *resp.status_mut() = status;
    resp.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    resp
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    use super::*;
    use crate::{SupervisorConfig, TaskError};

    async fn fetch(addr: SocketAddr) -> String {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream
            .write_all(b"GET /anything HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .expect("write");
        let mut out = String::new();
        stream.read_to_string(&mut out).await.expect("read");
        out
    }

    #[tokio::test]
    async fn serves_snapshot_and_starts_once() {
        let sup = Supervisor::builder(SupervisorConfig::default()).build();
        sup.register_fn(
            "pollers",
            2,
            || async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok::<(), TaskError>(())
            },
            true,
            true,
        )
        .expect("register");

        let local = sup
            .start_monitor(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("start")
            .expect("first start binds");

        let again = sup
            .start_monitor(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("second start");
        assert!(again.is_none());

        let response = fetch(local).await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("text/plain"));
        assert!(response.contains("group: pollers ------ instances: 2"));
        assert!(response.contains("running    : 2"));
    }

    #[tokio::test]
    async fn failed_bind_can_be_retried() {
        let taken = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("bind");
        let busy = taken.local_addr().expect("addr");

        let sup = Supervisor::builder(SupervisorConfig::default()).build();
        let err = sup.start_monitor(busy).await.expect_err("port in use");
        assert_eq!(err.as_label(), "monitor_bind");

        let ok = sup
            .start_monitor(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("retry");
        assert!(ok.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn silent_client_is_disconnected() {
        let sup = Supervisor::builder(SupervisorConfig::default()).build();
        let local = sup
            .start_monitor(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("start")
            .expect("bound");

        let mut stream = TcpStream::connect(local).await.expect("connect");
        let opened = tokio::time::Instant::now();
        let mut buf = Vec::new();
        let _ = stream.read_to_end(&mut buf).await;

        assert!(opened.elapsed() >= HEADER_READ_TIMEOUT);
        assert!(!String::from_utf8_lossy(&buf).contains("200 OK"));
    }

    #[tokio::test]
    async fn any_method_and_path_get_the_report() {
        let sup = Supervisor::builder(SupervisorConfig::default()).build();
        let local = sup
            .start_monitor(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
            .await
            .expect("start")
            .expect("bound");

        let mut stream = TcpStream::connect(local).await.expect("connect");
        stream
            .write_all(b"POST /x/y?z=1 HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\n\r\n")
            .await
            .expect("write");
        let mut out = String::new();
        stream.read_to_string(&mut out).await.expect("read");
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"), "{out}");
    }
}
