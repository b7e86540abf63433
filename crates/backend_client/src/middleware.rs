use std::time::Instant;

use async_trait::async_trait;
use http::Extensions;
use log::{debug, error, info};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

/// Logs every backend request with its status and latency.
///
/// No retry middleware is installed next to it: failed calls are retried by
/// the operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

#[async_trait]
impl Middleware for RequestLogger {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let method = req.method().clone();
        let url = req.url().clone();
        info!("Sending {} request to {}", method, url);
        if req.body().is_some() {
            debug!("Request has body");
        }

        let start_time = Instant::now();
        let result = next.run(req, extensions).await;

        match &result {
            Ok(resp) => info!(
                "Got response from {} {} after {:?} with status {}",
                method,
                url,
                start_time.elapsed(),
                resp.status()
            ),
            Err(reqwest_middleware::Error::Reqwest(e)) => {
                error!("Failed HTTP request to {}: {}", url, e);
                if e.is_timeout() {
                    error!("Request timed out");
                }
                if e.is_connect() {
                    error!("Connection error");
                }
            }
            Err(e) => error!("Middleware failure for {}: {}", url, e),
        }

        result
    }
}
