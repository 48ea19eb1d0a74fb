use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use once_cell::sync::{Lazy, OnceCell};
use reqwest::{header, Client, Method, Response};
use serde::de::DeserializeOwned;

use crate::logging::Logger;

/// A singleton instance of the reqwest client.
static CLIENT: OnceCell<Client> = OnceCell::new();

static LOGGER: Lazy<Logger> = Lazy::new(|| Logger::new("http"));

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Returns the reqwest client singleton instance or creates one if it doesn't exist.
///
/// reqwest is built without a bundled crypto provider, so the ring provider
/// is installed as the process default before the first client is built.
///
/// # Returns
///
/// * Result<&'static Client>: A reference to the reqwest client instance,
///   or an error if the client cannot be created.
fn get_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        // 已經安裝過時會回傳 Err，可忽略
        let _ = rustls::crypto::ring::default_provider().install_default();

        Client::builder()
            // ===== 壓縮 =====
            .brotli(true)
            .gzip(true)
            .zstd(true)
            // ===== 超時設置 =====
            .connect_timeout(Duration::from_secs(8))
            .timeout(Duration::from_secs(30))
            // ===== TCP 優化 =====
            .tcp_nodelay(true)
            .tcp_keepalive(Duration::from_secs(60))
            // ===== 連接池 =====
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            // ===== 重定向 =====
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| anyhow!("Failed to create reqwest client: {:?}", e))
    })
}

/// Performs an HTTP GET request and returns the raw response.
///
/// The status code is not inspected; callers decide what a non-success
/// status means for them.
pub async fn get_response(url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    send(Method::GET, url, headers).await
}

/// Reads the whole response body and deserializes it as JSON.
///
/// The body text is kept in the error message when it is not valid JSON
/// for `RES`.
pub async fn json_body<RES: DeserializeOwned>(response: Response) -> Result<RES> {
    let res_body = response
        .text()
        .await
        .map_err(|e| anyhow!("Error reading response body: {}", e.without_url()))?;

    serde_json::from_str(&res_body)
        .map_err(|e| anyhow!("Error parsing response JSON({}): {:?}", &res_body, e))
}

/// Sends a single HTTP request. There is no retry; a failed attempt is
/// logged and returned to the caller.
async fn send(method: Method, url: &str, headers: Option<header::HeaderMap>) -> Result<Response> {
    let visit_log = format!("{method}:{}", redact_query(url));
    let client = get_client()?;
    let mut rb = client.request(method, url);

    if let Some(h) = headers {
        rb = rb.headers(h);
    }

    let start = Instant::now();
    let res = rb.send().await;
    let elapsed = start.elapsed().as_millis();

    match res {
        Ok(response) => {
            LOGGER.info(format!(
                "{} {} {} ms",
                visit_log,
                response.status(),
                elapsed
            ));
            Ok(response)
        }
        Err(why) => {
            // reqwest 的錯誤會帶完整 URL，連同 apikey 一起移除
            let why = why.without_url();
            LOGGER.error(format!("{} failed because {:?}. {} ms", visit_log, why, elapsed));
            Err(anyhow!("Failed to send request to {}: {}", redact_query(url), why))
        }
    }
}

/// 日誌中不記錄 query string，避免 API key 外洩
fn redact_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}
