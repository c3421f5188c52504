// src/fetch/pipeline.rs

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{error, info, instrument, trace, warn};

use super::OrderSource;
use crate::orders::{has_tag, normalize_order, resolve_time_zone, sample_rows, COD_TAG};
use crate::schema::{header, Row};
use crate::settings::Settings;
use crate::sheet::TabularSink;

/// Shown instead of any upstream error detail.
pub const FETCH_FAILED_MESSAGE: &str =
    "Could not load orders from the store. Check the shop settings and try again.";

pub const NO_ORDERS_MESSAGE: &str = "No COD-tagged orders found.";

/// What the caller gets back from a fetch: rows, or an empty set plus a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FetchResult {
    pub rows: Vec<Row>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FetchResult {
    pub fn failed(&self) -> bool {
        self.message.as_deref() == Some(FETCH_FAILED_MESSAGE)
    }
}

/// Fetch the shop's orders and flatten the COD-tagged ones, in source order.
///
/// Without a domain or access token this returns [`sample_rows`] and never
/// touches `source`. The upstream `tagged_with` filter is not trusted: every
/// order is checked again with [`has_tag`].
#[instrument(level = "info", skip_all)]
pub fn fetch_cod_rows(settings: &Settings, source: &dyn OrderSource) -> Result<Vec<Row>> {
    let tz = resolve_time_zone(settings.time_zone());

    let Some(auth) = settings.shop_auth() else {
        warn!("shop domain or access token not set; returning sample orders");
        return Ok(sample_rows());
    };

    info!(domain = %auth.domain, api_version = %auth.api_version, "fetching COD orders");
    let orders = source
        .fetch_orders(&auth)
        .with_context(|| format!("fetching orders from {}", auth.domain))?;

    let received = orders.len();
    let rows: Vec<Row> = orders
        .iter()
        .filter(|o| {
            let keep = has_tag(o.tags(), COD_TAG);
            if !keep {
                trace!(order = o.name(), tags = ?o.tags(), "skipping order without COD tag");
            }
            keep
        })
        .map(|o| normalize_order(o, tz))
        .collect();

    info!(received, kept = rows.len(), "normalized COD orders");
    Ok(rows)
}

/// [`fetch_cod_rows`] with every failure turned into a user-facing message.
/// The cause is logged and never returned.
pub fn load_cod_orders(settings: &Settings, source: &dyn OrderSource) -> FetchResult {
    match fetch_cod_rows(settings, source) {
        Ok(rows) if rows.is_empty() => {
            info!("no COD orders");
            FetchResult {
                rows,
                message: Some(NO_ORDERS_MESSAGE.to_string()),
            }
        }
        Ok(rows) => FetchResult {
            rows,
            message: None,
        },
        Err(e) => {
            error!(error = ?e, "order fetch failed");
            FetchResult {
                rows: Vec::new(),
                message: Some(FETCH_FAILED_MESSAGE.to_string()),
            }
        }
    }
}

/// Load orders and rewrite the sheet with them. A failed fetch leaves the
/// sheet as it was.
#[instrument(level = "info", skip_all)]
pub fn refresh_sheet(
    sink: &mut dyn TabularSink,
    settings: &Settings,
    source: &dyn OrderSource,
) -> Result<FetchResult> {
    let result = load_cod_orders(settings, source);
    if result.failed() {
        return Ok(result);
    }

    let rows: Vec<Vec<String>> = result.rows.iter().map(|r| r.values().to_vec()).collect();
    sink.write_table(&header(), &rows)
        .with_context(|| format!("writing orders to sheet {}", sink.name()))?;
    info!(sheet = sink.name(), rows = rows.len(), "sheet refreshed");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::OrderSourceError;
    use crate::orders::RawOrder;
    use crate::schema::Column;
    use crate::settings::ShopAuth;
    use crate::fetch::ShopifyClient;
    use crate::sheet::{apply_filters, Grid};
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::io;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    /// Shared buffer the test subscriber writes formatted events into.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a debug-level fmt subscriber and return its output
    /// together with everything that was logged.
    fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_target(false)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, buffer.contents())
    }

    /// `http://` address of a local port nothing listens on.
    fn closed_port() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}", addr)
    }

    /// Serves canned JSON or a canned status, counting calls.
    struct FakeSource {
        reply: Result<&'static str, (u16, &'static str)>,
        calls: Cell<usize>,
    }

    impl FakeSource {
        fn orders(json: &'static str) -> Self {
            Self {
                reply: Ok(json),
                calls: Cell::new(0),
            }
        }

        fn status(code: u16, body: &'static str) -> Self {
            Self {
                reply: Err((code, body)),
                calls: Cell::new(0),
            }
        }
    }

    impl OrderSource for FakeSource {
        fn fetch_orders(&self, _auth: &ShopAuth) -> Result<Vec<RawOrder>, OrderSourceError> {
            self.calls.set(self.calls.get() + 1);
            match self.reply {
                Ok(json) => Ok(serde_json::from_str(json)?),
                Err((status, body)) => Err(OrderSourceError::Status {
                    status,
                    body: body.to_string(),
                }),
            }
        }
    }

    fn configured() -> Settings {
        Settings::new("demo.myshopify.com", "shpat_test")
    }

    const ORDERS: &str = r##"[
        {"name": "#1", "tags": "cod, wholesale", "shipping_address": {"country": "Türkiye"}},
        {"name": "#2", "tags": "Cash, COD-like"},
        {"name": "#3", "tags": null},
        {"name": "#4", "tags": " COD "}
    ]"##;

    #[test]
    fn missing_credentials_return_sample_without_calling_source() -> Result<()> {
        let source = FakeSource::orders("[]");
        let rows = fetch_cod_rows(&Settings::default(), &source)?;
        assert_eq!(rows, sample_rows());
        assert_eq!(rows.len(), 2);
        assert_eq!(source.calls.get(), 0);

        let token_only = Settings {
            access_token: Some("t".into()),
            ..Default::default()
        };
        assert_eq!(fetch_cod_rows(&token_only, &source)?, sample_rows());
        assert_eq!(source.calls.get(), 0);
        Ok(())
    }

    #[test]
    fn keeps_only_cod_orders_in_source_order() -> Result<()> {
        let source = FakeSource::orders(ORDERS);
        let rows = fetch_cod_rows(&configured(), &source)?;
        let names: Vec<&str> = rows.iter().map(|r| r.get(Column::Order)).collect();
        assert_eq!(names, ["#1", "#4"]);
        assert_eq!(rows[0].get(Column::Country), "Türkiye");
        assert_eq!(source.calls.get(), 1);
        Ok(())
    }

    #[test]
    fn upstream_failure_yields_generic_message_and_no_rows() {
        let source = FakeSource::status(503, "upstream exploded");
        let result = load_cod_orders(&configured(), &source);
        assert!(result.rows.is_empty());
        assert_eq!(result.message.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(!FETCH_FAILED_MESSAGE.contains("503"));
        assert!(result.failed());
    }

    #[test]
    fn upstream_status_and_body_reach_the_log_but_not_the_caller() {
        let source = FakeSource::status(503, "upstream exploded");
        let (result, logs) = capture_logs(|| load_cod_orders(&configured(), &source));

        assert!(result.failed());
        assert!(result.rows.is_empty());
        let message = result.message.unwrap();
        assert_eq!(message, FETCH_FAILED_MESSAGE);
        assert!(!message.contains("503"));
        assert!(!message.contains("upstream exploded"));

        assert!(logs.contains("order fetch failed"), "{logs}");
        assert!(logs.contains("HTTP 503"), "{logs}");
        assert!(logs.contains("upstream exploded"), "{logs}");
        assert!(logs.contains("fetching orders from demo.myshopify.com"), "{logs}");
    }

    #[test]
    fn malformed_response_is_logged_and_reported_generically() -> Result<()> {
        let source = FakeSource::orders("<html>maintenance</html>");
        let err = fetch_cod_rows(&configured(), &source).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OrderSourceError>(),
            Some(OrderSourceError::Decode(_))
        ));

        let (result, logs) = capture_logs(|| load_cod_orders(&configured(), &source));
        assert!(result.failed());
        assert!(result.rows.is_empty());
        assert!(logs.contains("malformed orders response"), "{logs}");
        assert!(!result.message.unwrap_or_default().contains("malformed"));
        Ok(())
    }

    #[test]
    fn unreachable_shop_is_logged_and_reported_generically() {
        let settings = Settings::new(closed_port(), "shpat_test");
        let client = ShopifyClient::new();

        let err = fetch_cod_rows(&settings, &client).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<OrderSourceError>(),
            Some(OrderSourceError::Transport(_))
        ));

        let (result, logs) = capture_logs(|| load_cod_orders(&settings, &client));
        assert!(result.failed());
        assert!(result.rows.is_empty());
        assert_eq!(result.message.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert!(logs.contains("order fetch failed"), "{logs}");
        assert!(logs.contains("request failed"), "{logs}");
    }

    #[test]
    fn no_matching_orders_is_not_an_error() {
        let source = FakeSource::orders(r##"[{"name": "#9", "tags": "prepaid"}]"##);
        let result = load_cod_orders(&configured(), &source);
        assert!(result.rows.is_empty());
        assert_eq!(result.message.as_deref(), Some(NO_ORDERS_MESSAGE));
        assert!(!result.failed());
    }

    #[test]
    fn refresh_writes_header_and_rows_then_filters() -> Result<()> {
        let source = FakeSource::orders(ORDERS);
        let mut grid = Grid::new();
        let result = refresh_sheet(&mut grid, &configured(), &source)?;
        assert_eq!(result.message, None);
        assert_eq!(grid.last_row(), 3);
        assert_eq!(grid.header(), header().as_slice());

        let request: HashMap<String, Option<String>> =
            [("Country".to_string(), Some(" türkiye ".to_string()))].into();
        assert_eq!(apply_filters(&mut grid, &request)?, 1);
        let visible = grid.visible_rows();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0][0], "#1");
        Ok(())
    }

    #[test]
    fn failed_refresh_leaves_sheet_untouched() -> Result<()> {
        let mut grid = Grid::new();
        refresh_sheet(&mut grid, &Settings::default(), &FakeSource::orders("[]"))?;
        assert_eq!(grid.last_row(), 3);

        let result = refresh_sheet(&mut grid, &configured(), &FakeSource::status(500, "boom"))?;
        assert!(result.failed());
        assert_eq!(grid.last_row(), 3);
        Ok(())
    }
}
