//! Behavior-driven tests for the relay client and the live series source.
//!
//! A canned transport answers by endpoint path and records every URL asked for.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tickerdash_core::{
    resolve, HttpClient, HttpError, HttpRequest, HttpResponse, QuoteBoard, QuoteStatus, RelayClient,
    RelayError, RelaySource, SeriesRequest, SeriesResult, SeriesSource, SymbolSearch, TimeRange,
    SEARCH_LIMIT,
};
use tickerdash_tests::{now, symbol};

const RELAY: &str = "http://relay.test/api/finnhub";

#[derive(Default)]
struct CannedHttpClient {
    routes: Vec<(&'static str, Result<HttpResponse, HttpError>)>,
    seen: Mutex<Vec<String>>,
}

impl CannedHttpClient {
    fn route(mut self, path: &'static str, response: Result<HttpResponse, HttpError>) -> Self {
        self.routes.push((path, response));
        self
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("seen lock").clone()
    }
}

impl HttpClient for CannedHttpClient {
    fn get<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            self.seen.lock().expect("seen lock").push(request.url.clone());
            let path = request
                .url
                .strip_prefix(RELAY)
                .and_then(|rest| rest.split('?').next())
                .unwrap_or_default()
                .trim_start_matches('/');
            self.routes
                .iter()
                .find(|(route, _)| *route == path)
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::new(404, r#"{"message":"no route"}"#)))
        })
    }
}

fn client(http: CannedHttpClient) -> (RelayClient, Arc<CannedHttpClient>) {
    let http = Arc::new(http);
    (RelayClient::new(format!("{RELAY}/"), http.clone()), http)
}

// =============================================================================
// Relay Client: Candles
// =============================================================================

#[tokio::test]
async fn when_candles_arrive_unsorted_samples_are_ordered_in_milliseconds() {
    // Given: A relay answering with out-of-order candle timestamps
    let (relay, http) = client(CannedHttpClient::default().route(
        "stock/candle",
        Ok(HttpResponse::ok_json(
            r#"{"s":"ok","t":[1718409600,1718236800,1718323200],"c":[192.0,190.5,191.25]}"#,
        )),
    ));
    let window = resolve(TimeRange::OneYear, now());

    // When: Candles are requested
    let samples = relay
        .candles(&symbol("AAPL"), &window)
        .await
        .expect("candles parse");

    // Then: Samples are ascending, in milliseconds, prices untouched
    let timestamps = samples.iter().map(|s| s.timestamp_ms).collect::<Vec<_>>();
    assert_eq!(
        timestamps,
        vec![1_718_236_800_000, 1_718_323_200_000, 1_718_409_600_000]
    );
    assert_eq!(samples[0].price, 190.5);

    // And: The request carried symbol, resolution and the window in seconds
    let url = &http.seen()[0];
    assert!(url.starts_with(&format!("{RELAY}/stock/candle?symbol=AAPL&resolution=D")));
    assert!(url.contains(&format!("from={}", window.start.unix_seconds())));
    assert!(url.contains(&format!("to={}", window.end.unix_seconds())));
}

#[tokio::test]
async fn when_provider_reports_no_data_candles_fail() {
    // Given: A relay answering s = "no_data"
    let (relay, _) = client(
        CannedHttpClient::default()
            .route("stock/candle", Ok(HttpResponse::ok_json(r#"{"s":"no_data"}"#))),
    );

    // When: Candles are requested
    let error = relay
        .candles(&symbol("AAPL"), &resolve(TimeRange::FiveDay, now()))
        .await
        .expect_err("no data");

    // Then: The failure names the provider status
    assert_eq!(
        error,
        RelayError::NoData {
            status: String::from("no_data")
        }
    );
}

#[tokio::test]
async fn when_candle_arrays_are_missing_or_mismatched_the_payload_is_rejected() {
    // Given: Three malformed but well-formed-JSON candle payloads
    let bodies = [
        r#"{"s":"ok","t":[1718409600]}"#,
        r#"{"s":"ok","t":[1718409600,1718323200],"c":[190.5]}"#,
        r#"{"s":"ok","t":[1718409600],"c":[-1.0]}"#,
    ];

    for body in bodies {
        let (relay, _) = client(
            CannedHttpClient::default().route("stock/candle", Ok(HttpResponse::ok_json(body))),
        );

        // When: Candles are requested
        let error = relay
            .candles(&symbol("AAPL"), &resolve(TimeRange::OneMonth, now()))
            .await
            .expect_err("malformed payload");

        // Then: Each is reported as a payload error
        assert_eq!(error.code(), "relay.payload", "body: {body}");
    }
}

#[tokio::test]
async fn when_relay_has_no_key_the_error_is_a_configuration_error() {
    // Given: A relay answering 500 with the missing-key message
    let (relay, _) = client(CannedHttpClient::default().route(
        "stock/candle",
        Ok(HttpResponse::new(
            500,
            r#"{"message":"API key is not configured"}"#,
        )),
    ));

    // When: Candles are requested
    let error = relay
        .candles(&symbol("AAPL"), &resolve(TimeRange::OneYear, now()))
        .await
        .expect_err("missing key");

    // Then: The error carries the relay message and is flagged as configuration
    assert!(error.is_configuration());
    assert_eq!(
        error,
        RelayError::Status {
            status: 500,
            message: String::from("API key is not configured"),
        }
    );
}

// =============================================================================
// Relay Source: Failure Folding
// =============================================================================

#[tokio::test]
async fn when_the_relay_fails_the_source_yields_a_failed_result() {
    // Given: A live source whose relay is unreachable
    let (relay, _) = client(
        CannedHttpClient::default()
            .route("stock/candle", Err(HttpError::Connect(String::from("connection refused")))),
    );
    let source = RelaySource::new(relay);

    // When: A series is fetched
    let result = source
        .fetch(SeriesRequest {
            symbol: symbol("MSFT"),
            range: TimeRange::SixMonth,
            window: resolve(TimeRange::SixMonth, now()),
            slot: 1,
        })
        .await;

    // Then: The failure is a value, not an error
    assert_eq!(
        result.failure_reason(),
        Some("relay transport error: connection failed: connection refused")
    );
}

#[tokio::test]
async fn when_the_relay_succeeds_the_source_labels_the_series_with_the_ticker() {
    // Given: A live source with one candle available
    let (relay, _) = client(CannedHttpClient::default().route(
        "stock/candle",
        Ok(HttpResponse::ok_json(r#"{"s":"ok","t":[1718409600],"c":[420.0]}"#)),
    ));
    let source = RelaySource::new(relay);
    let window = resolve(TimeRange::Intraday, now());

    // When: A series is fetched
    let result = source
        .fetch(SeriesRequest {
            symbol: symbol("MSFT"),
            range: TimeRange::Intraday,
            window,
            slot: 0,
        })
        .await;

    // Then: The series is labelled and typed for the window's resolution
    let series = result.as_ready().expect("series is ready");
    assert_eq!(series.label, "MSFT");
    assert_eq!(series.resolution, window.resolution);
    assert_eq!(series.len(), 1);
    assert!(matches!(result, SeriesResult::Ready(_)));
}

// =============================================================================
// Relay Client: Quotes
// =============================================================================

#[tokio::test]
async fn when_quote_lacks_a_current_price_the_card_shows_an_error() {
    // Given: A relay whose quote payload has no current price
    let (relay, _) = client(
        CannedHttpClient::default().route("quote", Ok(HttpResponse::ok_json(r#"{"d":1.0}"#))),
    );
    let board = QuoteBoard::new(relay);

    // When: The card is loaded
    let status = board.load(&symbol("AAPL")).await;

    // Then: The card is in error
    assert!(matches!(status, QuoteStatus::Error(reason) if reason.contains("no current price")));
}

#[tokio::test]
async fn when_quotes_load_cards_keep_the_requested_order() {
    // Given: A relay answering the same quote for every ticker
    let (relay, http) = client(CannedHttpClient::default().route(
        "quote",
        Ok(HttpResponse::ok_json(
            r#"{"c":190.5,"d":-2.25,"dp":-1.17,"h":193.0,"l":189.9,"o":192.0,"pc":192.75}"#,
        )),
    ));
    let board = QuoteBoard::new(relay);
    let symbols = vec![symbol("NVDA"), symbol("AAPL"), symbol("TSLA")];

    // When: All cards are loaded
    let cards = board.load_all(&symbols).await;

    // Then: One ready card per ticker, in request order
    assert_eq!(
        cards.iter().map(|(symbol, _)| symbol.clone()).collect::<Vec<_>>(),
        symbols
    );
    let QuoteStatus::Ready(snapshot) = &cards[0].1 else {
        panic!("expected a ready quote");
    };
    assert_eq!(snapshot.previous_close, 192.75);
    assert!(!snapshot.is_positive());
    assert_eq!(http.seen().len(), 3);
}

// =============================================================================
// Relay Client: Search
// =============================================================================

fn search_body(hits: usize) -> String {
    let mut results = vec![
        r#"{"symbol":"BAC-PL","description":"BANK OF AMERICA PFD","type":"Preferred Stock"}"#
            .to_owned(),
        r#"{"symbol":"BAC.WS","description":"BANK OF AMERICA WARRANT","type":"Common Stock"}"#
            .to_owned(),
    ];
    results.extend((0..hits).map(|i| {
        format!(r#"{{"symbol":"BK{i}","description":"BANK NUMBER {i}","type":"Common Stock"}}"#)
    }));
    results.push(r#"{"symbol":"KBE","description":"SPDR S&P BANK ETF","type":"ETF"}"#.to_owned());
    format!(r#"{{"count":{},"result":[{}]}}"#, results.len(), results.join(","))
}

#[tokio::test]
async fn when_searching_only_stocks_and_etfs_are_offered() {
    // Given: Results mixing preferred shares, common stock and an ETF
    let (relay, _) = client(
        CannedHttpClient::default().route("search", Ok(HttpResponse::ok_json(search_body(2)))),
    );

    // When: The query runs
    let matches = relay.search("bank of").await.expect("search succeeds");

    // Then: Preferred shares are dropped and provider order is kept
    let symbols = matches
        .iter()
        .map(|hit| hit.symbol.as_str().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(symbols, vec!["BAC.WS", "BK0", "BK1", "KBE"]);
    assert_eq!(matches[3].kind, "ETF");
}

#[tokio::test]
async fn when_search_hits_start_with_digits_they_are_kept() {
    // Given: Listings whose tickers begin with a digit
    let body = r#"{"count":3,"result":[
        {"symbol":"0700.HK","description":"TENCENT HOLDINGS LTD","type":"Common Stock"},
        {"symbol":"3M.F","description":"3M CO","type":"Common Stock"},
        {"symbol":"AAPL","description":"APPLE INC","type":"Common Stock"}
    ]}"#;
    let (relay, _) =
        client(CannedHttpClient::default().route("search", Ok(HttpResponse::ok_json(body))));

    // When: The query runs
    let matches = relay.search("tencent").await.expect("search succeeds");

    // Then: Every hit survives in provider order
    let symbols = matches
        .iter()
        .map(|hit| hit.symbol.as_str().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(symbols, vec!["0700.HK", "3M.F", "AAPL"]);
}

#[tokio::test]
async fn when_search_has_many_hits_results_are_capped() {
    // Given: Far more matching hits than can be shown
    let (relay, _) = client(
        CannedHttpClient::default().route("search", Ok(HttpResponse::ok_json(search_body(25)))),
    );

    // When: The query runs
    let matches = relay.search("bank").await.expect("search succeeds");

    // Then: Only the first ten survive
    assert_eq!(matches.len(), SEARCH_LIMIT);
    assert_eq!(matches[0].symbol.as_str(), "BAC.WS");
}

#[tokio::test]
async fn when_query_is_blank_no_request_is_made() {
    // Given: A client with no routes at all
    let (relay, http) = client(CannedHttpClient::default());

    // When: A whitespace query runs
    let matches = relay.search("   ").await.expect("blank search succeeds");

    // Then: Nothing is returned and nothing is sent
    assert!(matches.is_empty());
    assert!(http.seen().is_empty());
}

#[tokio::test]
async fn when_typing_quickly_only_the_last_query_reaches_the_relay() {
    // Given: A debounced search over a canned relay
    let (relay, http) = client(
        CannedHttpClient::default().route("search", Ok(HttpResponse::ok_json(search_body(0)))),
    );
    let search = SymbolSearch::new(relay, Duration::from_millis(40));

    // When: Two queries are typed within the quiet period
    let (first, second) = tokio::join!(search.query("ba"), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        search.query("bank").await
    });

    // Then: The first is superseded and only the second is sent
    assert_eq!(first.expect("no error"), None);
    assert!(second.expect("no error").is_some());
    let seen = http.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].ends_with("search?q=bank"));
}
