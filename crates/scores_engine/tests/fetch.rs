use std::time::Duration;

use scores_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

async fn redirect(server: &MockServer, from: &str, to: &str) {
    Mock::given(method("GET"))
        .and(path(from))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", to))
        .mount(server)
        .await;
}

#[tokio::test]
async fn scoreboard_body_and_metadata_are_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cbb/boxscores/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>games</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/cbb/boxscores/?month=11&day=9&year=2021", server.uri());
    let output = fetcher(FetchSettings::default()).fetch(&url).await.expect("fetch ok");

    assert_eq!(output.bytes, b"<html>games</html>");
    assert_eq!(output.metadata.url, url);
    assert_eq!(output.metadata.status, 200);
    assert!(!output.metadata.redirected());
    assert_eq!(
        output.metadata.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn browser_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("user-agent", "score-scraper-test/1.0"))
        .and(header("accept-language", "en-US,en;q=0.8"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = FetchSettings {
        user_agent: "score-scraper-test/1.0".to_string(),
        ..FetchSettings::default()
    };
    fetcher(settings)
        .fetch(&format!("{}/cbb/boxscores/", server.uri()))
        .await
        .expect("fetch ok");
}

#[tokio::test]
async fn redirects_are_followed_and_recorded() {
    let server = MockServer::start().await;
    redirect(&server, "/cbb/boxscores/index.cgi", "/cbb/boxscores/").await;
    Mock::given(method("GET"))
        .and(path("/cbb/boxscores/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let output = fetcher(FetchSettings::default())
        .fetch(&format!("{}/cbb/boxscores/index.cgi", server.uri()))
        .await
        .expect("fetch ok");
    assert!(output.metadata.redirected());
    assert!(output.metadata.final_url.ends_with("/cbb/boxscores/"));
}

#[tokio::test]
async fn redirect_chain_over_limit_fails() {
    let server = MockServer::start().await;
    redirect(&server, "/a", "/b").await;
    redirect(&server, "/b", "/c").await;
    redirect(&server, "/c", "/d").await;
    redirect(&server, "/d", "/e").await;

    let settings = FetchSettings {
        redirect_limit: 2,
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/a", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn error_statuses_are_reported_with_their_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/busy"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let fetcher = fetcher(FetchSettings::default());
    let missing = fetcher.fetch(&format!("{}/missing", server.uri())).await.unwrap_err();
    assert_eq!(missing.kind, FailureKind::HttpStatus(404));
    let busy = fetcher.fetch(&format!("{}/busy", server.uri())).await.unwrap_err();
    assert_eq!(busy.kind, FailureKind::HttpStatus(429));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/cbb/boxscores/", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn json_error_page_is_not_treated_as_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let err = fetcher(FetchSettings::default())
        .fetch(&format!("{}/cbb/boxscores/", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>12345</html>", "text/html"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/cbb/boxscores/", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: 18
        }
    );
}

#[tokio::test]
async fn malformed_url_fails_before_any_request() {
    let err = fetcher(FetchSettings::default())
        .fetch("not a url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
