use std::sync::{Arc, Mutex};

use chatledger_core::{CellRange, CoreError, TabularStore};
use chatledger_domain::CellValue;
use chatledger_sheets::{RetryPolicy, SheetsClient};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Minimal HTTP responder: answers each connection with the next canned response
/// and records the request line and body it received.
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    tokio::spawn(async move {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut stream).await;
            log.lock().expect("log").push(request);
            let reply = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(reply.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });
    (format!("http://{addr}/v4/"), seen)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let Ok(read) = stream.read(&mut buf).await else {
            break;
        };
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        let text = String::from_utf8_lossy(&data).to_string();
        if let Some(split) = text.find("\r\n\r\n") {
            let head = &text[..split];
            let length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= split + 4 + length {
                let request_line = head.lines().next().unwrap_or_default().to_string();
                let body = &text[split + 4..];
                return format!("{request_line}\n{body}");
            }
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
    }
}

#[tokio::test]
async fn lists_sheet_titles_in_order() {
    let (base, seen) = serve(vec![(
        200,
        r#"{"sheets":[{"properties":{"title":"OCTUBRE 2026"}},{"properties":{"title":"GASTOS OCT 26"}}]}"#,
    )])
    .await;
    let client = SheetsClient::new(&base, "book", Some("token".into())).expect("client");

    let names = client.list_sheet_names().await.expect("list");

    assert_eq!(names, vec!["OCTUBRE 2026", "GASTOS OCT 26"]);
    let requests = seen.lock().expect("log");
    assert!(requests[0].starts_with("GET /v4/spreadsheets/book?fields=sheets.properties.title"));
}

#[tokio::test]
async fn read_retries_server_errors() {
    let (base, seen) = serve(vec![
        (503, r#"{"error":"busy"}"#),
        (200, r#"{"range":"'ING-EGR OCT 26'!A37:B1000","values":[["Renta",9000]]}"#),
    ])
    .await;
    let client = SheetsClient::new(&base, "book", None)
        .expect("client")
        .with_retry_policy(fast_retry());
    let range = CellRange::new(1, 37, 2, 1000).expect("range");

    let grid = client.read_range("ING-EGR OCT 26", &range).await.expect("read");

    assert_eq!(
        grid,
        vec![vec![CellValue::Text("Renta".into()), CellValue::Number(9000.0)]]
    );
    let requests = seen.lock().expect("log");
    assert_eq!(requests.len(), 2);
    assert!(requests[1].contains("/values/'ING-EGR%20OCT%2026'!A37:B1000?"));
}

#[tokio::test]
async fn append_is_sent_once() {
    let (base, seen) = serve(vec![(503, "{}"), (200, "{}")]).await;
    let client = SheetsClient::new(&base, "book", None)
        .expect("client")
        .with_retry_policy(fast_retry());

    let err = client
        .append_row("GASTOS OCT 26", vec!["19/10/2026".into(), "comida".into(), 250.0.into()])
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Backend(_)));
    let requests = seen.lock().expect("log");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("POST /v4/spreadsheets/book/values/'GASTOS%20OCT%2026'!A1:append?"));
    assert!(requests[0].contains(r#""values":[["19/10/2026","comida",250.0]]"#));
}

#[tokio::test]
async fn update_sends_user_entered_values() {
    let (base, seen) = serve(vec![(200, "{}")]).await;
    let client = SheetsClient::new(&base, "book", None).expect("client");
    let range = CellRange::row_span(3, 11, 11).expect("range");

    client
        .update_range("OCTUBRE 2026", &range, vec![vec![CellValue::Number(3500.0)]])
        .await
        .expect("update");

    let requests = seen.lock().expect("log");
    assert!(requests[0].starts_with(
        "PUT /v4/spreadsheets/book/values/'OCTUBRE%202026'!K3:K3?valueInputOption=USER_ENTERED"
    ));
}

#[tokio::test]
async fn rejected_token_fails_verification() {
    let (base, _seen) = serve(vec![(401, r#"{"error":"unauthenticated"}"#)]).await;
    let client = SheetsClient::new(&base, "book", Some("stale".into())).expect("client");

    let err = client.verify_access().await.unwrap_err();

    assert_eq!(err.to_string(), "Access token rejected (HTTP 401)");
}

#[tokio::test]
async fn reads_values_as_displayed() {
    let (base, seen) = serve(vec![(
        200,
        r#"{"range":"'OCTUBRE 2026'!A1:L10000","values":[["Folio"],["","19/10/2026","Ana","","","50%"]]}"#,
    )])
    .await;
    let client = SheetsClient::new(&base, "book", None).expect("client");
    let range = CellRange::new(1, 1, 12, 10_000).expect("range");

    let grid = client.read_range("OCTUBRE 2026", &range).await.expect("read");

    assert_eq!(grid[1][5], CellValue::Text("50%".into()));
    let requests = seen.lock().expect("log");
    assert!(requests[0].contains("valueRenderOption=FORMATTED_VALUE"));
}
