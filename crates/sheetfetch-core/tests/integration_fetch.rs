//! Integration test: local HTTP server, curl transport and the full fetch job.

mod common;

use common::image_server::Reply;
use sheetfetch_core::config::FetchConfig;
use sheetfetch_core::fetch::{run_fetch, FetchEvent};
use sheetfetch_core::sheet::{ColumnRange, ColumnSelector};
use sheetfetch_core::transport::{CurlTransport, FetchError, Transport};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn curl_transport_returns_body_and_sends_user_agent() {
    let body: Vec<u8> = (0u8..=255).cycle().take(10 * 1024).collect();
    let server = common::image_server::start(vec![("/a.png", 200, body.as_slice())]);
    let mut transport = CurlTransport::new(Duration::from_secs(5), "sheetfetch-test/1.0");

    let got = transport.get(&server.url("/a.png")).expect("GET");

    assert_eq!(got, body);
    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    assert_eq!(reqs[0].user_agent.as_deref(), Some("sheetfetch-test/1.0"));
}

#[test]
fn curl_transport_maps_error_status() {
    let server = common::image_server::start(vec![("/boom", 500, &b""[..])]);
    let mut transport = CurlTransport::new(Duration::from_secs(5), "ua");

    match transport.get(&server.url("/missing.png")) {
        Err(FetchError::Http(404)) => {}
        other => panic!("expected HTTP 404, got {:?}", other),
    }
    match transport.get(&server.url("/boom")) {
        Err(FetchError::Http(500)) => {}
        other => panic!("expected HTTP 500, got {:?}", other),
    }
}

#[test]
fn curl_transport_reports_connection_failure() {
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let mut transport = CurlTransport::new(Duration::from_secs(5), "ua");

    match transport.get(&format!("http://127.0.0.1:{}/x.png", port)) {
        Err(FetchError::Curl(_)) => {}
        other => panic!("expected curl error, got {:?}", other),
    }
}

#[test]
fn slow_steady_body_outlasts_the_timeout() {
    let body = b"abcdef".to_vec();
    let server = common::image_server::start_with(vec![(
        "/slow.png",
        Reply::Trickle(body.clone(), Duration::from_millis(400)),
    )]);
    let mut transport = CurlTransport::new(Duration::from_secs(1), "ua");

    // 6 bytes at 400 ms each: well past the 1 s timeout in total.
    let got = transport.get(&server.url("/slow.png")).expect("GET");

    assert_eq!(got, body);
}

#[test]
fn stalled_body_times_out() {
    let server = common::image_server::start_with(vec![(
        "/stuck.png",
        Reply::Stall(100, Duration::from_secs(5)),
    )]);
    let mut transport = CurlTransport::new(Duration::from_secs(1), "ua");

    match transport.get(&server.url("/stuck.png")) {
        Err(FetchError::Curl(e)) => assert!(e.is_operation_timedout(), "{}", e),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[test]
fn fetch_job_downloads_skips_and_gives_up() {
    let server = common::image_server::start(vec![
        ("/plants/adan.png", 200, &b"adan png"[..]),
        ("/plants/adan-2", 200, &b"adan jpg"[..]),
        ("/plants/beni.webp", 200, &b"beni webp"[..]),
    ]);
    let dir = tempdir().unwrap();
    let table = dir.path().join("images.csv");
    fs::write(
        &table,
        format!(
            "id,name,img1,img2,img3\n\
             adan,Adan,{},not-a-url,{}\n\
             ,Nameless,{},,\n\
             beni,Beni,{},{},\n",
            server.url("/plants/adan.png"),
            server.url("/plants/adan-2"),
            server.url("/plants/adan.png"),
            server.url("/plants/gone.png"),
            server.url("/plants/beni.webp"),
        ),
    )
    .unwrap();
    let out = dir.path().join("downloaded_images");
    let cfg = FetchConfig {
        table,
        id_column: ColumnSelector::Name("id".into()),
        image_columns: ColumnRange::new(2, 5),
        output_dir: out.clone(),
        max_retries: 2,
        timeout_secs: 5.0,
        delay_secs: 0.0,
        retry_delay_secs: 0.0,
        ..FetchConfig::default()
    };

    let mut gave_up = Vec::new();
    let report = run_fetch(&cfg, &mut |e| {
        if let FetchEvent::GaveUp { target, .. } = e {
            gave_up.push(target.url.clone());
        }
    })
    .unwrap();

    assert_eq!(report.records, 2);
    assert_eq!(report.saved, 3);
    assert_eq!(report.abandoned, 1);
    assert_eq!(gave_up, vec![server.url("/plants/gone.png")]);
    assert_eq!(server.hits("/plants/gone.png"), 2);
    assert_eq!(fs::read(out.join("adan_00.png")).unwrap(), b"adan png");
    assert_eq!(fs::read(out.join("adan_01.jpg")).unwrap(), b"adan jpg");
    assert!(!out.join("beni_00.png").exists());
    assert_eq!(fs::read(out.join("beni_01.webp")).unwrap(), b"beni webp");

    let before = server.requests().len();
    let again = run_fetch(&cfg, &mut |_| {}).unwrap();
    assert_eq!(again.saved, 0);
    assert_eq!(again.skipped, 3);
    assert_eq!(again.abandoned, 1);
    // Only the abandoned URL is requested again.
    assert_eq!(server.requests().len(), before + 2);
}
