//! Integration tests for the media streaming route.

mod common;

use common::{TestHarness, MIB};

fn video_bytes() -> Vec<u8> {
    (0..(2 * MIB + 100)).map(|i| (i % 251) as u8).collect()
}

async fn stream_url(h: &TestHarness, addr: std::net::SocketAddr) -> String {
    let id = h.service().list(None).unwrap()[0].id;
    format!("http://{addr}/media/{id}")
}

#[tokio::test]
async fn stream_serves_whole_file() {
    let (h, addr) = TestHarness::with_server().await;
    let data = video_bytes();
    h.add_file_with_content("talk.webm", &data);
    h.refresh();

    let resp = reqwest::get(stream_url(&h, addr).await).await.unwrap();
    assert_eq!(resp.status(), 200);
    let headers = resp.headers();
    assert_eq!(headers["content-type"], "video/webm");
    assert_eq!(headers["accept-ranges"], "bytes");
    assert_eq!(headers["content-length"], data.len().to_string().as_str());
    assert_eq!(
        headers["content-disposition"],
        "inline; filename=\"talk.webm\""
    );

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), data.as_slice());
}

#[tokio::test]
async fn stream_honors_range_requests() {
    let (h, addr) = TestHarness::with_server().await;
    let data = video_bytes();
    h.add_file_with_content("movie.mp4", &data);
    h.refresh();
    let url = stream_url(&h, addr).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(&url)
        .header("Range", "bytes=100-199")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(
        resp.headers()["content-range"],
        format!("bytes 100-199/{}", data.len()).as_str()
    );
    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &data[100..200]);

    let resp = client
        .get(&url)
        .header("Range", "bytes=-10")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), &data[data.len() - 10..]);

    let resp = client
        .get(&url)
        .header("Range", format!("bytes={}-", data.len()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(
        resp.headers()["content-range"],
        format!("bytes */{}", data.len()).as_str()
    );
}

#[tokio::test]
async fn stream_unknown_or_missing_file_is_404() {
    let (h, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/media/12345")).await.unwrap();
    assert_eq!(resp.status(), 404);

    let resp = reqwest::get(format!("http://{addr}/media/abc")).await.unwrap();
    assert_eq!(resp.status(), 400);

    // Cataloged, then removed behind the catalog's back.
    let path = h.add_file("ghost.mp4", 2 * MIB);
    h.refresh();
    let url = stream_url(&h, addr).await;
    std::fs::remove_file(path).unwrap();

    let resp = reqwest::get(url).await.unwrap();
    assert_eq!(resp.status(), 404);
}
