// tests/common/mod.rs
// Minimal HTTP/1.1 stub: answers every request with one canned response.
#![allow(dead_code)]

use content_aggregator::{ContentItem, SourceKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub struct StubServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<String>>,
}

impl StubServer {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request line + headers of the most recent request, lowercased.
    pub fn last_request(&self) -> String {
        self.last_request.lock().unwrap().to_lowercase()
    }
}

pub async fn serve(status: u16, body: &'static str) -> StubServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let last_request = Arc::new(Mutex::new(String::new()));

    let (h, l) = (hits.clone(), last_request.clone());
    tokio::spawn(async move {
        while let Ok((mut sock, _)) = listener.accept().await {
            let l = l.clone();
            let h = h.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let mut req = Vec::new();
                loop {
                    let n = sock.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    req.extend_from_slice(&buf[..n]);
                    if req.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                *l.lock().unwrap() = String::from_utf8_lossy(&req).into_owned();
                h.fetch_add(1, Ordering::SeqCst);
                let resp = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = sock.write_all(resp.as_bytes()).await;
                let _ = sock.shutdown().await;
            });
        }
    });

    StubServer {
        base_url: format!("http://{addr}"),
        hits,
        last_request,
    }
}

pub fn item(id: &str, source: SourceKind, date: &str) -> ContentItem {
    ContentItem {
        id: id.into(),
        title: id.into(),
        description: "d".into(),
        category: "c".into(),
        author: "a".into(),
        date: date.into(),
        read_time: 1,
        tags: vec![],
        image_url: "i".into(),
        is_favorite: false,
        is_read: false,
        source,
        source_data: None,
        url: None,
        rating: None,
    }
}

/// Every populated-field guarantee a `ContentItem` must satisfy.
pub fn assert_well_formed(it: &ContentItem) {
    assert!(!it.id.is_empty(), "empty id");
    assert!(!it.title.trim().is_empty(), "empty title on {}", it.id);
    assert!(!it.description.trim().is_empty(), "empty description on {}", it.id);
    assert!(!it.image_url.trim().is_empty(), "empty image on {}", it.id);
    assert!(!it.category.trim().is_empty(), "empty category on {}", it.id);
    assert!(!it.author.trim().is_empty(), "empty author on {}", it.id);
    assert!(it.published_at().is_some(), "bad date on {}", it.id);
    if let Some(d) = &it.source_data {
        assert_eq!(d.kind(), it.source, "source/sourceData mismatch on {}", it.id);
    }
}
