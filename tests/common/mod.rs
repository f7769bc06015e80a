use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use faceit_card_bot::{CardRenderer, CardService, StatsClient, Storage};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Canned HTTP response.
#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Route {
    pub fn html(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body: body.into().into_bytes(),
        }
    }

    #[allow(dead_code)]
    pub fn bytes(content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: b"nope".to_vec(),
        }
    }
}

/// Minimal HTTP/1.1 server on localhost answering by request path.
/// Unknown paths get a 404.
pub struct TestServer {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, Route>>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes: Arc<Mutex<HashMap<String, Route>>> = Arc::default();

        let shared = routes.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(respond(stream, shared.clone()));
            }
        });

        Self { base_url, routes }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().unwrap().insert(path.to_string(), route);
    }
}

async fn respond(mut stream: TcpStream, routes: Arc<Mutex<HashMap<String, Route>>>) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&chunk[..n]),
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/");
    let route = routes
        .lock()
        .unwrap()
        .get(path)
        .cloned()
        .unwrap_or_else(|| Route::status(404));

    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        _ => "Error",
    };
    let head = format!(
        "HTTP/1.1 {} {reason}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        route.status,
        route.content_type,
        route.body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&route.body).await;
    let _ = stream.shutdown().await;
}

/// HTTP client that never goes through a proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Service wired to `server` and a fresh database inside `dir`.
pub fn test_service(server: &TestServer, dir: &tempfile::TempDir) -> CardService {
    let http = http_client();
    let client = StatsClient::with_client(http.clone()).with_base_url(server.url());
    let storage = Storage::new(dir.path().join("bot.sqlite3"));
    storage.init_schema().unwrap();
    CardService::new(client, storage, CardRenderer::new(http, "fonts"))
}

/// Stats page in the faceitanalyser layout. Image paths are taken as-is.
pub fn profile_page(name: &str, avatar: &str, flag: &str, level: &str) -> String {
    format!(
        r#"<html><body>
          <img class="stats_profile_avatar" src="{avatar}">
          <img class="stats_profile_level_image" src="{flag}">
          <img class="stats_profile_level_image" src="{level}">
          <span class="stats_profile_name_span">{name}</span>
          <span class="stats_profile_elo_span">2 810</span>
          <div id="view1_stats">
            <div class="stats_totals_block_wrapper">
              <span class="stats_totals_block_title_text">Avg. KDR</span>
              <span class="stats_totals_block_main_value_span">0.94</span>
              <span class="stats_totals_block_item_title">Kills</span>
              <span class="stats_totals_block_item_value">15 230</span>
            </div>
          </div>
          <div id="view2_stats">
            <div class="stats_totals_block_wrapper">
              <span class="stats_totals_block_title_text">Winrate</span>
              <span class="stats_totals_block_main_value_span">52</span>
            </div>
          </div>
        </body></html>"#
    )
}

#[allow(dead_code)]
pub fn png_bytes(rgba: [u8; 4]) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(16, 16, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[allow(dead_code)]
pub const BLUE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
  <rect width="10" height="10" fill="#0000ff"/>
</svg>"##;
