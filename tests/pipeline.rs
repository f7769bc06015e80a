mod common;

use common::{profile_page, test_service, Route, TestServer};
use faceit_card_bot::error::FetchError;
use faceit_card_bot::Registration;
use resvg::tiny_skia::Pixmap;

async fn server_with_player(name: &str) -> TestServer {
    let server = TestServer::start().await;
    server.route(
        &format!("/stats/{name}/cs2"),
        Route::html(profile_page(name, "", "img/flag.png", "/img/level.svg")),
    );
    server
}

fn rgb_at(pixmap: &Pixmap, x: u32, y: u32) -> (u8, u8, u8) {
    let pixel = pixmap.pixel(x, y).unwrap();
    (pixel.red(), pixel.green(), pixel.blue())
}

fn is_blue((r, g, b): (u8, u8, u8)) -> bool {
    r < 8 && g < 8 && b > 247
}

#[tokio::test]
async fn test_player_stats_from_served_page() {
    let server = server_with_player("ropz").await;
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    let stats = service.player_stats("ropz").await.unwrap().unwrap();

    assert_eq!(stats.name, "ropz");
    assert_eq!(stats.elo, "2 810");
    assert_eq!(stats.avatar_url, None);
    assert_eq!(stats.flag_url, Some(format!("{}/img/flag.png", server.url())));
    assert_eq!(stats.level_url, Some(format!("{}/img/level.svg", server.url())));
    assert_eq!(stats.view1_stats[0].main_value.as_deref(), Some("0.94"));
    assert_eq!(stats.view2_stats[0].title.as_deref(), Some("Winrate"));
}

#[tokio::test]
async fn test_unknown_player_is_not_found() {
    let server = TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    assert!(service.player_stats("ghost").await.unwrap().is_none());
}

#[tokio::test]
async fn test_page_without_stats_is_not_found() {
    let server = TestServer::start().await;
    server.route("/stats/empty/cs2", Route::html("<html><body>no such player</body></html>"));
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    assert!(service.player_stats("empty").await.unwrap().is_none());
}

#[tokio::test]
async fn test_server_error_is_reported() {
    let server = TestServer::start().await;
    server.route("/stats/down/cs2", Route::status(503));
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    let err = service.player_stats("down").await.unwrap_err();
    assert!(matches!(
        err,
        FetchError::UnexpectedStatus { status, .. } if status.as_u16() == 503
    ));
}

#[tokio::test]
async fn test_register_unknown_nickname_stores_nothing() {
    let server = TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    let outcome = service.register(42, "ghost").await.unwrap();

    assert!(matches!(outcome, Registration::NotFound));
    assert!(service.storage().registration(42).unwrap().is_none());
    assert_eq!(service.resolve_nickname(42, "").await, None);
}

#[tokio::test]
async fn test_register_twice_keeps_latest_nickname() {
    let server = server_with_player("ropz").await;
    server.route(
        "/stats/ZywOo/cs2",
        Route::html(profile_page("ZywOo", "", "", "")),
    );
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    let first = service.register(42, "ropz").await.unwrap();
    assert!(matches!(first, Registration::Registered(ref stats) if stats.name == "ropz"));
    let registered_at = service.storage().registration(42).unwrap().unwrap().registered_at;

    let second = service.register(42, "ZywOo").await.unwrap();
    assert!(matches!(second, Registration::Registered(_)));

    let row = service.storage().registration(42).unwrap().unwrap();
    assert_eq!(row.faceit_nickname, "ZywOo");
    assert!(row.registered_at >= registered_at);
    assert_eq!(service.storage().count_registrations(42).unwrap(), 1);
}

#[tokio::test]
async fn test_resolve_nickname_prefers_argument() {
    let server = server_with_player("ropz").await;
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);
    service.register(7, "ropz").await.unwrap();

    assert_eq!(service.resolve_nickname(7, "   ").await.as_deref(), Some("ropz"));
    assert_eq!(service.resolve_nickname(7, " s1mple extra").await.as_deref(), Some("s1mple"));
    assert_eq!(service.resolve_nickname(8, "").await, None);
}

#[tokio::test]
async fn test_card_composites_served_images() {
    let server = TestServer::start().await;
    let avatar = format!("{}/avatars/ropz.png", server.url());
    server.route(
        "/stats/ropz/cs2",
        Route::html(profile_page("ropz", &avatar, "/img/flag.png", "/img/level.svg")),
    );
    server.route(
        "/avatars/ropz.png",
        Route::bytes("image/png", common::png_bytes([0, 0, 255, 255])),
    );
    server.route(
        "/img/flag.png",
        Route::bytes("image/png", common::png_bytes([0, 0, 255, 255])),
    );
    server.route(
        "/img/level.svg",
        Route::bytes("image/svg+xml", common::BLUE_SVG.as_bytes().to_vec()),
    );
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);
    let stats = service.player_stats("ropz").await.unwrap().unwrap();

    let renderer = faceit_card_bot::CardRenderer::new(common::http_client(), "fonts");
    let card = renderer.render(&stats).await.unwrap();

    assert!(is_blue(rgb_at(&card, 125, 125)));
    assert!(is_blue(rgb_at(&card, 250, 77)));
    assert!(is_blue(rgb_at(&card, 255, 145)));
    // outside the avatar circle, inside its square
    assert_eq!(rgb_at(&card, 52, 52), (30, 30, 30));
}

#[tokio::test]
async fn test_card_uses_placeholders_for_missing_images() {
    let server = server_with_player("ropz").await;
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);
    let stats = service.player_stats("ropz").await.unwrap().unwrap();

    let renderer = faceit_card_bot::CardRenderer::new(common::http_client(), "fonts");
    let card = renderer.render(&stats).await.unwrap();

    // no avatar on the page, flag and level answer 404
    assert_eq!(rgb_at(&card, 55, 55), (100, 100, 100));
    assert_eq!(rgb_at(&card, 275, 95), (200, 100, 100));
    assert_eq!(rgb_at(&card, 260, 150), (100, 200, 100));

    if renderer.font_faces() > 0 {
        let name_pixels = (55..100)
            .flat_map(|y| (295..600).map(move |x| (x, y)))
            .filter(|&(x, y)| rgb_at(&card, x, y) != (30, 30, 30))
            .count();
        assert!(name_pixels > 100, "player name was not drawn");
    }

    let png = service.card(&stats).await.unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn test_player_card_outcomes() {
    let server = server_with_player("ropz").await;
    server.route("/stats/down/cs2", Route::status(500));
    let dir = tempfile::tempdir().unwrap();
    let service = test_service(&server, &dir);

    let (stats, png) = service.player_card("ropz").await.unwrap().unwrap();
    assert_eq!(stats.name, "ropz");
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

    assert!(service.player_card("ghost").await.unwrap().is_none());
    assert!(matches!(
        service.player_card("down").await.unwrap_err(),
        faceit_card_bot::Error::Fetch(_)
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_unreachable_store_is_reported_not_raised() {
    let server = server_with_player("ropz").await;
    let http = common::http_client();
    let service = faceit_card_bot::CardService::new(
        faceit_card_bot::StatsClient::with_client(http.clone()).with_base_url(server.url()),
        faceit_card_bot::Storage::new("/nonexistent/dir/bot.sqlite3"),
        faceit_card_bot::CardRenderer::new(http, "fonts"),
    );

    assert_eq!(service.resolve_nickname(42, "").await, None);
    let outcome = service.register(42, "ropz").await.unwrap();
    assert!(matches!(outcome, Registration::StorageFailed(_)));
}
