//! Fetch a player's stats and write the rendered card to `card.png`.
//!
//! Usage: `cargo run --example render_card -- <nickname> [fonts_dir]`

use faceit_card_bot::{CardRenderer, StatsClient};

#[tokio::main]
async fn main() {
    let mut args = std::env::args().skip(1);
    let nickname = args.next().unwrap_or_else(|| "s1mple".to_string());
    let fonts_dir = args.next().unwrap_or_else(|| "fonts".to_string());

    let client = StatsClient::new();
    println!("Fetching {}", client.stats_url(&nickname));
    let Some(stats) = client.get_player_stats(&nickname).await.unwrap() else {
        println!("No stats found for {nickname}");
        return;
    };
    println!("{} ({} ELO)", stats.name, stats.elo);
    for block in &stats.view1_stats {
        println!(
            "  {}: {}",
            block.title.as_deref().unwrap_or("-"),
            block.main_value.as_deref().unwrap_or("-")
        );
    }

    let renderer = CardRenderer::new(client.http().clone(), fonts_dir);
    let png = renderer.render_png(&stats).await.unwrap();
    std::fs::write("card.png", png).unwrap();
    println!("Wrote card.png");
}
