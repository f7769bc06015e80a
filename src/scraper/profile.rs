use itertools::Itertools;
use ::scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{PlayerStats, StatBlock, StatItem, View};
use crate::scraper::{normalize_img_url, select_text, BASE_URL};

const AVATAR_SELECTOR: &str = "img.stats_profile_avatar";
const LEVEL_IMAGE_SELECTOR: &str = "img.stats_profile_level_image";
const NAME_SELECTOR: &str = "span.stats_profile_name_span";
const ELO_SELECTOR: &str = "span.stats_profile_elo_span";
const BLOCK_SELECTOR: &str = "div.stats_totals_block_wrapper";
const BLOCK_TITLE_SELECTOR: &str = "span.stats_totals_block_title_text";
const BLOCK_MAIN_VALUE_SELECTOR: &str = "span.stats_totals_block_main_value_span";
const ITEM_TITLE_SELECTOR: &str = "span.stats_totals_block_item_title";
const ITEM_VALUE_SELECTOR: &str = "span.stats_totals_block_item_value";

/// Extract player stats from a faceitanalyser stats page.
///
/// Returns `None` when the profile name, the ELO or either stats view is
/// missing. Optional fields (images, block parts) never cause a failure.
pub fn extract(html: &str) -> Option<PlayerStats> {
    extract_with_base(html, BASE_URL)
}

/// Same as [`extract`], resolving relative flag and level image paths
/// against `base`.
pub fn extract_with_base(html: &str, base: &str) -> Option<PlayerStats> {
    let document = Html::parse_document(html);
    match parse_profile(&document, base) {
        Ok(stats) => stats,
        Err(e) => {
            warn!(error = %e, "failed to extract player stats");
            None
        }
    }
}

fn parse_profile(document: &Html, base: &str) -> Result<Option<PlayerStats>> {
    let root = document.root_element();

    let avatar_selector = Selector::parse(AVATAR_SELECTOR)?;
    let avatar_url = root
        .select(&avatar_selector)
        .next()
        .and_then(|e| e.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string);

    // The first level image is the country flag, the second one the faceit level.
    let level_selector = Selector::parse(LEVEL_IMAGE_SELECTOR)?;
    let (flag_url, level_url) = {
        let mut images = root
            .select(&level_selector)
            .take(2)
            .map(|e| {
                e.value()
                    .attr("src")
                    .filter(|src| !src.is_empty())
                    .map(|src| normalize_img_url(base, src))
            });
        (images.next().flatten(), images.next().flatten())
    };

    let name_selector = Selector::parse(NAME_SELECTOR)?;
    let Some(name) = select_text(&root, &name_selector) else {
        debug!("profile name not found");
        return Ok(None);
    };

    let elo_selector = Selector::parse(ELO_SELECTOR)?;
    let Some(elo) = select_text(&root, &elo_selector) else {
        debug!("profile elo not found");
        return Ok(None);
    };

    let Some(view1_stats) = find_view(&root, View::AllTime)? else {
        return Ok(None);
    };
    let Some(view2_stats) = find_view(&root, View::Last50)? else {
        return Ok(None);
    };

    debug!(
        name = %name,
        all_time = view1_stats.len(),
        last_50 = view2_stats.len(),
        "parsed player stats"
    );

    Ok(Some(PlayerStats {
        avatar_url,
        flag_url,
        level_url,
        name,
        elo,
        view1_stats,
        view2_stats,
    }))
}

fn find_view(root: &ElementRef, view: View) -> Result<Option<Vec<StatBlock>>> {
    let container_selector = Selector::parse(&format!("div#{}", view.container_id()))?;
    let Some(container) = root.select(&container_selector).next() else {
        debug!(container = view.container_id(), "stats view not found");
        return Ok(None);
    };

    let block_selector = Selector::parse(BLOCK_SELECTOR)?;
    container
        .select(&block_selector)
        .map(|block| parse_block(&block))
        .collect::<Result<_>>()
        .map(Some)
}

fn parse_block(block: &ElementRef) -> Result<StatBlock> {
    let title_selector = Selector::parse(BLOCK_TITLE_SELECTOR)?;
    let main_value_selector = Selector::parse(BLOCK_MAIN_VALUE_SELECTOR)?;
    let item_title_selector = Selector::parse(ITEM_TITLE_SELECTOR)?;
    let item_value_selector = Selector::parse(ITEM_VALUE_SELECTOR)?;

    // Titles and values are paired by position; a count mismatch drops the
    // unmatched tail.
    let items = block
        .select(&item_title_selector)
        .zip(block.select(&item_value_selector))
        .map(|(title, value)| StatItem {
            title: element_text(&title),
            value: element_text(&value),
        })
        .collect_vec();

    Ok(StatBlock {
        title: select_text(block, &title_selector),
        main_value: select_text(block, &main_value_selector),
        items,
    })
}

fn element_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}
