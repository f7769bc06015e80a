use serde::Serialize;

/// Everything the player card shows, scraped from a faceitanalyser stats page.
///
/// A value of this type only exists when the name, the ELO and both stat
/// views were found on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub avatar_url: Option<String>,
    pub flag_url: Option<String>,
    pub level_url: Option<String>,
    pub name: String,
    pub elo: String,
    /// All-time totals.
    pub view1_stats: Vec<StatBlock>,
    /// Totals over the last 50 matches.
    pub view2_stats: Vec<StatBlock>,
}

impl PlayerStats {
    pub fn view(&self, view: View) -> &[StatBlock] {
        match view {
            View::AllTime => &self.view1_stats,
            View::Last50 => &self.view2_stats,
        }
    }
}

/// One titled statistics table, e.g. "Winrate" with its secondary metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatBlock {
    pub title: Option<String>,
    pub main_value: Option<String>,
    pub items: Vec<StatItem>,
}

/// A secondary metric row inside a [`StatBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatItem {
    pub title: String,
    pub value: String,
}

/// The two statistic time windows shown on a stats page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum_macros::EnumIter)]
pub enum View {
    AllTime,
    Last50,
}

impl View {
    /// Element id of the container holding this view on the stats page.
    pub fn container_id(self) -> &'static str {
        match self {
            View::AllTime => "view1_stats",
            View::Last50 => "view2_stats",
        }
    }

    /// Section heading drawn on the card.
    pub fn heading(self) -> &'static str {
        match self {
            View::AllTime => "Статистика за всё время",
            View::Last50 => "Статистика за последние 50 матчей",
        }
    }
}
