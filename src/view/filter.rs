use clap::ValueEnum;
use serde::Deserialize;

/// Which classification of points is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every point
    #[default]
    All,
    /// Only points inside the bounding box
    Inside,
    /// Only points outside the bounding box
    Outside,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Inside, Filter::Outside];

    /// Selector of the button that activates this filter.
    pub fn button_selector(self) -> &'static str {
        match self {
            Filter::All => "#btn-filter-all",
            Filter::Inside => "#btn-filter-inside",
            Filter::Outside => "#btn-filter-outside",
        }
    }

    pub fn from_button(selector: &str) -> Option<Filter> {
        Self::ALL
            .into_iter()
            .find(|f| f.button_selector() == selector)
    }

    pub fn admits(self, inside: bool) -> bool {
        match self {
            Filter::All => true,
            Filter::Inside => inside,
            Filter::Outside => !inside,
        }
    }
}
