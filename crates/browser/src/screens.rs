//! The four pages that embed a search box, and the search area each one mounts.

use anyhow::bail;
use catalog::Catalog;
use core_types::config::{AppConfig, ScreenConfig};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use typeahead::{DocumentEvents, Navigator, RegionId, TypeaheadController, TypeaheadSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    SearchResults,
    MovieDetails,
    CastDetails,
}

impl Screen {
    pub const ALL: [Screen; 4] = [
        Screen::Home,
        Screen::SearchResults,
        Screen::MovieDetails,
        Screen::CastDetails,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::SearchResults => "search_results",
            Screen::MovieDetails => "movie_details",
            Screen::CastDetails => "cast_details",
        }
    }

    /// The region that counts as "inside" this screen's search area.
    pub const fn search_region(self) -> RegionId {
        RegionId(match self {
            Screen::Home => 100,
            Screen::SearchResults => 200,
            Screen::MovieDetails => 300,
            Screen::CastDetails => 400,
        })
    }

    pub fn config(self, cfg: &AppConfig) -> ScreenConfig {
        let screens = &cfg.screens;
        match self {
            Screen::Home => screens.home,
            Screen::SearchResults => screens.search_results,
            Screen::MovieDetails => screens.movie_details,
            Screen::CastDetails => screens.cast_details,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Screen {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        match Screen::ALL.into_iter().find(|screen| screen.name() == wanted) {
            Some(screen) => Ok(screen),
            None => bail!(
                "unknown screen '{s}' (expected home, search_results, movie_details or cast_details)"
            ),
        }
    }
}

/// Controller settings for one screen: shared typeahead tuning plus its commit policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenProfile {
    pub screen: Screen,
    pub settings: TypeaheadSettings,
}

impl ScreenProfile {
    pub fn from_config(screen: Screen, cfg: &AppConfig) -> Self {
        Self {
            screen,
            settings: TypeaheadSettings::from_config(&cfg.typeahead, &screen.config(cfg)),
        }
    }
}

/// A mounted search box. Dropping it unmounts the controller.
pub struct SearchArea<C, N> {
    screen: Screen,
    controller: TypeaheadController<C, N>,
}

impl<C, N> SearchArea<C, N>
where
    C: Catalog,
    N: Navigator,
{
    pub fn mount(
        profile: &ScreenProfile,
        catalog: Arc<C>,
        navigator: N,
        events: &DocumentEvents,
    ) -> Self {
        let controller = TypeaheadController::mount(
            catalog,
            navigator,
            events,
            profile.screen.search_region(),
            profile.settings.clone(),
        );
        tracing::debug!(screen = %profile.screen, "search area ready");
        Self {
            screen: profile.screen,
            controller,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn controller(&self) -> &TypeaheadController<C, N> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TypeaheadController<C, N> {
        &mut self.controller
    }
}
