//! Application shell around the typeahead core: logging bootstrap, catalog
//! selection, per-screen search areas, routes and the landing-page preload.

pub mod bootstrap;
mod logging;
pub mod preload;
pub mod router;
pub mod screens;

pub use bootstrap::{CatalogBackend, Shell};
pub use logging::{init_tracing, init_tracing_with_config};
pub use preload::{CategoryRows, Landing, PreloadOptions, preload_categories, preload_landing};
pub use router::{Route, RouteHistory};
pub use screens::{Screen, ScreenProfile, SearchArea};
