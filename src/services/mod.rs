//! Business operations over the entity store: store registration, the
//! check-in code lifecycle, favorites and occupancy counts.

pub mod codes;
pub mod favorites;
pub mod occupancy;
pub mod stores;

pub use codes::{parse_token, CheckinStatus, CodeService};
pub use favorites::{FavoriteChange, FavoritesService};
pub use occupancy::OccupancyService;
pub use stores::StoreService;
