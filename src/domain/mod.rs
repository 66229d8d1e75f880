// Domain types and value objects
mod asset;
mod favorite;

// Re-export commonly used types to the world
pub use asset::{Asset, filter_assets};
pub use favorite::FavoriteRef;
