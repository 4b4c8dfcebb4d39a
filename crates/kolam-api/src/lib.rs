pub mod accounts;
pub mod artworks;
pub mod auth;
pub mod error;
pub mod gallery;
pub mod middleware;
pub mod profile;
pub mod router;

pub use accounts::AccountService;
pub use auth::{AppState, AppStateInner};
pub use error::AppError;
pub use gallery::{GalleryService, filter_by_search_term, sort_entries};
pub use router::build_router;
