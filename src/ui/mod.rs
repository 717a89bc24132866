pub mod auth;
pub mod dashboard;
pub mod grid;
pub mod modal;
pub mod search;
pub mod widgets;

pub use auth::render_auth_view;
pub use dashboard::render_dashboard_view;
pub use grid::render_media_grid;
pub use search::render_search_view;
