pub mod api;
pub mod auth;

pub use api::{add_list_items, current_user_slug, fetch_lists, resolve_ids};
pub use auth::{exchange_code, TokenResponse};
