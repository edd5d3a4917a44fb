pub mod api;
pub mod models;

pub use models::{Participant, Roster, Wishlist, WISHLIST_LEN};
