use serde::{Deserialize, Serialize};

use crate::models::{Participant, WISHLIST_LEN, Wishlist};

// -- Session --

/// Claims carried in the signed session cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Participant,
    pub exp: usize,
}

// -- Forms --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WishlistForm {
    pub item1: String,
    pub item2: String,
    pub item3: String,
}

impl From<WishlistForm> for Wishlist {
    fn from(form: WishlistForm) -> Self {
        let items: [String; WISHLIST_LEN] = [form.item1, form.item2, form.item3];
        Wishlist::new(items)
    }
}
