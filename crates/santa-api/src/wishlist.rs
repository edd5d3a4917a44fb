use axum::{
    Extension, Form,
    extract::State,
    response::{Html, Redirect},
};

use santa_db::RecipientWishlist;
use santa_types::api::WishlistForm;
use santa_types::{Participant, Wishlist};

use crate::error::AppError;
use crate::{AppState, blocking, pages};

pub async fn edit_wishlist(
    State(state): State<AppState>,
    Extension(participant): Extension<Participant>,
) -> Result<Html<String>, AppError> {
    let st = state.clone();
    let who = participant.clone();
    let current = blocking(move || Ok(st.exchange.wishlist(&who)?)).await?;
    Ok(pages::wishlist_form(&participant, current.as_ref()))
}

pub async fn save_wishlist(
    State(state): State<AppState>,
    Extension(participant): Extension<Participant>,
    Form(form): Form<WishlistForm>,
) -> Result<Redirect, AppError> {
    let wishlist = Wishlist::from(form);
    blocking(move || Ok(state.exchange.save_wishlist(&participant, &wishlist)?)).await?;
    Ok(Redirect::to("/options"))
}

/// The wishlist of whoever the participant gives to.
pub async fn recipient_wishlist(
    State(state): State<AppState>,
    Extension(participant): Extension<Participant>,
) -> Result<Html<String>, AppError> {
    let lookup = blocking(move || Ok(state.exchange.recipient_wishlist(&participant)?)).await?;

    Ok(match lookup {
        RecipientWishlist::NoRecipient => {
            pages::message("You have not been assigned a secret friend yet.")
        }
        RecipientWishlist::NotSubmitted(recipient) => pages::message(&format!(
            "Your secret friend ({}) has not created a wishlist yet.",
            recipient.display_name()
        )),
        RecipientWishlist::Ready(recipient, wishlist) => {
            pages::recipient_wishlist(&recipient, &wishlist)
        }
    })
}
