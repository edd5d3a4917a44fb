//! HTML pages for the exchange.

use axum::response::Html;
use html_escape::{encode_double_quoted_attribute, encode_text};

use santa_db::Status;
use santa_types::{Participant, Wishlist};

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{} · Secret Santa</title></head>\n<body>\n{}\n</body>\n</html>\n",
        encode_text(title),
        body
    ))
}

pub fn login(error: Option<&str>) -> Html<String> {
    let error = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", encode_text(e)))
        .unwrap_or_default();
    layout(
        "Log in",
        &format!(
            "<h1>Secret Santa</h1>\n{}<form method=\"post\" action=\"/\">\n\
             <label>Your name <input name=\"name\" required autofocus></label>\n\
             <button type=\"submit\">Enter</button>\n</form>",
            error
        ),
    )
}

pub fn wishlist_form(participant: &Participant, current: Option<&Wishlist>) -> Html<String> {
    let blank = Wishlist::default();
    let items = current.unwrap_or(&blank).items();
    let fields: String = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            format!(
                "<label>Wish {n} <input name=\"item{n}\" value=\"{v}\"></label><br>\n",
                n = i + 1,
                v = encode_double_quoted_attribute(item)
            )
        })
        .collect();
    layout(
        "Wishlist",
        &format!(
            "<h1>{}'s wishlist</h1>\n<form method=\"post\" action=\"/wishlist\">\n{}\
             <button type=\"submit\">Save</button>\n</form>",
            encode_text(&participant.display_name()),
            fields
        ),
    )
}

pub fn options(participant: &Participant, status: &Status) -> Html<String> {
    let draw = match &status.recipient {
        Some(recipient) => format!(
            "<p>You give a gift to <strong>{}</strong>.</p>\n\
             <p><a href=\"/recipient/wishlist\">See their wishlist</a></p>",
            encode_text(&recipient.display_name())
        ),
        None => "<form method=\"post\" action=\"/assign\">\n\
                 <button type=\"submit\">Draw my secret friend</button>\n</form>"
            .to_string(),
    };
    layout(
        "Options",
        &format!(
            "<h1>Hello, {}</h1>\n{}\n<p><a href=\"/wishlist\">{} my wishlist</a></p>\n\
             <p><a href=\"/logout\">Log out</a></p>",
            encode_text(&participant.display_name()),
            draw,
            if status.has_wishlist { "Edit" } else { "Create" }
        ),
    )
}

pub fn assigned(participant: &Participant, recipient: &Participant) -> Html<String> {
    layout(
        "Your secret friend",
        &format!(
            "<h1>{}, your secret friend is <strong>{}</strong></h1>\n\
             <p><a href=\"/recipient/wishlist\">See their wishlist</a></p>\n\
             <p><a href=\"/options\">Back</a></p>",
            encode_text(&participant.display_name()),
            encode_text(&recipient.display_name())
        ),
    )
}

pub fn recipient_wishlist(recipient: &Participant, wishlist: &Wishlist) -> Html<String> {
    let items: String = wishlist
        .items()
        .iter()
        .map(|item| format!("<li>{}</li>\n", encode_text(item)))
        .collect();
    layout(
        "Their wishlist",
        &format!(
            "<h1>{}'s wishlist</h1>\n<ol>\n{}</ol>\n<p><a href=\"/options\">Back</a></p>",
            encode_text(&recipient.display_name()),
            items
        ),
    )
}

pub fn message(text: &str) -> Html<String> {
    layout(
        "Notice",
        &format!(
            "<p>{}</p>\n<p><a href=\"/options\">Back</a></p>",
            encode_text(text)
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wishlist_form_prefills_and_escapes() {
        let ana = Participant::parse("ana").unwrap();
        let wishlist = Wishlist::new(["<script>".into(), "socks".into(), "".into()]);
        let Html(page) = wishlist_form(&ana, Some(&wishlist));
        assert!(page.contains("Ana's wishlist"));
        assert!(page.contains("name=\"item1\" value=\"&lt;script&gt;\""));
        assert!(page.contains("name=\"item3\" value=\"\""));
    }

    #[test]
    fn attribute_values_cannot_break_out() {
        let ana = Participant::parse("ana").unwrap();
        let wishlist = Wishlist::new(["say \"hi\" & bye".into(), "".into(), "".into()]);
        let Html(page) = wishlist_form(&ana, Some(&wishlist));
        assert!(page.contains("value=\"say &quot;hi&quot; &amp; bye\""));
    }

    #[test]
    fn message_text_is_encoded() {
        let Html(page) = message("<b>5 > 3</b>");
        assert!(page.contains("<p>&lt;b&gt;5 &gt; 3&lt;/b&gt;</p>"));
    }
}
