//! Server-rendered pages.
//!
//! Every page is a dioxus component wrapped in [`Layout`] and turned into an HTML
//! string with `dioxus-ssr`; nothing here runs in the browser.

use axum::response::Html;
use dioxus::prelude::*;
use store::Identity;
use url::form_urlencoded;

mod entry_form;
pub use entry_form::{EntryFormPage, EntryFormValues};

mod error;
pub use error::ErrorPage;

mod home;
pub use home::{About, Index};

mod listing;
pub use listing::{Listing, ListingPage};

mod login;
pub use login::LoginPage;

mod profile;
pub use profile::ProfilePage;

/// Message shown for every refused login.
pub const LOGIN_FAILED: &str = "Unable to log in.";

/// What every page needs to know about the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContext {
    pub identity: Option<Identity>,
    pub csrf: String,
}

/// Render a page element into a full HTML document.
///
/// The root `<html>` element is written here; `dioxus_elements` has no tag for it.
pub fn render(page: Element) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html><html lang=\"en\">{}</html>",
        dioxus_ssr::render_element(page)
    ))
}

pub fn error_page(message: &str) -> Html<String> {
    let message = message.to_string();
    render(rsx! {
        ErrorPage { message }
    })
}

/// Link to a listing page, keeping the tag filter.
pub fn listing_href(base: &str, page: u64, tag: Option<&str>) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    if let Some(tag) = tag {
        query.append_pair("tag", tag);
    }
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }
    let query = query.finish();
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

#[component]
pub fn Layout(heading: String, context: PageContext, children: Element) -> Element {
    let signed_in = context.identity.is_some();
    let display_name = context
        .identity
        .as_ref()
        .map(|i| i.display_name.clone())
        .unwrap_or_default();
    let csrf = context.csrf;

    rsx! {
        head {
            meta { charset: "utf-8" }
            title { "{heading} · Logbook" }
        }
        body {
            nav {
                a { href: "/", "Logbook" }
                " · "
                a { href: "/about", "About" }
                " · "
                if signed_in {
                    a { href: "/logbook", "My logbook" }
                    " · "
                    a { href: "/logbook/add", "Add entry" }
                    form { method: "post", action: "/logout", class: "logout",
                        input { r#type: "hidden", name: "csrf", value: "{csrf}" }
                        button { r#type: "submit", "Log out {display_name}" }
                    }
                } else {
                    a { href: "/login", "Log in" }
                }
            }
            main {
                h1 { "{heading}" }
                {children}
            }
        }
    }
}
