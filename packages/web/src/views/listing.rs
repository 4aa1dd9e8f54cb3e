use dioxus::prelude::*;
use store::{Entry, Page, ENTRIES_PER_PAGE};
use url::Url;

use super::{listing_href, Layout, PageContext};

/// One page of a logbook listing and where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    /// Path of the listing without query, e.g. `/logbook`.
    pub base: String,
    pub entries: Vec<Entry>,
    pub tag: Option<String>,
    pub page: Page,
    /// Show edit links.
    pub editable: bool,
}

impl Listing {
    /// A full page may have a successor; a short one cannot.
    pub fn has_next(&self) -> bool {
        self.entries.len() as u64 == ENTRIES_PER_PAGE
    }
}

/// Only http(s) URLs become links; anything else is shown as text.
fn safe_href(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    matches!(parsed.scheme(), "http" | "https").then(|| parsed.to_string())
}

#[component]
pub fn ListingPage(context: PageContext, heading: String, listing: Listing) -> Element {
    let empty = listing.entries.is_empty();
    let filter = listing.tag.clone();
    let clear_href = listing_href(&listing.base, 1, None);

    rsx! {
        Layout { heading, context,
            if let Some(tag) = filter {
                p {
                    "Tagged "
                    strong { "{tag}" }
                    " · "
                    a { href: "{clear_href}", "show all" }
                }
            }
            if empty {
                p { "No entries." }
            } else {
                ul { class: "entries",
                    for entry in listing.entries.iter() {
                        EntryRow {
                            entry: entry.clone(),
                            base: listing.base.clone(),
                            editable: listing.editable,
                        }
                    }
                }
            }
            Paginator {
                base: listing.base.clone(),
                page: listing.page,
                tag: listing.tag.clone(),
                has_next: listing.has_next(),
            }
        }
    }
}

#[component]
fn EntryRow(entry: Entry, base: String, editable: bool) -> Element {
    let href = safe_href(&entry.url);
    let title = entry.title.clone();
    let url = entry.url.clone();
    let notes = entry.notes.clone();
    let created = entry.created_at.format("%Y-%m-%d %H:%M").to_string();
    let edit_href = format!("/logbook/{}", entry.uuid);

    rsx! {
        li {
            if let Some(href) = href {
                a { href: "{href}", rel: "nofollow noopener", "{title}" }
            } else {
                strong { "{title}" }
                if !url.is_empty() {
                    " "
                    code { "{url}" }
                }
            }
            if entry.private {
                " "
                em { "(private)" }
            }
            div { class: "meta",
                "{created}"
                for tag in entry.tags.iter() {
                    " "
                    TagLink { base: base.clone(), tag: tag.clone() }
                }
                if editable {
                    " · "
                    a { href: "{edit_href}", "edit" }
                }
            }
            if !notes.is_empty() {
                p { class: "notes", "{notes}" }
            }
        }
    }
}

#[component]
fn TagLink(base: String, tag: String) -> Element {
    let href = listing_href(&base, 1, Some(&tag));

    rsx! {
        a { class: "tag", href: "{href}", "#{tag}" }
    }
}

#[component]
fn Paginator(base: String, page: Page, tag: Option<String>, has_next: bool) -> Element {
    let prev = page.prev().map(|p| listing_href(&base, p.number(), tag.as_deref()));
    let next = has_next.then(|| listing_href(&base, page.next().number(), tag.as_deref()));
    let number = page.number();

    rsx! {
        nav { class: "paginator",
            if let Some(prev) = prev {
                a { href: "{prev}", rel: "prev", "« newer" }
                " "
            }
            "page {number}"
            if let Some(next) = next {
                " "
                a { href: "{next}", rel: "next", "older »" }
            }
        }
    }
}
