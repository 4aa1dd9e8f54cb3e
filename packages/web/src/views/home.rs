use dioxus::prelude::*;

use super::{Layout, PageContext};

#[component]
pub fn Index(context: PageContext) -> Element {
    let username = context.identity.as_ref().map(|i| i.username.clone());

    rsx! {
        Layout { heading: "Logbook", context,
            p { "Capture links and notes, tag them, and share the public ones." }
            if let Some(username) = username {
                p {
                    a { href: "/logbook", "Open your logbook" }
                    " or see "
                    a { href: "/users/{username}/logbook", "what others see" }
                    "."
                }
            } else {
                p {
                    a { href: "/login", "Log in" }
                    " to start your logbook."
                }
            }
        }
    }
}

#[component]
pub fn About(context: PageContext) -> Element {
    rsx! {
        Layout { heading: "About", context,
            p {
                "Logbook keeps a personal list of entries. Each entry has a title, an optional URL, "
                "notes and a set of tags."
            }
            p { "Private entries are visible only to their owner. Everything else is listed on the owner's public page." }
        }
    }
}
