use dioxus::prelude::*;

use super::{Layout, PageContext};

/// Rendered without a session, so the nav always shows the signed-out links.
#[component]
pub fn ErrorPage(message: String) -> Element {
    rsx! {
        Layout { heading: "Error", context: PageContext::default(),
            p { class: "error", "{message}" }
            p {
                a { href: "/", "Back to the start page" }
            }
        }
    }
}
