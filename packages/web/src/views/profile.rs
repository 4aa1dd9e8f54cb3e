use dioxus::prelude::*;
use store::Profile;

use super::{Layout, PageContext};

#[component]
pub fn ProfilePage(context: PageContext, profile: Profile) -> Element {
    let heading = profile.display_name().to_string();
    let username = profile.username.clone();
    let joined = profile.created_at.format("%Y-%m-%d").to_string();

    rsx! {
        Layout { heading, context,
            p { "@{username}, keeping a logbook since {joined}." }
            p {
                a { href: "/users/{username}/logbook", "Public entries" }
            }
        }
    }
}
