use dioxus::prelude::*;

use super::{Layout, PageContext};

/// Login form. `username` is echoed back after a failed attempt; the password never is.
#[component]
pub fn LoginPage(context: PageContext, username: String, message: Option<String>) -> Element {
    let csrf = context.csrf.clone();

    rsx! {
        Layout { heading: "Log in", context,
            if let Some(message) = message {
                p { class: "error", "{message}" }
            }
            form { method: "post", action: "/login",
                input { r#type: "hidden", name: "csrf", value: "{csrf}" }
                label {
                    "Username "
                    input { r#type: "text", name: "username", value: "{username}", autofocus: true }
                }
                label {
                    "Password "
                    input { r#type: "password", name: "password" }
                }
                button { r#type: "submit", "Log in" }
            }
        }
    }
}
