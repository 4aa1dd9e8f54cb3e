use dioxus::prelude::*;
use store::Entry;

use super::{Layout, PageContext};

/// Raw form values, kept as typed so a rejected submission can be shown again.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFormValues {
    pub title: String,
    pub url: String,
    pub notes: String,
    pub tags: String,
    pub private: bool,
}

impl From<&Entry> for EntryFormValues {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title.clone(),
            url: entry.url.clone(),
            notes: entry.notes.clone(),
            tags: entry.tags_input(),
            private: entry.private,
        }
    }
}

/// Add and edit form. `action` is where the form posts to.
#[component]
pub fn EntryFormPage(
    context: PageContext,
    heading: String,
    action: String,
    values: EntryFormValues,
    message: Option<String>,
) -> Element {
    let csrf = context.csrf.clone();
    let EntryFormValues {
        title,
        url,
        notes,
        tags,
        private,
    } = values;

    rsx! {
        Layout { heading, context,
            if let Some(message) = message {
                p { class: "error", "{message}" }
            }
            form { method: "post", action: "{action}",
                input { r#type: "hidden", name: "csrf", value: "{csrf}" }
                label {
                    "Title "
                    input { r#type: "text", name: "title", value: "{title}" }
                }
                label {
                    "URL "
                    input { r#type: "url", name: "url", value: "{url}" }
                }
                label {
                    "Notes "
                    textarea { name: "notes", rows: "6", "{notes}" }
                }
                label {
                    "Tags (comma separated) "
                    input { r#type: "text", name: "tags", value: "{tags}" }
                }
                label {
                    input { r#type: "checkbox", name: "private", value: "on", checked: private }
                    " Private"
                }
                button { r#type: "submit", "Save" }
            }
            p {
                a { href: "/logbook", "Back to your logbook" }
            }
        }
    }
}
