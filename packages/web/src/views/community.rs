use dioxus::prelude::*;
use ui::views::CommunityView;

#[component]
pub fn Community() -> Element {
    rsx! { CommunityView {} }
}
