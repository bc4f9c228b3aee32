use dioxus::prelude::*;

mod api;
mod components;
mod config;
mod db;
mod favorites;
mod feed;
mod playlist_picker;
mod session;
mod state;
#[cfg(test)]
mod test_support;

use components::AppView;

const APP_CSS: Asset = asset!("/assets/styling/app.css");
const TAILWIND_CSS: Asset = asset!("/assets/tailwind.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "theme-color", content: "#10b981" }
        document::Meta { name: "mobile-web-app-capable", content: "yes" }
        document::Meta { name: "apple-mobile-web-app-title", content: "Orchestra" }
        document::Title { "Orchestra" }

        document::Stylesheet { href: TAILWIND_CSS }
        document::Stylesheet { href: APP_CSS }

        Router::<AppView> {}
    }
}
