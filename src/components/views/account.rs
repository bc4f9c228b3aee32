use crate::api::UserProfile;
use crate::components::{AppPicker, AppSessionStore, AppView, Icon};
use crate::session::Session;
use dioxus::prelude::*;
use std::rc::Rc;

#[component]
pub fn AccountView() -> Element {
    let store = use_context::<Rc<AppSessionStore>>();
    let picker = use_context::<AppPicker>();
    let session = use_context::<Signal<Session>>();
    let navigator = use_navigator();

    let current = session();
    if !current.connected {
        return rsx! {
            div { class: "max-w-md mx-auto space-y-4 text-center",
                p { class: "text-zinc-400", "You are not signed in." }
                Link {
                    to: AppView::LoginView {},
                    class: "inline-block px-4 py-2 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white text-sm font-medium transition-colors",
                    "Sign in"
                }
            }
        };
    }

    let profile = store.profile().unwrap_or_default();

    let on_manage_playlists = {
        let picker = picker.clone();
        move |_| {
            let picker = picker.clone();
            spawn(async move {
                let current = session.peek().clone();
                picker.open(None, &current).await;
            });
        }
    };

    let on_logout = {
        let store = Rc::clone(&store);
        let picker = picker.clone();
        move |_| {
            picker.close();
            store.logout();
            navigator.push(AppView::HomeView {});
        }
    };

    rsx! {
        div { class: "max-w-lg mx-auto space-y-6",
            div { class: "flex items-center gap-4",
                div { class: "w-16 h-16 rounded-full bg-zinc-800 overflow-hidden flex items-center justify-center",
                    if let Some(image) = profile.image.clone().filter(|url| !url.is_empty()) {
                        img { class: "w-full h-full object-cover", src: "{image}" }
                    } else {
                        Icon { name: "user".to_string(), class: "w-8 h-8 text-zinc-500".to_string() }
                    }
                }
                div { class: "min-w-0",
                    h1 { class: "text-2xl font-bold text-white truncate", "{profile.display_name()}" }
                    p { class: "text-sm text-zinc-400 truncate", "{profile.email}" }
                }
            }
            ProfileDetails { profile: profile.clone() }
            div { class: "grid grid-cols-1 sm:grid-cols-2 gap-3",
                button {
                    class: "w-full flex items-center justify-between px-4 py-3 rounded-xl bg-zinc-800 text-white hover:bg-zinc-700 transition-colors",
                    onclick: on_manage_playlists,
                    span { "My playlists" }
                    Icon { name: "playlist".to_string(), class: "w-5 h-5".to_string() }
                }
                button {
                    class: "w-full flex items-center justify-between px-4 py-3 rounded-xl bg-red-500/10 border border-red-500/40 text-red-200 hover:bg-red-500/20 transition-colors",
                    onclick: on_logout,
                    span { "Sign out" }
                    Icon { name: "log-out".to_string(), class: "w-5 h-5".to_string() }
                }
            }
        }
    }
}

#[component]
fn ProfileDetails(profile: UserProfile) -> Element {
    let login = profile.user_login.clone().unwrap_or_default();
    let joined = profile
        .created_at
        .map(|stamp| stamp.format("%B %Y").to_string());

    rsx! {
        dl { class: "grid grid-cols-2 gap-3 p-4 rounded-xl bg-zinc-900/50 border border-zinc-800/60 text-sm",
            dt { class: "text-zinc-500", "Username" }
            dd { class: "text-white", "{login}" }
            dt { class: "text-zinc-500", "User id" }
            dd { class: "text-white", "{profile.user_id}" }
            if let Some(joined) = joined {
                dt { class: "text-zinc-500", "Member since" }
                dd { class: "text-white", "{joined}" }
            }
        }
    }
}
