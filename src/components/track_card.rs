use crate::api::{OrchestraClient, Track};
use crate::components::{AppPicker, Icon};
use crate::config::AppConfig;
use crate::favorites::{FavoriteState, FavoriteToggle};
use crate::session::Session;
use dioxus::prelude::*;
use std::rc::Rc;

/// Absolute cover URL. Relative references are served by the API host.
pub fn cover_url(config: &AppConfig, cover_ref: &str) -> Option<String> {
    let cover_ref = cover_ref.trim();
    if cover_ref.is_empty() {
        None
    } else if cover_ref.starts_with("http://") || cover_ref.starts_with("https://") {
        Some(cover_ref.to_string())
    } else {
        Some(format!(
            "{}/{}",
            config.api_base_url,
            cover_ref.trim_start_matches('/')
        ))
    }
}

#[component]
pub fn TrackCard(track: Track) -> Element {
    let client = use_context::<Rc<OrchestraClient>>();
    let config = use_context::<AppConfig>();
    let session = use_context::<Signal<Session>>();
    let picker = use_context::<AppPicker>();
    let favorite_state = use_signal(|| FavoriteState::new(track.id));
    let favorite = use_hook(|| Rc::new(FavoriteToggle::new(client, favorite_state)));

    let connected = session().connected;
    let FavoriteState {
        active, pending, ..
    } = favorite_state();
    let cover = cover_url(&config, &track.cover_ref);
    let title = if track.title.trim().is_empty() {
        "Untitled".to_string()
    } else {
        track.title.clone()
    };

    let heart_icon = if active { "heart-filled" } else { "heart" };
    let favorite_hint = if connected {
        "Add to favorites"
    } else {
        "Sign in to add favorites"
    };

    let on_toggle_favorite = {
        let favorite = Rc::clone(&favorite);
        move |evt: MouseEvent| {
            evt.stop_propagation();
            let favorite = Rc::clone(&favorite);
            spawn(async move {
                let current = session.peek().clone();
                favorite.toggle(&current).await;
            });
        }
    };

    let on_open_picker = {
        let picker = picker.clone();
        let track_id = track.id;
        move |evt: MouseEvent| {
            evt.stop_propagation();
            let picker = picker.clone();
            spawn(async move {
                let current = session.peek().clone();
                picker.open(Some(track_id), &current).await;
            });
        }
    };

    rsx! {
        div { class: "group rounded-2xl bg-zinc-900/50 border border-zinc-800/60 p-3 hover:border-emerald-500/40 transition-colors",
            div { class: "relative aspect-square rounded-xl overflow-hidden bg-zinc-800 mb-3",
                {
                    match cover {
                        Some(url) => rsx! {
                            img {
                                class: "w-full h-full object-cover",
                                src: "{url}",
                                alt: "Cover of {title}",
                            }
                        },
                        None => rsx! {
                            div { class: "w-full h-full flex items-center justify-center bg-gradient-to-br from-zinc-700 to-zinc-800",
                                Icon {
                                    name: "music".to_string(),
                                    class: "w-8 h-8 text-zinc-500".to_string(),
                                }
                            }
                        },
                    }
                }
                div { class: "absolute top-2 right-2 flex gap-2",
                    button {
                        class: if active { "p-2 rounded-full bg-black/60 text-emerald-400" } else { "p-2 rounded-full bg-black/60 text-zinc-300 hover:text-white" },
                        aria_label: "Add to favorites",
                        title: favorite_hint,
                        disabled: !connected || pending,
                        onclick: on_toggle_favorite,
                        Icon {
                            name: heart_icon.to_string(),
                            class: "w-4 h-4".to_string(),
                        }
                    }
                    if connected {
                        button {
                            class: "p-2 rounded-full bg-black/60 text-zinc-300 hover:text-white",
                            aria_label: "Add to playlist",
                            title: "Add to playlist",
                            onclick: on_open_picker,
                            Icon { name: "plus".to_string(), class: "w-4 h-4".to_string() }
                        }
                    }
                }
            }
            p { class: "text-sm font-medium text-white truncate", "{title}" }
            p { class: "text-xs text-zinc-400 truncate", "{track.artist_name}" }
        }
    }
}
