use crate::api::PlaylistId;
use crate::components::{AppPicker, Icon};
use crate::playlist_picker::PickerState;
use crate::session::Session;
use dioxus::prelude::*;

const ROW_LIMIT: usize = 40;

#[component]
pub fn PlaylistModal() -> Element {
    let picker = use_context::<AppPicker>();
    let session = use_context::<Signal<Session>>();
    // The picker writes through this signal; reading it here re-renders on change.
    let state = use_context::<Signal<PickerState>>()();

    let busy = state.creating || state.saving;
    let visible: Vec<_> = state.visible_playlists().into_iter().cloned().collect();
    let total_visible = visible.len();
    let truncated = total_visible > ROW_LIMIT;
    let selected_count = state.selection.selected_ids.len();

    let on_close = {
        let picker = picker.clone();
        move |_| picker.close()
    };

    let on_search = {
        let picker = picker.clone();
        move |evt: FormEvent| picker.set_query(&evt.value())
    };

    let make_toggle = {
        let picker = picker.clone();
        move |playlist_id: PlaylistId| {
            let picker = picker.clone();
            move |_| {
                picker.toggle(playlist_id);
            }
        }
    };

    let on_begin_create = {
        let picker = picker.clone();
        move |_| picker.begin_create()
    };

    let on_cancel_create = {
        let picker = picker.clone();
        move |_| picker.cancel_create()
    };

    let on_draft = {
        let picker = picker.clone();
        move |evt: FormEvent| picker.set_draft(&evt.value())
    };

    let on_submit_create = {
        let picker = picker.clone();
        move |_| {
            let picker = picker.clone();
            spawn(async move {
                let current = session.peek().clone();
                // Failures land in the picker notice.
                let _ = picker.submit_create(&current).await;
            });
        }
    };

    let on_save = {
        let picker = picker.clone();
        move |_| {
            let picker = picker.clone();
            spawn(async move {
                let current = session.peek().clone();
                let _ = picker.save(&current).await;
            });
        }
    };

    let on_dismiss_notice = {
        let picker = picker.clone();
        move |_| picker.dismiss_notice()
    };

    rsx! {
        div { class: "fixed inset-0 z-50 flex items-end md:items-center justify-center bg-black/60 backdrop-blur-sm px-3",
            div { class: "w-full md:max-w-lg bg-zinc-900/95 border border-zinc-800 rounded-t-2xl md:rounded-2xl shadow-2xl p-5 space-y-5",
                div { class: "flex items-center justify-between gap-3",
                    div { class: "flex items-center gap-3 min-w-0",
                        div { class: "w-12 h-12 rounded-lg bg-zinc-800/70 border border-zinc-800/80 flex items-center justify-center",
                            Icon {
                                name: "playlist".to_string(),
                                class: "w-5 h-5 text-zinc-500".to_string(),
                            }
                        }
                        div { class: "min-w-0",
                            p { class: "text-xs uppercase tracking-wide text-zinc-500",
                                "Playlists"
                            }
                            h2 { class: "text-lg font-semibold text-white truncate",
                                if state.target_track().is_some() {
                                    "Add to playlist"
                                } else {
                                    "Your playlists"
                                }
                            }
                        }
                    }
                    button {
                        class: "p-2 rounded-lg text-zinc-400 hover:text-white hover:bg-zinc-800 transition-colors",
                        aria_label: "Close",
                        onclick: on_close,
                        Icon { name: "x".to_string(), class: "w-5 h-5".to_string() }
                    }
                }

                if let Some(text) = state.notice.clone() {
                    div { class: "flex items-start justify-between gap-3 p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-red-200 text-sm",
                        span { "{text}" }
                        button {
                            class: "text-red-200/80 hover:text-white",
                            aria_label: "Dismiss",
                            onclick: on_dismiss_notice,
                            Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                        }
                    }
                }

                input {
                    class: "w-full px-3 py-2 rounded-lg bg-zinc-900/50 border border-zinc-800 text-white placeholder:text-zinc-600 focus:outline-none focus:border-emerald-500/50 focus:ring-2 focus:ring-emerald-500/20",
                    placeholder: "Search playlists",
                    value: "{state.selection.query}",
                    oninput: on_search,
                }

                if state.loading {
                    div { class: "flex items-center gap-2 text-sm text-zinc-400",
                        Icon {
                            name: "loader".to_string(),
                            class: "w-4 h-4 animate-spin".to_string(),
                        }
                        "Loading playlists..."
                    }
                } else if visible.is_empty() {
                    p { class: "text-sm text-zinc-400", "No playlists yet." }
                } else {
                    div { class: "max-h-56 overflow-y-auto space-y-2 pr-1",
                        for playlist in visible.into_iter().take(ROW_LIMIT) {
                            button {
                                key: "{playlist.id}",
                                class: if state.is_selected(playlist.id) { "w-full px-3 py-2 rounded-xl bg-emerald-500/10 border border-emerald-500/60 text-left text-sm text-white transition-colors flex items-center gap-3" } else { "w-full px-3 py-2 rounded-xl bg-zinc-900/50 border border-zinc-800 hover:border-emerald-500/60 hover:text-white text-left text-sm text-zinc-300 transition-colors flex items-center gap-3" },
                                disabled: busy,
                                onclick: make_toggle(playlist.id),
                                div { class: "w-5 h-5 rounded border border-zinc-600 flex items-center justify-center",
                                    if state.is_selected(playlist.id) {
                                        Icon {
                                            name: "check".to_string(),
                                            class: "w-4 h-4 text-emerald-400".to_string(),
                                        }
                                    }
                                }
                                div { class: "flex-1 min-w-0",
                                    p { class: "truncate",
                                        if playlist.name.trim().is_empty() {
                                            "Untitled"
                                        } else {
                                            "{playlist.name}"
                                        }
                                    }
                                    p { class: "text-xs text-zinc-500", "{playlist.track_count} tracks" }
                                }
                            }
                        }
                        if truncated {
                            p { class: "text-xs text-zinc-500 px-1",
                                "Showing {ROW_LIMIT} of {total_visible}. Refine the search to see more."
                            }
                        }
                    }
                }

                if let Some(draft) = state.selection.creation_draft.clone() {
                    div { class: "space-y-2",
                        input {
                            class: "w-full px-3 py-2 rounded-lg bg-zinc-900/50 border border-zinc-800 text-white placeholder:text-zinc-600 focus:outline-none focus:border-emerald-500/50 focus:ring-2 focus:ring-emerald-500/20",
                            placeholder: "New playlist name",
                            value: "{draft}",
                            oninput: on_draft,
                        }
                        div { class: "grid grid-cols-2 gap-2",
                            button {
                                class: "px-4 py-2 rounded-xl bg-zinc-800 text-white hover:bg-zinc-700 transition-colors",
                                disabled: busy,
                                onclick: on_cancel_create,
                                "Cancel"
                            }
                            button {
                                class: "px-4 py-2 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors",
                                disabled: busy,
                                onclick: on_submit_create,
                                if state.creating {
                                    "Creating..."
                                } else {
                                    "Create"
                                }
                            }
                        }
                    }
                } else {
                    button {
                        class: "w-full flex items-center justify-between px-4 py-3 rounded-xl bg-zinc-800 text-white hover:bg-zinc-700 transition-colors",
                        disabled: busy,
                        onclick: on_begin_create,
                        span { "New playlist" }
                        Icon { name: "plus".to_string(), class: "w-5 h-5".to_string() }
                    }
                }

                if state.target_track().is_some() {
                    button {
                        class: "w-full flex items-center justify-between px-4 py-3 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors disabled:opacity-50",
                        disabled: !state.can_save(),
                        onclick: on_save,
                        span {
                            if state.saving {
                                "Saving..."
                            } else {
                                "Add to {selected_count} playlist(s)"
                            }
                        }
                        Icon { name: "check".to_string(), class: "w-5 h-5".to_string() }
                    }
                }
            }
        }
    }
}
