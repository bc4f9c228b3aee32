use crate::api::OrchestraClient;
use crate::components::{Icon, TrackCard};
use crate::config::AppConfig;
use crate::feed::{ContentAggregator, HomeFeed, RecommendationSet, SourceKind};
use crate::session::Session;
use dioxus::prelude::*;
use std::rc::Rc;

fn section_title(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::General => "Catalog",
        SourceKind::Behavioral => "Because you listened",
        SourceKind::ContentBased => "Similar to your taste",
    }
}

#[component]
pub fn HomeView() -> Element {
    let client = use_context::<Rc<OrchestraClient>>();
    let config = use_context::<AppConfig>();
    let session = use_context::<Signal<Session>>();
    let feed = use_signal(HomeFeed::default);
    let aggregator = use_hook(|| Rc::new(ContentAggregator::new(client, feed, &config)));

    // Refetch whenever connectivity changes; each source lands on its own.
    use_effect(move || {
        let current = session();
        for task in aggregator.on_session(&current) {
            spawn(task);
        }
    });

    let connected = session().connected;
    let snapshot = feed();

    rsx! {
        div { class: "space-y-10",
            for kind in SourceKind::ALL {
                if connected || !kind.is_personalized() {
                    FeedSection {
                        key: "{kind.label()}",
                        title: section_title(kind).to_string(),
                        set: snapshot.section(kind).clone(),
                    }
                }
            }
            if !connected {
                div { class: "p-4 rounded-xl bg-zinc-900/50 border border-zinc-800/60 text-sm text-zinc-400",
                    "Sign in to get personalized recommendations."
                }
            }
        }
    }
}

#[component]
fn FeedSection(title: String, set: RecommendationSet) -> Element {
    let personalized = set.kind.is_personalized();

    rsx! {
        section { class: "space-y-4",
            div { class: "flex items-center gap-3",
                h2 { class: "text-xl font-bold text-white", "{title}" }
                if set.loading {
                    Icon {
                        name: "loader".to_string(),
                        class: "w-4 h-4 animate-spin text-zinc-500".to_string(),
                    }
                }
            }
            if let Some(error) = set.error.clone() {
                div { class: "p-3 rounded-lg bg-red-500/10 border border-red-500/40 text-red-200 text-sm",
                    "{error}"
                }
            }
            if set.items.is_empty() && !set.loading && set.error.is_none() {
                p { class: "text-sm text-zinc-500",
                    if personalized {
                        "Nothing to recommend yet. Keep listening!"
                    } else {
                        "The catalog is empty."
                    }
                }
            } else {
                div { class: "grid grid-cols-2 sm:grid-cols-3 lg:grid-cols-5 gap-4",
                    for track in set.items.iter().cloned() {
                        TrackCard { key: "{track.id}", track }
                    }
                }
            }
        }
    }
}
