use crate::api::OrchestraClient;
use crate::components::views::{AccountView, HomeView, LoginView, RegisterView};
use crate::components::{Icon, PlaylistModal};
use crate::config::AppConfig;
use crate::db::DurableStorage;
use crate::playlist_picker::{PickerState, PlaylistPicker};
use crate::session::{Session, SessionStore};
use dioxus::prelude::*;
use std::rc::Rc;

pub type AppSessionStore = SessionStore<DurableStorage, Signal<Session>>;
pub type AppPicker = PlaylistPicker<OrchestraClient, Signal<PickerState>>;

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum AppView {
    #[layout(AppShell)]
        #[route("/")]
        HomeView {},
        #[route("/login")]
        LoginView {},
        #[route("/register")]
        RegisterView {},
        #[route("/account")]
        AccountView {},
}

pub fn view_label(view: &AppView) -> &'static str {
    match view {
        AppView::HomeView {} => "Home",
        AppView::LoginView {} => "Sign in",
        AppView::RegisterView {} => "Create account",
        AppView::AccountView {} => "Account",
    }
}

#[component]
pub fn AppShell() -> Element {
    let config = use_hook(AppConfig::load);
    let client = use_hook(|| Rc::new(OrchestraClient::new(&config)));
    let session = use_signal(Session::disconnected);
    let mut session_ready = use_signal(|| false);
    let picker_state = use_signal(PickerState::default);
    let store = use_hook(|| Rc::new(SessionStore::new(DurableStorage::open_default(), session)));
    let picker = use_hook(|| PlaylistPicker::new(Rc::clone(&client), picker_state));

    // Provide state via context
    use_context_provider(|| config.clone());
    use_context_provider(|| Rc::clone(&client));
    use_context_provider(|| session);
    use_context_provider(|| picker_state);
    use_context_provider(|| Rc::clone(&store));
    use_context_provider(|| picker.clone());

    // Validate any stored token before personalized content is requested
    {
        let store = Rc::clone(&store);
        let client = Rc::clone(&client);
        use_effect(move || {
            let store = Rc::clone(&store);
            let client = Rc::clone(&client);
            spawn(async move {
                store.init(&*client).await;
                session_ready.set(true);
            });
        });
    }

    let view = use_route::<AppView>();
    let connected = session().connected;
    let display_name = session()
        .profile
        .as_ref()
        .map(|profile| profile.display_name())
        .unwrap_or_default();

    rsx! {
        div { class: "app-container flex flex-col min-h-screen text-white",
            header { class: "mobile-safe-top border-b border-zinc-800/60 bg-zinc-950/80 backdrop-blur-xl",
                div { class: "flex items-center justify-between px-4 py-3 gap-4",
                    Link {
                        to: AppView::HomeView {},
                        class: "flex items-center gap-3",
                        div { class: "w-9 h-9 rounded-xl bg-gradient-to-br from-emerald-500 to-teal-600 flex items-center justify-center text-white font-bold shadow-lg shadow-emerald-500/20",
                            "O"
                        }
                        div { class: "flex flex-col",
                            span { class: "text-xs uppercase tracking-widest text-zinc-500",
                                "Orchestra"
                            }
                            span { class: "text-sm font-semibold text-white", "{view_label(&view)}" }
                        }
                    }
                    if !session_ready() {
                        Icon {
                            name: "loader".to_string(),
                            class: "w-5 h-5 animate-spin text-zinc-500".to_string(),
                        }
                    } else if connected {
                        Link {
                            to: AppView::AccountView {},
                            class: "flex items-center gap-2 px-3 py-2 rounded-lg text-zinc-300 hover:text-white hover:bg-zinc-800/60 transition-colors",
                            Icon { name: "user".to_string(), class: "w-5 h-5".to_string() }
                            span { class: "text-sm", "{display_name}" }
                        }
                    } else {
                        Link {
                            to: AppView::LoginView {},
                            class: "px-4 py-2 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white text-sm font-medium transition-colors",
                            "Sign in"
                        }
                    }
                }
            }

            main { class: "flex-1 overflow-y-auto main-scroll",
                div { class: "page-shell", Outlet::<AppView> {} }
            }
        }

        if picker_state().is_open() {
            PlaylistModal {}
        }
    }
}
