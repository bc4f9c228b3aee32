use crate::api::{LoginCredentials, OrchestraClient};
use crate::components::{AppSessionStore, AppView, Icon};
use dioxus::prelude::*;
use std::rc::Rc;

pub(super) const FIELD_CLASS: &str = "w-full px-4 py-3 bg-zinc-900/50 border border-zinc-700/50 rounded-xl text-white placeholder:text-zinc-500 focus:outline-none focus:border-emerald-500/50 focus:ring-2 focus:ring-emerald-500/20";
pub(super) const LABEL_CLASS: &str = "block text-sm font-medium text-zinc-400 mb-2";

#[component]
pub fn LoginView() -> Element {
    let client = use_context::<Rc<OrchestraClient>>();
    let store = use_context::<Rc<AppSessionStore>>();
    let navigator = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let credentials = match LoginCredentials::new(&username(), &password()) {
            Ok(credentials) => credentials,
            Err(err) => {
                error.set(Some(err.user_message("Please fill in both fields.")));
                return;
            }
        };

        let client = Rc::clone(&client);
        let store = Rc::clone(&store);
        submitting.set(true);
        error.set(None);
        spawn(async move {
            match store.login(&*client, &credentials).await {
                Ok(_) => {
                    password.set(String::new());
                    navigator.push(AppView::HomeView {});
                }
                Err(err) => error.set(Some(err.user_message("Sign in failed."))),
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "max-w-md mx-auto space-y-6",
            h1 { class: "text-2xl font-bold text-white", "Sign in" }
            form { class: "grid gap-4", onsubmit: on_submit,
                div {
                    label { class: LABEL_CLASS, "Username" }
                    input {
                        class: FIELD_CLASS,
                        autocomplete: "username",
                        value: username,
                        oninput: move |e| username.set(e.value()),
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Password" }
                    input {
                        class: FIELD_CLASS,
                        r#type: "password",
                        autocomplete: "current-password",
                        placeholder: "••••••••",
                        value: password,
                        oninput: move |e| password.set(e.value()),
                    }
                }
                if let Some(message) = error() {
                    div { class: "flex items-center gap-2 text-red-400 text-sm",
                        Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                        "{message}"
                    }
                }
                button {
                    class: "w-full px-4 py-3 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors flex items-center justify-center gap-2",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() {
                        Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                    }
                    "Sign in"
                }
            }
            p { class: "text-sm text-zinc-400",
                "No account yet? "
                Link {
                    to: AppView::RegisterView {},
                    class: "text-emerald-400 hover:text-emerald-300",
                    "Create one"
                }
            }
        }
    }
}
