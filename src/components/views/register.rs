use super::login::{FIELD_CLASS, LABEL_CLASS};
use crate::api::{OrchestraClient, RegistrationRequest, MIN_PASSWORD_LEN};
use crate::components::{AppSessionStore, AppView, Icon};
use dioxus::prelude::*;
use std::rc::Rc;

#[component]
pub fn RegisterView() -> Element {
    let client = use_context::<Rc<OrchestraClient>>();
    let store = use_context::<Rc<AppSessionStore>>();
    let mut pseudo = use_signal(String::new);
    let mut login = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut outcome = use_signal(|| None::<Result<String, String>>);
    let mut submitting = use_signal(|| false);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        if submitting() {
            return;
        }
        let request = match RegistrationRequest::new(&pseudo(), &login(), &email(), &password()) {
            Ok(request) => request,
            Err(err) => {
                outcome.set(Some(Err(err.user_message("Please check the form."))));
                return;
            }
        };

        let client = Rc::clone(&client);
        let store = Rc::clone(&store);
        submitting.set(true);
        outcome.set(None);
        spawn(async move {
            match store.register(&*client, &request).await {
                Ok(profile) => {
                    password.set(String::new());
                    outcome.set(Some(Ok(format!(
                        "Account created for {}. You can sign in now.",
                        profile.display_name()
                    ))));
                }
                Err(err) => outcome.set(Some(Err(err.user_message("Registration failed.")))),
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { class: "max-w-md mx-auto space-y-6",
            h1 { class: "text-2xl font-bold text-white", "Create account" }
            form { class: "grid gap-4", onsubmit: on_submit,
                div {
                    label { class: LABEL_CLASS, "Display name" }
                    input {
                        class: FIELD_CLASS,
                        value: pseudo,
                        oninput: move |e| pseudo.set(e.value()),
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Username" }
                    input {
                        class: FIELD_CLASS,
                        autocomplete: "username",
                        value: login,
                        oninput: move |e| login.set(e.value()),
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Email" }
                    input {
                        class: FIELD_CLASS,
                        r#type: "email",
                        autocomplete: "email",
                        value: email,
                        oninput: move |e| email.set(e.value()),
                    }
                }
                div {
                    label { class: LABEL_CLASS, "Password" }
                    input {
                        class: FIELD_CLASS,
                        r#type: "password",
                        autocomplete: "new-password",
                        placeholder: "At least {MIN_PASSWORD_LEN} characters",
                        value: password,
                        oninput: move |e| password.set(e.value()),
                    }
                }
                {
                    match outcome() {
                        Some(Ok(message)) => rsx! {
                            div { class: "flex items-center gap-2 text-emerald-400 text-sm",
                                Icon { name: "check".to_string(), class: "w-4 h-4".to_string() }
                                "{message}"
                            }
                        },
                        Some(Err(message)) => rsx! {
                            div { class: "flex items-center gap-2 text-red-400 text-sm",
                                Icon { name: "x".to_string(), class: "w-4 h-4".to_string() }
                                "{message}"
                            }
                        },
                        None => rsx! {},
                    }
                }
                button {
                    class: "w-full px-4 py-3 rounded-xl bg-emerald-500 hover:bg-emerald-400 text-white font-medium transition-colors flex items-center justify-center gap-2",
                    r#type: "submit",
                    disabled: submitting(),
                    if submitting() {
                        Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                    }
                    "Create account"
                }
            }
            p { class: "text-sm text-zinc-400",
                "Already registered? "
                Link {
                    to: AppView::LoginView {},
                    class: "text-emerald-400 hover:text-emerald-300",
                    "Sign in"
                }
            }
        }
    }
}
