use crate::client::{HttpClient, WebUserService};
use dioxus::logger::tracing::{debug, error};
use dioxus::prelude::*;
use roster_client::{ScreenState, UserApi, UserScreen};

mod client;

const API_BASE_URL: &str = match option_env!("ROSTER_API_BASE_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:3000",
};

#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/users")]
    Users {},
    #[route("/:..segments")]
    Fallback { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(|| WebUserService::new(HttpClient::new(API_BASE_URL)));

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}

#[component]
fn Fallback(segments: Vec<String>) -> Element {
    let navigator = use_navigator();

    use_effect(move || {
        debug!("redirecting /{} to /users", segments.join("/"));
        navigator.replace(Route::Users {});
    });

    rsx! {}
}

#[component]
fn Users() -> Element {
    let api = use_context::<WebUserService>();
    let mut screen = use_signal(UserScreen::new);

    let load_api = api.clone();
    use_future(move || {
        let api = load_api.clone();
        async move {
            screen.write().begin_load();
            let result = api.get_users().await.map(|res| res.data);
            if let Err(err) = &result {
                error!("failed to fetch users: {}", err);
            }
            screen.write().finish_load(result);
        }
    });

    let on_add = move |_| {
        let Some(username) = screen.write().begin_submit() else {
            return;
        };
        let api = api.clone();
        spawn(async move {
            let result = api.create_user(&username).await.map(|res| res.data);
            if let Err(err) = &result {
                error!("failed to create user {}: {}", username, err);
            }
            screen.write().finish_submit(result);
        });
    };

    let (input, rows, can_submit, failure, loading) = {
        let view = screen.read();
        (
            view.input().to_string(),
            view.rows(),
            view.can_submit(),
            view.error().cloned(),
            view.state() == ScreenState::LoadingUsers,
        )
    };

    rsx! {
        div { class: "page-container",
            input {
                class: "user-input",
                placeholder: "New username",
                value: "{input}",
                oninput: move |evt| screen.write().set_input(evt.value()),
            }
            button {
                class: "btn-add",
                disabled: !can_submit,
                onclick: on_add,
                "Add User"
            }

            if let Some(err) = failure {
                div { class: "error-banner", role: "alert",
                    span { "Request failed ({err.status}): {err.message}" }
                    button {
                        class: "btn-dismiss",
                        onclick: move |_| screen.write().dismiss_error(),
                        "Dismiss"
                    }
                }
            }

            div { class: "title", "Current Users" }
            div { class: "table",
                div { class: "row header",
                    div { class: "cell", "Name" }
                    div { class: "cell", "Created At" }
                }
                if loading {
                    div { class: "row loading",
                        div { class: "cell", "Loading users..." }
                    }
                }
                for row in rows {
                    div { class: "row", key: "{row.key}",
                        div { class: "cell", "data-title": "Name", "{row.username}" }
                        div { class: "cell", "data-title": "Created At", "{row.created}" }
                    }
                }
            }
        }
    }
}
