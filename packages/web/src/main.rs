use dioxus::prelude::*;

use ui::views::HomeView;
use ui::AuthProvider;
use views::{
    Community, EditRecipe, Login, NewRecipe, OfflineRecipe, OfflineRecipes, RecipeDetail, Recipes,
    Settings, SharedRecipe, Signup,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/")]
        Home {},
        #[route("/login")]
        Login {},
        #[route("/signup")]
        Signup {},
        #[route("/recipes")]
        Recipes {},
        #[route("/recipes/new?:variant_of")]
        NewRecipe { variant_of: String },
        #[route("/recipes/:id")]
        RecipeDetail { id: String },
        #[route("/recipes/:id/edit")]
        EditRecipe { id: String },
        #[route("/settings")]
        Settings {},
        #[route("/community")]
        Community {},
        #[route("/share/:token")]
        SharedRecipe { token: String },
        #[route("/offline")]
        OfflineRecipes {},
        #[route("/offline/:id")]
        OfflineRecipe { id: String },
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime.block_on(launch_server()),
            Err(e) => eprintln!("failed to start tokio runtime: {e}"),
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use tracing_subscriber::EnvFilter;

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,web=debug,api=debug")),
        )
        .init();

    // Report a missing service-role key at startup, not on the first signup
    if let Err(e) = api::config::ServiceConfig::from_env() {
        tracing::warn!("backend configuration incomplete, signup will fail: {e}");
    }

    let router = axum::Router::new()
        .route("/healthz", axum::routing::get(|| async { "ok" }))
        .serve_dioxus_application(ServeConfig::new(), App);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {addr}: {e}");
            return;
        }
    };
    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, router.into_make_service()).await {
        tracing::error!("server exited: {e}");
    }
}

#[component]
fn App() -> Element {
    rsx! {
        // Global app resources
        document::Title { "Virtual Recipe Box" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::STYLES_CSS }

        Router::<Route> {}
    }
}

/// Session context for every page. Sits inside the router so the session
/// views can navigate.
#[component]
fn Shell() -> Element {
    rsx! {
        AuthProvider {
            Outlet::<Route> {}
        }
    }
}

#[component]
fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        main {
            class: "page centered",
            h1 { "Page not found" }
            p { class: "muted", "Nothing lives at /{path}." }
            Link { to: Route::Home {}, class: "btn btn--primary", "Go to Home" }
        }
    }
}
