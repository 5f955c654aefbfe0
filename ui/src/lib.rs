//! Biblio UI - Leptos front end for the past-exam-paper portal
//!
//! Pages are thin bindings over `biblio::views`; every route goes through
//! [`components::Guarded`] before it renders.

pub mod api;
pub mod components;
pub mod pages;
pub mod schedule;
pub mod state;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    path,
};

use components::{Guarded, Header};
use pages::{
    login::LoginPage, paper::PaperPage, register::RegisterPage, search::SearchPage,
    upload::UploadPage,
};
use state::AppState;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(AppState::new());

    view! {
        <Title text="Biblio" />
        <Router>
            <Header />
            <main class="page">
                <Routes fallback=|| view! { <Redirect path="/login" /> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/login" /> } />
                    <Route path=path!("/login") view=|| view! { <Guarded><LoginPage /></Guarded> } />
                    <Route path=path!("/register") view=|| view! { <Guarded><RegisterPage /></Guarded> } />
                    <Route path=path!("/search") view=|| view! { <Guarded><SearchPage /></Guarded> } />
                    <Route path=path!("/upload") view=|| view! { <Guarded><UploadPage /></Guarded> } />
                    <Route path=path!("/:code/:year") view=|| view! { <Guarded><PaperPage /></Guarded> } />
                </Routes>
            </main>
        </Router>
    }
}
