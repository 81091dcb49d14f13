//! Leptos application with routing.

use leptos::*;
use leptos_router::*;

use crate::frontend::invoices::InvoicesPage;
use crate::frontend::shell::Shell;
use crate::nav;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <Shell>
                <Routes>
                    <Route path=nav::INVOICES.path view=InvoicesPage/>
                    <Route
                        path=nav::PAYMENT_METHODS.path
                        view=|| view! { <Placeholder title=nav::PAYMENT_METHODS.label/> }
                    />
                    <Route
                        path=nav::SERVICES.path
                        view=|| view! { <Placeholder title=nav::SERVICES.label/> }
                    />
                    <Route
                        path=nav::SETTINGS.path
                        view=|| view! { <Placeholder title=nav::SETTINGS.label/> }
                    />
                    <Route path="/*any" view=|| view! { <Placeholder title="Page not found"/> }/>
                </Routes>
            </Shell>
        </Router>
    }
}

/// Destinations without content yet.
#[component]
fn Placeholder(title: &'static str) -> impl IntoView {
    view! {
        <section class="content placeholder">
            <h2>{title}</h2>
        </section>
    }
}
