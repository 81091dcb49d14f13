//! Page chrome: sidebar menu plus header.

use leptos::*;
use leptos_router::{use_location, use_navigate, NavigateOptions};

use crate::nav;

#[component]
pub fn Shell(children: Children) -> impl IntoView {
    let location = use_location();
    let selected = create_memo(move |_| {
        location
            .pathname
            .with(|path| nav::selected_destination(path).key)
    });
    let navigate = use_navigate();

    let items = nav::DESTINATIONS
        .iter()
        .map(|dest| {
            let navigate = navigate.clone();
            let class = move || {
                if selected.get() == dest.key {
                    "menu-item menu-item-selected"
                } else {
                    "menu-item"
                }
            };
            view! {
                <li
                    class=class
                    role="menuitem"
                    on:click=move |_| navigate(dest.path, NavigateOptions::default())
                >
                    <span class="menu-icon" aria-hidden="true">{dest.icon.glyph()}</span>
                    <span class="menu-label">{dest.label}</span>
                </li>
            }
        })
        .collect_view();

    view! {
        <div class="layout layout-has-sider">
            <aside class="sider">
                <ul class="menu" role="menu">{items}</ul>
            </aside>
            <div class="layout">
                <header class="header">{nav::HEADER_TITLE}</header>
                <main class="main">{children()}</main>
            </div>
        </div>
    }
}
