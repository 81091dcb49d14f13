//! Invoice list page.

use leptos::*;

use billing_invoicing::Invoice;

use crate::client::{ApiClient, InvoiceQuery};
use crate::config::DashboardConfig;
use crate::list_view::{InvoiceListState, ListBody};
use crate::table::{self, Column, SortState};

#[component]
pub fn InvoicesPage() -> impl IntoView {
    let client = store_value(ApiClient::from_config(&DashboardConfig::load()));
    let state = create_rw_signal(InvoiceListState::new());
    let sort = create_rw_signal(None::<SortState>);
    let search = create_rw_signal(String::new());

    let fetch = move |query: InvoiceQuery| {
        state.update(InvoiceListState::begin_fetch);
        let client = client.get_value();
        spawn_local(async move {
            let result = client.list_invoices(&query).await;
            state.update(|s| s.finish_fetch(result));
        });
    };

    fetch(InvoiceQuery::All);

    let on_search = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        fetch(InvoiceQuery::search(search.get_untracked()));
    };

    let failure = create_memo(move |_| {
        state.with(|s| match s.body() {
            ListBody::Failed(message) => Some(message.to_string()),
            ListBody::Table { .. } => None,
        })
    });

    move || match failure.get() {
        Some(message) => view! { <ErrorBanner message=message/> }.into_view(),
        None => view! {
            <section class="content">
                <form class="toolbar" on:submit=on_search>
                    <input
                        type="search"
                        class="search-input"
                        placeholder="Search invoices"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <button type="submit" class="search-button">"Search"</button>
                    <button type="button" class="download-button" title="Download">
                        "\u{2913}"
                    </button>
                </form>
                <InvoiceTable state=state sort=sort/>
            </section>
        }
        .into_view(),
    }
}

#[component]
fn InvoiceTable(state: RwSignal<InvoiceListState>, sort: RwSignal<Option<SortState>>) -> impl IntoView {
    let rows = move || {
        state.with(|s| match s.body() {
            ListBody::Table { rows, .. } => table::sort_rows(rows, sort.get()),
            ListBody::Failed(_) => Vec::new(),
        })
    };
    let loading = move || state.with(InvoiceListState::is_loading);

    let headers = Column::ALL
        .iter()
        .map(|&column| {
            let indicator = move || match sort.get() {
                Some(current) if current.column == column => current.order.arrow(),
                _ => "",
            };
            view! {
                <th
                    class="sortable"
                    on:click=move |_| sort.update(|s| *s = table::next_sort(*s, column))
                >
                    {column.title()}
                    <span class="sort-indicator">{indicator}</span>
                </th>
            }
        })
        .collect_view();

    view! {
        <div class=move || if loading() { "table-wrapper table-loading" } else { "table-wrapper" }>
            <table class="table">
                <thead>
                    <tr>
                        {headers}
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let rows = rows();
                        if rows.is_empty() && !loading() {
                            view! {
                                <tr class="table-empty">
                                    <td colspan="6">"No data"</td>
                                </tr>
                            }
                            .into_view()
                        } else {
                            rows.into_iter()
                                .map(|invoice| view! { <InvoiceRow invoice=invoice/> })
                                .collect_view()
                        }
                    }}
                </tbody>
            </table>
        </div>
    }
}

#[component]
fn InvoiceRow(invoice: Invoice) -> impl IntoView {
    let tag = table::status_tag(invoice.status);

    view! {
        <tr>
            <td>{invoice.service_name.as_str()}</td>
            <td>{invoice.id.to_string()}</td>
            <td>{table::format_date(&invoice.date)}</td>
            <td>{table::format_amount(invoice.amount)}</td>
            <td>
                <span class=tag.color.css_class()>{tag.label}</span>
            </td>
            <td>
                // No detail view yet.
                <a class="row-action">"Show"</a>
            </td>
        </tr>
    }
}

#[component]
fn ErrorBanner(message: String) -> impl IntoView {
    view! {
        <div class="alert alert-error" role="alert">
            <div class="alert-message">"Error"</div>
            <div class="alert-description">{message}</div>
        </div>
    }
}
