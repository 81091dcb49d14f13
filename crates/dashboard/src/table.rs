//! Invoice table: column sorting and cell formatting.
//!
//! Sorting is local to the rows currently held; it never triggers a fetch.

use std::cmp::Ordering;

use chrono::{DateTime, Local, TimeZone, Utc};

use billing_invoicing::{Invoice, InvoiceStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Service,
    InvoiceNumber,
    Date,
    Amount,
    Status,
}

impl Column {
    /// Sortable columns, in display order. A trailing actions column
    /// ("Show") is rendered after these.
    pub const ALL: [Column; 5] = [
        Column::Service,
        Column::InvoiceNumber,
        Column::Date,
        Column::Amount,
        Column::Status,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Column::Service => "Service",
            Column::InvoiceNumber => "Invoice No",
            Column::Date => "Date",
            Column::Amount => "Amount",
            Column::Status => "Status",
        }
    }

    /// Ascending comparison for this column.
    pub fn compare(&self, a: &Invoice, b: &Invoice) -> Ordering {
        match self {
            Column::Service => a.service_name.as_str().cmp(b.service_name.as_str()),
            Column::InvoiceNumber => a.id.to_string().cmp(&b.id.to_string()),
            Column::Date => a.date.cmp(&b.date),
            Column::Amount => a.amount.total_cmp(&b.amount),
            Column::Status => a.status.as_str().cmp(b.status.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "\u{25B2}",
            SortOrder::Descend => "\u{25BC}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub order: SortOrder,
}

/// Header click: unsorted -> ascending -> descending -> unsorted on the same
/// column; a different column starts over at ascending.
pub fn next_sort(current: Option<SortState>, clicked: Column) -> Option<SortState> {
    match current {
        Some(SortState { column, order }) if column == clicked => match order {
            SortOrder::Ascend => Some(SortState {
                column,
                order: SortOrder::Descend,
            }),
            SortOrder::Descend => None,
        },
        _ => Some(SortState {
            column: clicked,
            order: SortOrder::Ascend,
        }),
    }
}

/// Rows in display order. Stable, so ties keep the fetched order.
pub fn sort_rows(rows: &[Invoice], sort: Option<SortState>) -> Vec<Invoice> {
    let mut out = rows.to_vec();
    if let Some(SortState { column, order }) = sort {
        out.sort_by(|a, b| {
            let ord = column.compare(a, b);
            match order {
                SortOrder::Ascend => ord,
                SortOrder::Descend => ord.reverse(),
            }
        });
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagColor {
    Green,
    Red,
    Orange,
}

impl TagColor {
    pub fn css_class(&self) -> &'static str {
        match self {
            TagColor::Green => "tag tag-green",
            TagColor::Red => "tag tag-red",
            TagColor::Orange => "tag tag-orange",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTag {
    pub color: TagColor,
    pub label: &'static str,
}

pub fn status_tag(status: InvoiceStatus) -> StatusTag {
    let color = match status {
        InvoiceStatus::Paid => TagColor::Green,
        InvoiceStatus::Unpaid => TagColor::Red,
        InvoiceStatus::Pending => TagColor::Orange,
    };
    StatusTag {
        color,
        label: status.as_str(),
    }
}

/// Long-form calendar date in the viewer's local time zone (the browser's
/// on wasm32), e.g. "January 5, 2024".
pub fn format_date(date: &DateTime<Utc>) -> String {
    format_date_in(date, &Local)
}

/// Long-form calendar date of `date` as seen in `tz`.
pub fn format_date_in<Tz: TimeZone>(date: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.with_timezone(tz).format("%B %-d, %Y").to_string()
}

/// Amounts render as plain numbers: 300.0 shows as "300".
pub fn format_amount(amount: f64) -> String {
    amount.to_string()
}
