//! Sidebar navigation.

/// Title shown in the shell header on every page.
pub const HEADER_TITLE: &str = "Invoices";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Profile,
    CreditCard,
    CloudServer,
    Setting,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Profile => "\u{1F464}",
            Icon::CreditCard => "\u{1F4B3}",
            Icon::CloudServer => "\u{2601}",
            Icon::Setting => "\u{2699}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    pub key: &'static str,
    pub label: &'static str,
    pub icon: Icon,
    pub path: &'static str,
}

pub const INVOICES: Destination = Destination {
    key: "invoices",
    label: "Invoices",
    icon: Icon::Profile,
    path: "/",
};

pub const PAYMENT_METHODS: Destination = Destination {
    key: "payment-methods",
    label: "Payment Methods",
    icon: Icon::CreditCard,
    path: "/payment-methods",
};

pub const SERVICES: Destination = Destination {
    key: "services",
    label: "Services",
    icon: Icon::CloudServer,
    path: "/services",
};

pub const SETTINGS: Destination = Destination {
    key: "settings",
    label: "Settings",
    icon: Icon::Setting,
    path: "/settings",
};

/// Menu order.
pub static DESTINATIONS: [Destination; 4] = [INVOICES, PAYMENT_METHODS, SERVICES, SETTINGS];

impl Destination {
    /// Exact match, or `path` is nested under this destination.
    pub fn matches(&self, path: &str) -> bool {
        path == self.path
            || path
                .strip_prefix(self.path)
                .is_some_and(|rest| rest.starts_with('/'))
    }
}

/// The menu entry to highlight for `path`. Falls back to Invoices.
pub fn selected_destination(path: &str) -> &'static Destination {
    DESTINATIONS
        .iter()
        .find(|dest| dest.matches(path))
        .unwrap_or(&DESTINATIONS[0])
}
