//! Server-side HTML rendering with handlebars.
//!
//! Every page is one view template rendered into the shared layout. View
//! templates interpolate with double braces, so handlebars escapes every
//! value that came from a user or from the database. Only the rendered view
//! body is inserted into the layout unescaped.

use std::fmt;

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;
use workorders_core::{Priority, Status, WorkOrder, format_timestamp};
use workorders_sqlite::StoreStatus;

/// Navigation tabs, in display order.
pub const TABS: [(&str, &str); 5] = [
    ("/add", "Add"),
    ("/list", "List"),
    ("/history", "History"),
    ("/close", "Close"),
    ("/show", "Show"),
];

const LAYOUT: &str = "layout";

const PARTIALS: [(&str, &str); 2] = [
    ("select_options", include_str!("../templates/select_options.hbs")),
    ("orders_table", include_str!("../templates/orders_table.hbs")),
];

const TEMPLATES: [(&str, &str); 7] = [
    (LAYOUT, include_str!("../templates/layout.hbs")),
    (OverviewView::TEMPLATE, include_str!("../templates/overview.hbs")),
    (AddView::TEMPLATE, include_str!("../templates/add.hbs")),
    (ListView::TEMPLATE, include_str!("../templates/list.hbs")),
    (HistoryView::TEMPLATE, include_str!("../templates/history.hbs")),
    (CloseView::TEMPLATE, include_str!("../templates/close.hbs")),
    (ShowView::TEMPLATE, include_str!("../templates/show.hbs")),
];

/// An inline message shown above a view's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Error(String),
}

impl Notice {
    fn kind(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Info(_) => "info",
            Notice::Error(_) => "error",
        }
    }

    fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Info(t) | Notice::Error(t) => t,
        }
    }
}

/// A page body backed by one registered template.
pub trait View: Serialize {
    /// Registered template name.
    const TEMPLATE: &'static str;
    /// Page heading and document title.
    const TITLE: &'static str;
    /// Route of the navigation tab highlighted for this view.
    const PATH: &'static str;
}

/// Compiled template registry.
pub struct Views {
    registry: Handlebars<'static>,
}

impl fmt::Debug for Views {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Views").finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct Tab {
    href: &'static str,
    label: &'static str,
    active: bool,
}

#[derive(Serialize)]
struct NoticeContext<'a> {
    kind: &'static str,
    text: &'a str,
}

#[derive(Serialize)]
struct Layout<'a> {
    title: &'static str,
    tabs: Vec<Tab>,
    notices: Vec<NoticeContext<'a>>,
    body: String,
}

impl Views {
    /// Compiles the layout, partials, and view templates.
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        for (name, source) in PARTIALS {
            registry.register_partial(name, source)?;
        }
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    /// Renders `view` inside the shared layout.
    pub fn page<V: View>(&self, notices: &[Notice], view: &V) -> Result<String, RenderError> {
        let body = self.registry.render(V::TEMPLATE, view)?;
        let layout = Layout {
            title: V::TITLE,
            tabs: TABS
                .iter()
                .map(|&(href, label)| Tab {
                    href,
                    label,
                    active: href == V::PATH,
                })
                .collect(),
            notices: notices
                .iter()
                .map(|notice| NoticeContext {
                    kind: notice.kind(),
                    text: notice.text(),
                })
                .collect(),
            body,
        };
        self.registry.render(LAYOUT, &layout)
    }
}

#[derive(Debug, Serialize)]
struct SelectOption {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

fn priority_options(selected: &str) -> Vec<SelectOption> {
    Priority::ALL
        .iter()
        .map(|p| SelectOption {
            value: p.as_str(),
            label: p.as_str(),
            selected: p.as_str() == selected,
        })
        .collect()
}

fn status_options(selected: Option<Status>) -> Vec<SelectOption> {
    let all = SelectOption {
        value: "",
        label: "(all)",
        selected: selected.is_none(),
    };
    std::iter::once(all)
        .chain(Status::ALL.iter().map(|s| SelectOption {
            value: s.as_str(),
            label: s.as_str(),
            selected: Some(*s) == selected,
        }))
        .collect()
}

/// One work order, formatted for display.
#[derive(Debug, Serialize)]
struct OrderRow {
    id: i64,
    /// Omitted from per-machine history tables.
    machine_id: Option<String>,
    issue: String,
    priority: &'static str,
    status: &'static str,
    created_at: String,
    closed_at: String,
}

impl OrderRow {
    fn new(order: &WorkOrder, with_machine: bool) -> Self {
        Self {
            id: order.id,
            machine_id: with_machine.then(|| order.machine_id.clone()),
            issue: order.issue.clone(),
            priority: order.priority.as_str(),
            status: order.status.as_str(),
            created_at: format_timestamp(&order.created_at),
            closed_at: order
                .closed_at
                .as_ref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn rows(orders: &[WorkOrder], with_machine: bool) -> Vec<OrderRow> {
    orders
        .iter()
        .map(|order| OrderRow::new(order, with_machine))
        .collect()
}

#[derive(Debug, Serialize)]
struct Counts {
    open: usize,
    closed: usize,
    total: usize,
}

/// Landing page with open/closed counts.
#[derive(Debug, Serialize)]
pub struct OverviewView {
    counts: Option<Counts>,
}

impl OverviewView {
    /// Overview without counts, for when the database cannot be read.
    pub fn unavailable() -> Self {
        Self { counts: None }
    }
}

impl From<StoreStatus> for OverviewView {
    fn from(status: StoreStatus) -> Self {
        Self {
            counts: Some(Counts {
                open: status.open_count,
                closed: status.closed_count,
                total: status.total(),
            }),
        }
    }
}

impl View for OverviewView {
    const TEMPLATE: &'static str = "overview";
    const TITLE: &'static str = "Overview";
    const PATH: &'static str = "/";
}

/// Add form, pre-filled with the previous submission.
#[derive(Debug, Serialize)]
pub struct AddView {
    machine_id: String,
    issue: String,
    options: Vec<SelectOption>,
}

impl AddView {
    pub fn new(machine_id: &str, issue: &str, priority: &str) -> Self {
        let selected = if priority.trim().is_empty() {
            Priority::default().as_str()
        } else {
            priority.trim()
        };
        Self {
            machine_id: machine_id.to_string(),
            issue: issue.to_string(),
            options: priority_options(selected),
        }
    }

    pub fn blank() -> Self {
        Self::new("", "", "")
    }
}

impl View for AddView {
    const TEMPLATE: &'static str = "add";
    const TITLE: &'static str = "Add a work order";
    const PATH: &'static str = "/add";
}

/// Status filter plus the matching work orders.
#[derive(Debug, Serialize)]
pub struct ListView {
    options: Vec<SelectOption>,
    orders: Vec<OrderRow>,
    with_machine: bool,
}

impl ListView {
    pub fn new(status: Option<Status>, orders: &[WorkOrder]) -> Self {
        Self {
            options: status_options(status),
            orders: rows(orders, true),
            with_machine: true,
        }
    }
}

impl View for ListView {
    const TEMPLATE: &'static str = "list";
    const TITLE: &'static str = "List work orders";
    const PATH: &'static str = "/list";
}

/// Machine and status form plus that machine's work orders.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    machine_id: String,
    options: Vec<SelectOption>,
    orders: Vec<OrderRow>,
    with_machine: bool,
}

impl HistoryView {
    pub fn new(machine_id: &str, status: Option<Status>, orders: &[WorkOrder]) -> Self {
        Self {
            machine_id: machine_id.to_string(),
            options: status_options(status),
            orders: rows(orders, false),
            with_machine: false,
        }
    }
}

impl View for HistoryView {
    const TEMPLATE: &'static str = "history";
    const TITLE: &'static str = "Machine history";
    const PATH: &'static str = "/history";
}

/// Id form posting to `/close`.
#[derive(Debug, Serialize)]
pub struct CloseView {
    id: String,
}

impl CloseView {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

impl View for CloseView {
    const TEMPLATE: &'static str = "close";
    const TITLE: &'static str = "Close a work order";
    const PATH: &'static str = "/close";
}

/// Id form plus the detail of one work order.
#[derive(Debug, Serialize)]
pub struct ShowView {
    id: String,
    order: Option<OrderRow>,
}

impl ShowView {
    pub fn new(id: &str, order: Option<&WorkOrder>) -> Self {
        Self {
            id: id.to_string(),
            order: order.map(|order| OrderRow::new(order, true)),
        }
    }
}

impl View for ShowView {
    const TEMPLATE: &'static str = "show";
    const TITLE: &'static str = "Show one work order";
    const PATH: &'static str = "/show";
}
