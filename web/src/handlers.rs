//! Route handlers, one per view.
//!
//! Handlers never propagate storage errors to axum: every failure becomes an
//! inline [`Notice::Error`] on the rendered page. Domain errors keep HTTP
//! 200; database failures answer 500 with the same page.

use std::sync::Arc;

use axum::Form;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;
use tracing::{error, warn};
use workorders_core::{NewWorkOrder, Status, ValidationError, format_timestamp};

use crate::render::{
    AddView, CloseView, HistoryView, ListView, Notice, OverviewView, ShowView, View,
};
use crate::{AppState, WebError, with_store};

type SharedState = Arc<AppState>;

fn respond<V: View>(state: &AppState, status: StatusCode, notices: &[Notice], view: &V) -> Response {
    match state.views.page(notices, view) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, template = V::TEMPLATE, "page rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
        }
    }
}

fn ok<V: View>(state: &AppState, notices: &[Notice], view: &V) -> Response {
    respond(state, StatusCode::OK, notices, view)
}

/// Renders `view` with the failure as an inline error.
fn failed<V: View>(state: &AppState, err: &WebError, view: &V) -> Response {
    let status = err.status_code();
    if status.is_server_error() {
        warn!(error = %err, view = V::PATH, "request failed");
    }
    respond(state, status, &[Notice::Error(err.to_string())], view)
}

/// Parses an optional status filter where blank or `(all)` means no filter.
fn parse_status_filter(raw: Option<&str>) -> Result<Option<Status>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") | Some("(all)") | Some("all") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

fn parse_id(raw: &str) -> Result<i64, WebError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| WebError::InvalidId(raw.trim().to_string()))
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index(State(state): State<SharedState>) -> Response {
    match with_store(&state, |store| store.status()).await {
        Ok(status) => ok(&state, &[], &OverviewView::from(status)),
        Err(err) => failed(&state, &err, &OverviewView::unavailable()),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub priority: String,
}

pub async fn add_page(State(state): State<SharedState>) -> Response {
    ok(&state, &[], &AddView::blank())
}

pub async fn add_submit(State(state): State<SharedState>, Form(form): Form<AddForm>) -> Response {
    let resubmit = AddView::new(&form.machine_id, &form.issue, &form.priority);

    let order = match NewWorkOrder::parse(&form.machine_id, &form.issue, &form.priority) {
        Ok(order) => order,
        Err(err) => return failed(&state, &WebError::from(err), &resubmit),
    };

    match with_store(&state, move |store| store.add(&order)).await {
        Ok(id) => ok(
            &state,
            &[Notice::Success(format!("Added work order #{id}"))],
            &AddView::blank(),
        ),
        Err(err) => failed(&state, &err, &resubmit),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list_page(State(state): State<SharedState>, Query(query): Query<ListQuery>) -> Response {
    let status = match parse_status_filter(query.status.as_deref()) {
        Ok(status) => status,
        Err(err) => return failed(&state, &WebError::from(err), &ListView::new(None, &[])),
    };

    match with_store(&state, move |store| store.list(status)).await {
        Ok(orders) => {
            let notices = if orders.is_empty() {
                vec![Notice::Info("No work orders found.".into())]
            } else {
                Vec::new()
            };
            ok(&state, &notices, &ListView::new(status, &orders))
        }
        Err(err) => failed(&state, &err, &ListView::new(status, &[])),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub machine_id: Option<String>,
    pub status: Option<String>,
}

pub async fn history_page(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let machine_id = query.machine_id.as_deref().unwrap_or("").trim().to_string();
    let status = match parse_status_filter(query.status.as_deref()) {
        Ok(status) => status,
        Err(err) => {
            let view = HistoryView::new(&machine_id, None, &[]);
            return failed(&state, &WebError::from(err), &view);
        }
    };

    // First visit: no submission yet.
    if query.machine_id.is_none() {
        return ok(&state, &[], &HistoryView::new("", status, &[]));
    }

    let lookup = machine_id.clone();
    match with_store(&state, move |store| store.history(&lookup, status)).await {
        Ok(orders) => {
            let notices = if orders.is_empty() {
                vec![Notice::Info(format!(
                    "No work orders found for machine {machine_id}."
                ))]
            } else {
                Vec::new()
            };
            ok(&state, &notices, &HistoryView::new(&machine_id, status, &orders))
        }
        Err(err) => failed(&state, &err, &HistoryView::new(&machine_id, status, &[])),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseForm {
    #[serde(default)]
    pub id: String,
}

pub async fn close_page(State(state): State<SharedState>) -> Response {
    ok(&state, &[], &CloseView::new(""))
}

pub async fn close_submit(State(state): State<SharedState>, Form(form): Form<CloseForm>) -> Response {
    let resubmit = CloseView::new(&form.id);

    let id = match parse_id(&form.id) {
        Ok(id) => id,
        Err(err) => return failed(&state, &err, &resubmit),
    };

    match with_store(&state, move |store| store.close(id)).await {
        Ok(order) => {
            let mut notices = vec![Notice::Success(format!("Closed work order #{}", order.id))];
            if let Some(closed_at) = &order.closed_at {
                notices.push(Notice::Info(format!(
                    "Closed At: {}",
                    format_timestamp(closed_at)
                )));
            }
            ok(&state, &notices, &CloseView::new(""))
        }
        Err(err) => failed(&state, &err, &resubmit),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShowQuery {
    pub id: Option<String>,
}

pub async fn show_page(State(state): State<SharedState>, Query(query): Query<ShowQuery>) -> Response {
    let Some(raw) = query.id else {
        return ok(&state, &[], &ShowView::new("", None));
    };

    let id = match parse_id(&raw) {
        Ok(id) => id,
        Err(err) => return failed(&state, &err, &ShowView::new(&raw, None)),
    };

    match with_store(&state, move |store| store.get_by_id(id)).await {
        Ok(order) => ok(&state, &[], &ShowView::new(&raw, Some(&order))),
        Err(err) => failed(&state, &err, &ShowView::new(&raw, None)),
    }
}
