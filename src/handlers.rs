use crate::errors::{AppError, StoreError};
use crate::models::{AddHabitForm, DateKey, PageQuery, SelectionForm, TextRequest};
use crate::state::AppState;
use crate::ui::render_index;
use crate::view::{
    build_day_view, build_month_view, build_page, time_progress, DayView, MonthView, TimeProgress,
};
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

pub async fn index(State(state): State<AppState>, Query(query): Query<PageQuery>) -> Html<String> {
    let today = today();
    let selected = parse_date(query.date.as_deref()).unwrap_or(DateKey::new(today));
    let month = parse_date(query.month.as_deref()).unwrap_or(selected).date();

    let tracker = state.tracker.lock().await;
    let page = build_page(
        &tracker.store,
        selected,
        month,
        today,
        tracker.storage_error.as_deref(),
    );
    Html(render_index(&page))
}

pub async fn get_day(State(state): State<AppState>, Path(date): Path<DateKey>) -> Json<DayView> {
    let tracker = state.tracker.lock().await;
    Json(build_day_view(
        &tracker.store,
        date,
        today(),
        tracker.storage_error.as_deref(),
    ))
}

pub async fn get_month(State(state): State<AppState>, Path(date): Path<DateKey>) -> Json<MonthView> {
    let tracker = state.tracker.lock().await;
    Json(build_month_view(&tracker.store, date.date(), date, today()))
}

pub async fn get_progress() -> Json<TimeProgress> {
    Json(time_progress(today()))
}

pub async fn add_habit(
    State(state): State<AppState>,
    Json(payload): Json<TextRequest>,
) -> Result<Json<DayView>, AppError> {
    let date = DateKey::new(today());
    let view = apply_mutation(&state, date, Mutation::AddHabit(&payload.text)).await?;
    Ok(Json(view))
}

pub async fn delete_habit(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<DayView>, AppError> {
    let date = DateKey::new(today());
    let view = apply_mutation(&state, date, Mutation::DeleteHabit(index)).await?;
    Ok(Json(view))
}

pub async fn toggle_habit(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Result<Json<DayView>, AppError> {
    let view = apply_mutation(&state, date, Mutation::ToggleHabit(index)).await?;
    Ok(Json(view))
}

pub async fn add_task(
    State(state): State<AppState>,
    Path(date): Path<DateKey>,
    Json(payload): Json<TextRequest>,
) -> Result<Json<DayView>, AppError> {
    let view = apply_mutation(&state, date, Mutation::AddTask(&payload.text)).await?;
    Ok(Json(view))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Result<Json<DayView>, AppError> {
    let view = apply_mutation(&state, date, Mutation::ToggleTask(index)).await?;
    Ok(Json(view))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Result<Json<DayView>, AppError> {
    let view = apply_mutation(&state, date, Mutation::DeleteTask(index)).await?;
    Ok(Json(view))
}

pub async fn form_add_habit(State(state): State<AppState>, Form(form): Form<AddHabitForm>) -> Redirect {
    let date = parse_date(form.date.as_deref()).unwrap_or(DateKey::new(today()));
    submit_form(&state, date, Mutation::AddHabit(&form.text)).await
}

pub async fn form_delete_habit(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Form(form): Form<SelectionForm>,
) -> Redirect {
    let date = parse_date(form.date.as_deref()).unwrap_or(DateKey::new(today()));
    submit_form(&state, date, Mutation::DeleteHabit(index)).await
}

pub async fn form_toggle_habit(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Redirect {
    submit_form(&state, date, Mutation::ToggleHabit(index)).await
}

pub async fn form_add_task(
    State(state): State<AppState>,
    Path(date): Path<DateKey>,
    Form(form): Form<TextRequest>,
) -> Redirect {
    submit_form(&state, date, Mutation::AddTask(&form.text)).await
}

pub async fn form_toggle_task(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Redirect {
    submit_form(&state, date, Mutation::ToggleTask(index)).await
}

pub async fn form_delete_task(
    State(state): State<AppState>,
    Path((date, index)): Path<(DateKey, usize)>,
) -> Redirect {
    submit_form(&state, date, Mutation::DeleteTask(index)).await
}

#[derive(Debug, Clone, Copy)]
enum Mutation<'a> {
    AddHabit(&'a str),
    DeleteHabit(usize),
    ToggleHabit(usize),
    AddTask(&'a str),
    ToggleTask(usize),
    DeleteTask(usize),
}

/// Applies one mutation for `date`, saves on success and returns the
/// refreshed day. Empty text and unknown indices leave the day unchanged;
/// edits to past days are refused.
async fn apply_mutation(
    state: &AppState,
    date: DateKey,
    mutation: Mutation<'_>,
) -> Result<DayView, AppError> {
    let today = today();
    let mut tracker = state.tracker.lock().await;

    let store = &mut tracker.store;
    let outcome = match mutation {
        Mutation::AddHabit(text) => store.add_habit(text, date, today),
        Mutation::DeleteHabit(index) => store.delete_habit(index, date, today),
        Mutation::ToggleHabit(index) => store.toggle_habit(date, index, today),
        Mutation::AddTask(text) => store.add_task(date, text, today),
        Mutation::ToggleTask(index) => store.toggle_task(date, index, today),
        Mutation::DeleteTask(index) => store.delete_task(date, index, today),
    };

    match outcome {
        Ok(summary) => {
            debug!(%date, ?mutation, completed = summary.completed, total = summary.total, "applied");
            tracker.save(&state.data_dir).await;
        }
        Err(err @ StoreError::PastDate(_)) => {
            warn!(?mutation, "rejected: {err}");
            return Err(err.into());
        }
        Err(err) => debug!(%date, ?mutation, "ignored: {err}"),
    }

    Ok(build_day_view(
        &tracker.store,
        date,
        today,
        tracker.storage_error.as_deref(),
    ))
}

/// Form routes always land back on the page for `date`; a refused or
/// ignored mutation only shows up in the logs.
async fn submit_form(state: &AppState, date: DateKey, mutation: Mutation<'_>) -> Redirect {
    if let Err(err) = apply_mutation(state, date, mutation).await {
        debug!(%date, status = %err.status, "form submission not applied: {}", err.message);
    }
    redirect_to(date)
}

fn parse_date(raw: Option<&str>) -> Option<DateKey> {
    raw.and_then(|value| value.parse().ok())
}

fn redirect_to(date: DateKey) -> Redirect {
    Redirect::to(&format!("/?date={date}"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
