use axum::{
    extract::{Path, State},
    http::header,
    response::Html,
    Json,
};
use chrono::{Datelike, Local, NaiveDate};

use crate::backup;
use crate::calendar::{current_period, format_local_date, parse_date_key};
use crate::config;
use crate::errors::AppError;
use crate::models::{
    AppData, DayRecord, DayResponse, PeriodGoal, PeriodResponse, PeriodsResponse, StateResponse,
    StateUpdate, TagOption, TagsUpdateRequest, ViewUpdateRequest, INDICATOR_SLOTS,
};
use crate::state::AppState;
use crate::summary::{summarize, PeriodSummary};
use crate::ui::render_index;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = Local::now().date_naive();
    let current = current_period(&state.periods, today);
    Html(render_index(
        config::YEAR,
        &format_local_date(today),
        current.map(|p| p.index),
    ))
}

pub async fn get_periods(State(state): State<AppState>) -> Json<PeriodsResponse> {
    let today = Local::now().date_naive();
    let periods = state
        .periods
        .iter()
        .map(|p| PeriodResponse {
            index: p.index,
            start_date: format_local_date(p.start_date),
            end_date: format_local_date(p.end_date),
            day_count: p.day_count,
        })
        .collect();

    Json(PeriodsResponse {
        year: config::YEAR,
        today: format_local_date(today),
        current_index: current_period(&state.periods, today).map(|p| p.index),
        periods,
    })
}

pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    let store = state.store.lock().await;
    Json(state_response(store.state()))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = validate_date(&date)?;
    let key = format_local_date(date);

    let store = state.store.lock().await;
    let record = store.state().day_records.get(&key).cloned();

    Ok(Json(DayResponse {
        date: key,
        has_data: record.as_ref().is_some_and(|r| !r.is_empty()),
        record: record.unwrap_or_default(),
    }))
}

pub async fn put_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(mut record): Json<DayRecord>,
) -> Result<Json<DayResponse>, AppError> {
    let date = validate_date(&date)?;
    let key = format_local_date(date);

    if let Some(mood) = record.mood {
        if !(1..=5).contains(&mood) {
            return Err(AppError::bad_request("mood must be between 1 and 5"));
        }
    }
    if let Some(energy) = record.energy_level {
        if energy > 100 {
            return Err(AppError::bad_request("energy level must be between 0 and 100"));
        }
    }
    record.indicator_checkins.truncate(INDICATOR_SLOTS);
    record.checkin_texts.truncate(INDICATOR_SLOTS);
    record.three_good_things.truncate(3);

    let mut store = state.store.lock().await;
    let mut records = store.state().day_records.clone();
    records.insert(key.clone(), record.clone());
    store.set_state(StateUpdate::day_records(records));

    Ok(Json(DayResponse {
        date: key,
        has_data: !record.is_empty(),
        record,
    }))
}

pub async fn delete_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = validate_date(&date)?;
    let key = format_local_date(date);

    let mut store = state.store.lock().await;
    let mut records = store.state().day_records.clone();
    records.remove(&key);
    store.set_state(StateUpdate::day_records(records));

    Ok(Json(DayResponse {
        date: key,
        has_data: false,
        record: DayRecord::default(),
    }))
}

pub async fn get_goal(
    State(state): State<AppState>,
    Path(index): Path<u32>,
) -> Result<Json<PeriodGoal>, AppError> {
    validate_period_index(index)?;

    let store = state.store.lock().await;
    let mut goal = store
        .state()
        .period_goals
        .get(&index)
        .cloned()
        .unwrap_or_default();
    goal.normalize();

    Ok(Json(goal))
}

pub async fn put_goal(
    State(state): State<AppState>,
    Path(index): Path<u32>,
    Json(mut goal): Json<PeriodGoal>,
) -> Result<Json<PeriodGoal>, AppError> {
    validate_period_index(index)?;
    goal.normalize();

    let mut store = state.store.lock().await;
    let mut goals = store.state().period_goals.clone();
    goals.insert(index, goal.clone());
    store.set_state(StateUpdate::period_goals(goals));

    Ok(Json(goal))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(index): Path<u32>,
) -> Result<Json<PeriodSummary>, AppError> {
    validate_period_index(index)?;
    let period = &state.periods[index as usize - 1];

    let store = state.store.lock().await;
    Ok(Json(summarize(period, &store.state().day_records)))
}

pub async fn put_tags(
    State(state): State<AppState>,
    Json(tags): Json<TagsUpdateRequest>,
) -> Json<StateResponse> {
    let mut store = state.store.lock().await;
    store.set_state(StateUpdate {
        custom_emotions: tags.custom_emotions,
        custom_nourishments: tags.custom_nourishments,
        ..StateUpdate::default()
    });

    Json(state_response(store.state()))
}

/// Records which page and period the user is looking at. Transient state:
/// it fans out to subscribers but is never persisted.
pub async fn put_view(
    State(state): State<AppState>,
    Json(view): Json<ViewUpdateRequest>,
) -> Result<Json<()>, AppError> {
    if let Some(index) = view.viewed_period_index {
        validate_period_index(index)?;
    }

    let mut store = state.store.lock().await;
    store.set_state(StateUpdate {
        current_view: view.current_view,
        viewed_period_index: view.viewed_period_index,
        ..StateUpdate::default()
    });

    Ok(Json(()))
}

pub async fn get_backup(
    State(state): State<AppState>,
) -> Result<([(header::HeaderName, &'static str); 1], String), AppError> {
    let store = state.store.lock().await;
    let blob = backup::create_backup(store.state(), &Local::now().to_rfc3339())
        .map_err(AppError::internal)?;

    Ok(([(header::CONTENT_TYPE, "application/json")], blob))
}

pub async fn restore_backup(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<StateResponse>, AppError> {
    let data = backup::parse_backup(&body).map_err(|err| AppError::bad_request(err.to_string()))?;

    let mut store = state.store.lock().await;
    store.set_state(data.into_update());

    Ok(Json(state_response(store.state())))
}

pub async fn get_auto_backups(State(state): State<AppState>) -> Json<Vec<backup::Backup>> {
    let store = state.store.lock().await;
    Json(backup::auto_backups(store.storage()))
}

fn state_response(data: &AppData) -> StateResponse {
    StateResponse {
        day_records: data.day_records.clone(),
        period_goals: data.period_goals.clone(),
        custom_emotions: data.custom_emotions.clone(),
        custom_nourishments: data.custom_nourishments.clone(),
        default_emotions: default_tags(config::DEFAULT_EMOTIONS),
        default_nourishments: default_tags(config::DEFAULT_NOURISHMENTS),
    }
}

fn default_tags(defaults: &[(&str, &str)]) -> Vec<TagOption> {
    defaults
        .iter()
        .map(|&(text, value)| TagOption::new(text, value))
        .collect()
}

fn validate_date(raw: &str) -> Result<NaiveDate, AppError> {
    let date = parse_date_key(raw)
        .ok_or_else(|| AppError::bad_request("date must be formatted YYYY-MM-DD"))?;
    if date.year() != config::YEAR {
        return Err(AppError::bad_request(format!(
            "date must fall within {}",
            config::YEAR
        )));
    }
    Ok(date)
}

fn validate_period_index(index: u32) -> Result<(), AppError> {
    if index == 0 || index > config::PERIOD_COUNT {
        return Err(AppError::not_found(format!(
            "no period with index {index}"
        )));
    }
    Ok(())
}
