use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use std::sync::MutexGuard;

use crate::dto::{
    CompletePregnancyReq, CreatePregnancyReq, DatingPreviewReq, DatingSummaryRes, EddReq, EddRes,
    HealthRes, PregnancyFieldChange, PregnancyRes, TrimesterDto, UpdatePregnancyReq,
};
use crate::AppState;
use antenatal_core::dating::{calculate_edd_from_lmp, gestational_age};
use antenatal_core::format::format_date;
use antenatal_core::{
    parse_iso_date, parse_optional_iso_date, BabyGender, BabyStatus, CompletePregnancy,
    CoreError, CoreResult, DatingSummary, DeliveryMode, EddOverride, NonEmptyText, Outcome,
    OutcomeDetails, PregnancyDates, PregnancyField, PregnancyStore, Trimester,
};

pub(crate) type ApiError = (StatusCode, String);

fn reject(context: &str, err: CoreError) -> ApiError {
    let status = match err {
        CoreError::NoActivePregnancy => StatusCode::NOT_FOUND,
        CoreError::PregnancyCompleted(_) => StatusCode::CONFLICT,
        CoreError::InvalidInput(_)
        | CoreError::Date(_)
        | CoreError::Text(_)
        | CoreError::InvalidUtcOffset(_)
        | CoreError::OngoingIsNotAnOutcome => StatusCode::BAD_REQUEST,
    };
    tracing::warn!("{context}: {err}");
    (status, err.to_string())
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, PregnancyStore>, ApiError> {
    state.store.lock().map_err(|_| {
        tracing::error!("pregnancy store lock poisoned");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal error".to_string(),
        )
    })
}

fn parse_author(author: &str) -> CoreResult<NonEmptyText> {
    Ok(NonEmptyText::new(author)?)
}

fn parse_edd_override(
    has_corrected_edd: bool,
    corrected_edd: Option<&str>,
) -> CoreResult<EddOverride> {
    let corrected_edd = if has_corrected_edd {
        parse_optional_iso_date(corrected_edd)?
    } else {
        None
    };
    Ok(EddOverride::from_flag(has_corrected_edd, corrected_edd))
}

fn parse_field_change(change: &PregnancyFieldChange) -> CoreResult<PregnancyField> {
    Ok(match change {
        PregnancyFieldChange::LmpDate { value } => PregnancyField::Lmp(parse_iso_date(value)?),
        PregnancyFieldChange::ScanEdd { value } => {
            PregnancyField::ScanEdd(parse_optional_iso_date(value.as_deref())?)
        }
        PregnancyFieldChange::CorrectedEdd {
            has_corrected_edd,
            corrected_edd,
        } => PregnancyField::EddOverride(parse_edd_override(
            *has_corrected_edd,
            corrected_edd.as_deref(),
        )?),
    })
}

fn parse_optional<T>(value: Option<&str>) -> CoreResult<Option<T>>
where
    T: std::str::FromStr<Err = CoreError>,
{
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

fn parse_completion(req: &CompletePregnancyReq) -> CoreResult<CompletePregnancy> {
    let outcome: Outcome = req.outcome.parse()?;
    let mut details = OutcomeDetails::new(parse_iso_date(&req.outcome_date)?);
    details.delivery_mode = parse_optional::<DeliveryMode>(req.delivery_mode.as_deref())?;
    details.birth_weight_grams = req.birth_weight_grams;
    details.baby_gender = parse_optional::<BabyGender>(req.baby_gender.as_deref())?;
    details.baby_status = parse_optional::<BabyStatus>(req.baby_status.as_deref())?;
    details.remarks = NonEmptyText::optional(req.remarks.as_deref());

    Ok(CompletePregnancy { outcome, details })
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Liveness probe.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Antenatal REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/dating/edd",
    request_body = EddReq,
    responses(
        (status = 200, description = "EDD calculated from LMP", body = EddRes),
        (status = 400, description = "Invalid LMP date")
    )
)]
/// Calculate the estimated due date from an LMP date (LMP + 280 days).
#[axum::debug_handler]
pub(crate) async fn calculate_edd(
    State(_state): State<AppState>,
    Json(req): Json<EddReq>,
) -> Result<Json<EddRes>, ApiError> {
    let lmp = parse_iso_date(&req.lmp_date).map_err(|e| reject("calculate EDD", e.into()))?;
    let edd = calculate_edd_from_lmp(lmp);

    Ok(Json(EddRes {
        lmp_date: lmp.to_string(),
        edd: edd.to_string(),
        edd_display: format_date(edd),
    }))
}

#[utoipa::path(
    post,
    path = "/dating/summary",
    request_body = DatingPreviewReq,
    responses(
        (status = 200, description = "Dating preview", body = DatingSummaryRes),
        (status = 400, description = "Invalid date")
    )
)]
/// Preview the dating summary for unsaved form values.
///
/// Without an LMP only the gestational age (from a scan EDD, if given) is computed; EDD fields
/// come back as placeholders.
#[axum::debug_handler]
pub(crate) async fn preview_summary(
    State(state): State<AppState>,
    Json(req): Json<DatingPreviewReq>,
) -> Result<Json<DatingSummaryRes>, ApiError> {
    let preview = || -> CoreResult<DatingSummaryRes> {
        let today = parse_optional_iso_date(req.today.as_deref())?
            .unwrap_or_else(|| state.clock.today());
        let lmp = parse_optional_iso_date(req.lmp_date.as_deref())?;
        let scan_edd = parse_optional_iso_date(req.scan_edd.as_deref())?;
        let edd_override =
            parse_edd_override(req.has_corrected_edd, req.corrected_edd.as_deref())?;

        Ok(match lmp {
            Some(lmp) => {
                let dates = PregnancyDates::new(lmp)
                    .with_scan_edd(scan_edd)
                    .with_edd_override(edd_override);
                DatingSummary::compute(&dates, today).into()
            }
            None => DatingSummaryRes::partial(today, gestational_age(None, scan_edd, today)),
        })
    };

    preview()
        .map(Json)
        .map_err(|e| reject("preview summary", e))
}

#[utoipa::path(
    get,
    path = "/dating/trimester/{weeks}",
    params(
        ("weeks" = i64, Path, description = "Completed gestational weeks")
    ),
    responses(
        (status = 200, description = "Trimester for the given week", body = TrimesterDto)
    )
)]
#[axum::debug_handler]
pub(crate) async fn trimester(
    State(_state): State<AppState>,
    Path(weeks): Path<i64>,
) -> Json<TrimesterDto> {
    Json(Trimester::from_weeks(weeks).into())
}

#[utoipa::path(
    get,
    path = "/pregnancy",
    responses(
        (status = 200, description = "Current pregnancy record", body = PregnancyRes),
        (status = 404, description = "No pregnancy recorded")
    )
)]
/// Fetch the current pregnancy record with its dating summary.
#[axum::debug_handler]
pub(crate) async fn get_pregnancy(
    State(state): State<AppState>,
) -> Result<Json<PregnancyRes>, ApiError> {
    let store = lock_store(&state)?;
    let record = store
        .current()
        .ok_or_else(|| reject("get pregnancy", CoreError::NoActivePregnancy))?;

    Ok(Json(PregnancyRes::new(
        record,
        store.clock().today(),
        state.cfg.utc_offset(),
    )))
}

#[utoipa::path(
    post,
    path = "/pregnancy",
    request_body = CreatePregnancyReq,
    responses(
        (status = 201, description = "Pregnancy recorded", body = PregnancyRes),
        (status = 400, description = "Bad request")
    )
)]
/// Record a new pregnancy, replacing any existing record.
#[axum::debug_handler]
pub(crate) async fn create_pregnancy(
    State(state): State<AppState>,
    Json(req): Json<CreatePregnancyReq>,
) -> Result<(StatusCode, Json<PregnancyRes>), ApiError> {
    let parsed = || -> CoreResult<(PregnancyDates, NonEmptyText)> {
        let dates = PregnancyDates::new(parse_iso_date(&req.lmp_date)?)
            .with_scan_edd(parse_optional_iso_date(req.scan_edd.as_deref())?)
            .with_edd_override(parse_edd_override(
                req.has_corrected_edd,
                req.corrected_edd.as_deref(),
            )?);
        Ok((dates, parse_author(&req.author)?))
    };
    let (dates, author) = parsed().map_err(|e| reject("create pregnancy", e))?;

    let mut store = lock_store(&state)?;
    let today = store.clock().today();
    let record = store.add(dates, author);

    Ok((
        StatusCode::CREATED,
        Json(PregnancyRes::new(record, today, state.cfg.utc_offset())),
    ))
}

#[utoipa::path(
    patch,
    path = "/pregnancy",
    request_body = UpdatePregnancyReq,
    responses(
        (status = 200, description = "Pregnancy updated", body = PregnancyRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "No pregnancy recorded"),
        (status = 409, description = "Pregnancy already completed")
    )
)]
/// Apply field edits to the ongoing pregnancy.
///
/// Every change is validated before any is applied.
#[axum::debug_handler]
pub(crate) async fn update_pregnancy(
    State(state): State<AppState>,
    Json(req): Json<UpdatePregnancyReq>,
) -> Result<Json<PregnancyRes>, ApiError> {
    let parsed = || -> CoreResult<(Vec<PregnancyField>, NonEmptyText)> {
        let fields = req
            .changes
            .iter()
            .map(parse_field_change)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok((fields, parse_author(&req.author)?))
    };
    let (fields, author) = parsed().map_err(|e| reject("update pregnancy", e))?;

    let mut store = lock_store(&state)?;
    if fields.is_empty() {
        store
            .current()
            .ok_or_else(|| reject("update pregnancy", CoreError::NoActivePregnancy))?;
    }
    for field in fields {
        store
            .update(field, author.clone())
            .map_err(|e| reject("update pregnancy", e))?;
    }

    let today = store.clock().today();
    let record = store
        .current()
        .ok_or_else(|| reject("update pregnancy", CoreError::NoActivePregnancy))?;
    Ok(Json(PregnancyRes::new(record, today, state.cfg.utc_offset())))
}

#[utoipa::path(
    post,
    path = "/pregnancy/complete",
    request_body = CompletePregnancyReq,
    responses(
        (status = 200, description = "Pregnancy completed", body = PregnancyRes),
        (status = 400, description = "Bad request"),
        (status = 404, description = "No pregnancy recorded"),
        (status = 409, description = "Pregnancy already completed")
    )
)]
/// Close the ongoing pregnancy with its outcome.
#[axum::debug_handler]
pub(crate) async fn complete_pregnancy(
    State(state): State<AppState>,
    Json(req): Json<CompletePregnancyReq>,
) -> Result<Json<PregnancyRes>, ApiError> {
    let parsed = || -> CoreResult<(CompletePregnancy, NonEmptyText)> {
        Ok((parse_completion(&req)?, parse_author(&req.author)?))
    };
    let (request, author) = parsed().map_err(|e| reject("complete pregnancy", e))?;

    let mut store = lock_store(&state)?;
    let today = store.clock().today();
    let record = store
        .complete(request, author)
        .map_err(|e| reject("complete pregnancy", e))?;

    Ok(Json(PregnancyRes::new(record, today, state.cfg.utc_offset())))
}

#[utoipa::path(
    delete,
    path = "/pregnancy",
    responses(
        (status = 204, description = "Pregnancy removed"),
        (status = 404, description = "No pregnancy recorded")
    )
)]
/// Discard the pregnancy record, whatever its state.
#[axum::debug_handler]
pub(crate) async fn remove_pregnancy(
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = lock_store(&state)?;
    match store.remove() {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(reject("remove pregnancy", CoreError::NoActivePregnancy)),
    }
}
