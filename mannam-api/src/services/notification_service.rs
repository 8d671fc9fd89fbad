//! The notification gateway. Writes the Notification row and publishes a
//! `notification.created` event for the external push transport. Delivery is
//! fire-and-forget: nothing here ever fails the operation that notified.

use diesel::prelude::*;
use uuid::Uuid;

use mannam_shared::errors::{AppError, AppResult, ErrorCode};

use crate::events::publisher;
use crate::models::{NewNotification, Notification, NotificationKind};
use crate::schema::notifications;
use crate::AppState;

pub struct Notify<'a> {
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub title: &'a str,
    pub body: &'a str,
    pub related_match_id: Option<Uuid>,
    pub related_mission_id: Option<Uuid>,
}

/// Persist a notification and announce it. Failures are logged and swallowed.
pub async fn notify(state: &AppState, request: Notify<'_>) {
    let row = NewNotification {
        user_id: request.user_id,
        kind: request.kind.as_str().to_string(),
        title: request.title.to_string(),
        body: request.body.to_string(),
        related_match_id: request.related_match_id,
        related_mission_id: request.related_mission_id,
    };

    let inserted: Result<Notification, _> = state
        .db
        .get()
        .map_err(|e| {
            tracing::error!(error = %e, "failed to get db connection for notification");
        })
        .and_then(|mut conn| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .get_result::<Notification>(&mut conn)
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        user_id = %request.user_id,
                        kind = %request.kind.as_str(),
                        "failed to persist notification"
                    );
                })
        });

    if let Ok(notification) = inserted {
        tracing::debug!(
            notification_id = %notification.id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            "notification created"
        );
        publisher::publish_notification_created(
            &state.rabbitmq,
            notification.id,
            notification.user_id,
            &notification.kind,
        )
        .await;
    }
}

/// List notifications for a user, newest first, with the total for paging.
pub fn list_notifications(
    state: &AppState,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> AppResult<(Vec<Notification>, i64)> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let total: i64 = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .count()
        .get_result(&mut conn)?;

    let items = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .order(notifications::created_at.desc())
        .limit(limit)
        .offset(offset)
        .load::<Notification>(&mut conn)?;

    Ok((items, total))
}

pub fn count_unread(state: &AppState, user_id: Uuid) -> AppResult<i64> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let count = notifications::table
        .filter(notifications::user_id.eq(user_id))
        .filter(notifications::is_read.eq(false))
        .count()
        .get_result(&mut conn)?;

    Ok(count)
}

/// Marks one notification read; only the owner can.
pub fn mark_read(state: &AppState, notification_id: Uuid, user_id: Uuid) -> AppResult<Notification> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    diesel::update(
        notifications::table
            .filter(notifications::id.eq(notification_id))
            .filter(notifications::user_id.eq(user_id)),
    )
    .set(notifications::is_read.eq(true))
    .get_result::<Notification>(&mut conn)
    .map_err(|e| match e {
        diesel::result::Error::NotFound => {
            AppError::new(ErrorCode::NotificationNotFound, "notification not found")
        }
        other => AppError::Database(other),
    })
}

pub fn mark_all_read(state: &AppState, user_id: Uuid) -> AppResult<usize> {
    let mut conn = state.db.get().map_err(|e| AppError::internal(e.to_string()))?;

    let updated = diesel::update(
        notifications::table
            .filter(notifications::user_id.eq(user_id))
            .filter(notifications::is_read.eq(false)),
    )
    .set(notifications::is_read.eq(true))
    .execute(&mut conn)?;

    Ok(updated)
}
