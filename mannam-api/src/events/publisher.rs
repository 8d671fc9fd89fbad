//! Fire-and-forget domain event publishers. A failed publish is logged and
//! never surfaces to the operation that triggered it.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use mannam_shared::clients::rabbitmq::RabbitMQClient;
use mannam_shared::types::event::{payloads, routing_keys, Event};

const SOURCE: &str = "mannam-api";

pub async fn publish_match_created(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
    compatibility_score: f64,
    expires_at: DateTime<Utc>,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::MATCH_CREATED,
        payloads::MatchCreated {
            match_id,
            user_a_id,
            user_b_id,
            compatibility_score,
            expires_at,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCH_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish match.created event");
    }
}

/// Accepted, rejected, and completed share a payload; the routing key and
/// status field carry the distinction.
pub async fn publish_match_resolved(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
    status: &str,
) {
    let routing_key = match status {
        "accepted" => routing_keys::MATCH_ACCEPTED,
        "rejected" => routing_keys::MATCH_REJECTED,
        "completed" => routing_keys::MATCH_COMPLETED,
        _ => routing_keys::MATCH_EXPIRED,
    };

    let event = Event::new(
        SOURCE,
        routing_key,
        payloads::MatchResolved {
            match_id,
            user_a_id,
            user_b_id,
            status: status.to_string(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_key, &event).await {
        tracing::error!(error = %e, status = %status, "failed to publish match resolution event");
    }
}

pub async fn publish_match_expired(
    rabbitmq: &RabbitMQClient,
    match_id: Uuid,
    user_a_id: Uuid,
    user_b_id: Uuid,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::MATCH_EXPIRED,
        payloads::MatchExpired {
            match_id,
            user_a_id,
            user_b_id,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MATCH_EXPIRED, &event).await {
        tracing::error!(error = %e, "failed to publish match.expired event");
    }
}

pub async fn publish_mission_created(
    rabbitmq: &RabbitMQClient,
    mission_id: Uuid,
    match_id: Uuid,
    place_name: &str,
    meeting_time: DateTime<Utc>,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::MISSION_CREATED,
        payloads::MissionCreated {
            mission_id,
            match_id,
            place_name: place_name.to_string(),
            meeting_time,
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MISSION_CREATED, &event).await {
        tracing::error!(error = %e, "failed to publish mission.created event");
    }
}

pub async fn publish_mission_cancelled(
    rabbitmq: &RabbitMQClient,
    mission_id: Uuid,
    match_id: Uuid,
    reason: &str,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::MISSION_CANCELLED,
        payloads::MissionCancelled {
            mission_id,
            match_id,
            reason: reason.to_string(),
        },
    );

    if let Err(e) = rabbitmq.publish(routing_keys::MISSION_CANCELLED, &event).await {
        tracing::error!(error = %e, "failed to publish mission.cancelled event");
    }
}

pub async fn publish_departure_confirmed(
    rabbitmq: &RabbitMQClient,
    mission_id: Uuid,
    user_id: Uuid,
    both_confirmed: bool,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::DEPARTURE_CONFIRMED,
        payloads::DepartureConfirmed {
            mission_id,
            user_id,
            both_confirmed,
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq.publish(routing_keys::DEPARTURE_CONFIRMED, &event).await {
        tracing::error!(error = %e, "failed to publish departure.confirmed event");
    }
}

pub async fn publish_noshow_recorded(
    rabbitmq: &RabbitMQClient,
    check_id: Uuid,
    mission_id: Uuid,
    user_id: Uuid,
    no_show_count: i32,
    banned: bool,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::NO_SHOW_RECORDED,
        payloads::NoShowRecorded {
            check_id,
            mission_id,
            user_id,
            no_show_count,
            banned,
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq.publish(routing_keys::NO_SHOW_RECORDED, &event).await {
        tracing::error!(error = %e, "failed to publish noshow.recorded event");
    }
}

pub async fn publish_user_banned(rabbitmq: &RabbitMQClient, user_id: Uuid, no_show_count: i32) {
    let event = Event::new(
        SOURCE,
        routing_keys::USER_BANNED,
        payloads::UserBanned {
            user_id,
            no_show_count,
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq.publish(routing_keys::USER_BANNED, &event).await {
        tracing::error!(error = %e, "failed to publish user.banned event");
    }
}

pub async fn publish_notification_created(
    rabbitmq: &RabbitMQClient,
    notification_id: Uuid,
    user_id: Uuid,
    kind: &str,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::NOTIFICATION_CREATED,
        payloads::NotificationCreated {
            notification_id,
            user_id,
            kind: kind.to_string(),
        },
    )
    .with_user(user_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::NOTIFICATION_CREATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish notification.created event");
    }
}

pub async fn publish_safety_report_created(
    rabbitmq: &RabbitMQClient,
    report_id: Uuid,
    reporter_id: Uuid,
    reported_id: Uuid,
    category: &str,
) {
    let event = Event::new(
        SOURCE,
        routing_keys::SAFETY_REPORT_CREATED,
        payloads::SafetyReportCreated {
            report_id,
            reporter_id,
            reported_id,
            category: category.to_string(),
        },
    )
    .with_user(reporter_id);

    if let Err(e) = rabbitmq
        .publish(routing_keys::SAFETY_REPORT_CREATED, &event)
        .await
    {
        tracing::error!(error = %e, "failed to publish safety.report.created event");
    }
}
