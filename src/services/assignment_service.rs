use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::{ensure_owner, require_trainer, UserSession};
use crate::error::{FieldErrors, GymError, GymResult};
use crate::models::Routine;
use crate::services::routine_service::ROUTINE_COLUMNS;

/// A routine a trainer handed to a client.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AssignedRoutine {
    pub routine_id: Uuid,
    pub routine_name: String,
    pub client_id: Uuid,
    pub client_username: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Routines assigned to one client.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRoutines {
    pub client_id: Uuid,
    pub username: String,
    pub routines: Vec<AssignedRoutine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientOverview {
    pub clients: Vec<ClientRoutines>,
    pub total_clients: usize,
    pub total_routines: usize,
}

#[derive(Clone)]
pub struct AssignmentService {
    db: PgPool,
}

impl AssignmentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Copy one of the trainer's routines, with all its entries, to `recipient_id`.
    ///
    /// Runs in a single transaction; a missing recipient is a validation error and leaves the
    /// store unchanged.
    pub async fn assign(
        &self,
        session: &UserSession,
        routine_id: Uuid,
        recipient_id: Uuid,
    ) -> GymResult<Routine> {
        require_trainer(session)?;

        let mut tx = self.db.begin().await?;

        let query = format!("SELECT {} FROM routines WHERE id = $1", ROUTINE_COLUMNS);
        let source = sqlx::query_as::<_, Routine>(&query)
            .bind(routine_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| GymError::not_found("Rutina no encontrada."))?;
        ensure_owner(session, source.user_id)?;

        let recipient: Option<String> =
            sqlx::query_scalar("SELECT username FROM users WHERE id = $1 AND is_active")
                .bind(recipient_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(recipient_username) = recipient else {
            return Err(GymError::Validation(FieldErrors::single(
                "recipient_id",
                "El usuario seleccionado no existe.",
            )));
        };

        let insert = format!(
            "INSERT INTO routines (id, name, description, user_id, trainer_id, difficulty,
                                   duration_min, goal, is_public, is_active)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, TRUE)
             RETURNING {}",
            ROUTINE_COLUMNS
        );
        let copy = sqlx::query_as::<_, Routine>(&insert)
            .bind(Uuid::new_v4())
            .bind(format!("{} (de {})", source.name, session.username))
            .bind(&source.description)
            .bind(recipient_id)
            .bind(session.user_id)
            .bind(source.difficulty.as_str())
            .bind(source.duration_min)
            .bind(&source.goal)
            .fetch_one(&mut *tx)
            .await?;

        let copied = sqlx::query(
            "INSERT INTO routine_entries (id, routine_id, exercise_id, position, sets, reps,
                                          weight_kg, rest_seconds, notes)
             SELECT gen_random_uuid(), $2, exercise_id, position, sets, reps, weight_kg,
                    rest_seconds, notes
             FROM routine_entries WHERE routine_id = $1",
        )
        .bind(source.id)
        .bind(copy.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::info!(
            "Trainer {} assigned routine {} to {} ({} entries)",
            session.username,
            source.id,
            recipient_username,
            copied
        );
        Ok(copy)
    }

    /// Assignments made by a trainer, newest first.
    pub async fn assigned_by(&self, trainer_id: Uuid, limit: Option<i64>) -> GymResult<Vec<AssignedRoutine>> {
        let assignments = sqlx::query_as::<_, AssignedRoutine>(
            "SELECT r.id AS routine_id, r.name AS routine_name, u.id AS client_id,
                    u.username AS client_username, r.is_active, r.created_at
             FROM routines r
             JOIN users u ON u.id = r.user_id
             WHERE r.trainer_id = $1 AND r.user_id <> $1
             ORDER BY r.created_at DESC
             LIMIT $2",
        )
        .bind(trainer_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(assignments)
    }

    /// Assigned routines grouped by client, each group newest first.
    pub async fn clients_of(&self, trainer_id: Uuid) -> GymResult<ClientOverview> {
        let assignments = self.assigned_by(trainer_id, None).await?;
        Ok(group_by_client(assignments))
    }
}

/// Group assignments by client, keeping the order clients first appear in.
pub fn group_by_client(assignments: Vec<AssignedRoutine>) -> ClientOverview {
    let total_routines = assignments.len();
    let mut clients: Vec<ClientRoutines> = Vec::new();

    for assignment in assignments {
        match clients.iter_mut().find(|c| c.client_id == assignment.client_id) {
            Some(client) => client.routines.push(assignment),
            None => clients.push(ClientRoutines {
                client_id: assignment.client_id,
                username: assignment.client_username.clone(),
                routines: vec![assignment],
            }),
        }
    }

    ClientOverview {
        total_clients: clients.len(),
        total_routines,
        clients,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn assignment(client: Uuid, name: &str, minutes_ago: i64) -> AssignedRoutine {
        AssignedRoutine {
            routine_id: Uuid::new_v4(),
            routine_name: name.to_string(),
            client_id: client,
            client_username: format!("client-{}", &client.to_string()[..4]),
            is_active: true,
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn test_grouping_keeps_order_and_totals() {
        let ana = Uuid::new_v4();
        let luis = Uuid::new_v4();

        let overview = group_by_client(vec![
            assignment(ana, "Fuerza", 1),
            assignment(luis, "Cardio", 2),
            assignment(ana, "Movilidad", 3),
        ]);

        assert_eq!(overview.total_clients, 2);
        assert_eq!(overview.total_routines, 3);
        assert_eq!(overview.clients[0].client_id, ana);
        assert_eq!(overview.clients[0].routines.len(), 2);
        assert_eq!(overview.clients[0].routines[1].routine_name, "Movilidad");
        assert_eq!(overview.clients[1].routines.len(), 1);
    }

    #[test]
    fn test_no_assignments() {
        let overview = group_by_client(Vec::new());
        assert_eq!(overview.total_clients, 0);
        assert!(overview.clients.is_empty());
    }
}
