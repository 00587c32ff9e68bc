use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::auth::Role;
use crate::error::{GymError, GymResult};
use crate::models::{Profile, ProfileForm, TrainerCard, UserSummary};

const PROFILE_COLUMNS: &str = "id, user_id, role, photo_url, phone, birth_date, height_cm, weight_kg, \
     experience_level, goal, certification, specialty, years_experience, bio, schedule, available, \
     client_capacity, is_active, registered_at";

#[derive(FromRow)]
struct EnsuredProfile {
    #[sqlx(flatten)]
    profile: Profile,
    created: bool,
}

#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Return the user's profile, creating a default one if it is missing.
    ///
    /// The flag is true when the profile was created by this call.
    pub async fn ensure_profile(&self, user_id: Uuid) -> GymResult<(Profile, bool)> {
        let query = format!(
            "INSERT INTO profiles (user_id) VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {cols}, (xmax = 0) AS created",
            cols = PROFILE_COLUMNS
        );

        let row = sqlx::query_as::<_, EnsuredProfile>(&query)
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        Ok((row.profile, row.created))
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> GymResult<Option<Profile>> {
        let query = format!("SELECT {} FROM profiles WHERE user_id = $1", PROFILE_COLUMNS);
        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(profile)
    }

    /// Update the caller's own profile. Trainer fields are only written for trainers.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        role: Role,
        form: &ProfileForm,
    ) -> GymResult<Profile> {
        self.ensure_profile(user_id).await?;

        let query = format!(
            "UPDATE profiles SET
                 photo_url = $2, phone = $3, birth_date = $4, height_cm = $5, weight_kg = $6,
                 experience_level = $7, goal = $8
             WHERE user_id = $1
             RETURNING {}",
            PROFILE_COLUMNS
        );

        let mut profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(form.photo_url.trim())
            .bind(form.phone.trim())
            .bind(form.birth_date)
            .bind(form.height_cm)
            .bind(form.weight_kg)
            .bind(form.experience_level.as_str())
            .bind(form.goal.trim())
            .fetch_one(&self.db)
            .await?;

        match role {
            Role::Trainer => {
                let query = format!(
                    "UPDATE profiles SET
                         certification = $2, specialty = $3, years_experience = $4, bio = $5,
                         schedule = $6, available = $7
                     WHERE user_id = $1
                     RETURNING {}",
                    PROFILE_COLUMNS
                );

                profile = sqlx::query_as::<_, Profile>(&query)
                    .bind(user_id)
                    .bind(form.certification.trim())
                    .bind(form.specialty.trim())
                    .bind(form.years_experience)
                    .bind(form.bio.trim())
                    .bind(form.schedule.trim())
                    .bind(form.available)
                    .fetch_one(&self.db)
                    .await?;
            }
            Role::User | Role::Admin => {}
        }

        Ok(profile)
    }

    /// Active trainer profiles, for the public directory.
    pub async fn list_trainers(&self) -> GymResult<Vec<TrainerCard>> {
        let trainers = sqlx::query_as::<_, TrainerCard>(
            "SELECT p.id AS profile_id, p.user_id, u.username, p.photo_url, p.certification,
                    p.specialty, p.years_experience, p.bio, p.schedule, p.available, p.client_capacity
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.role = 'trainer' AND p.is_active
             ORDER BY u.username",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(trainers)
    }

    pub async fn get_trainer(&self, profile_id: Uuid) -> GymResult<TrainerCard> {
        sqlx::query_as::<_, TrainerCard>(
            "SELECT p.id AS profile_id, p.user_id, u.username, p.photo_url, p.certification,
                    p.specialty, p.years_experience, p.bio, p.schedule, p.available, p.client_capacity
             FROM profiles p
             JOIN users u ON u.id = p.user_id
             WHERE p.id = $1 AND p.role = 'trainer'",
        )
        .bind(profile_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| GymError::not_found("Entrenador no encontrado."))
    }

    /// Set a user's role, creating the profile if needed.
    pub async fn set_role(&self, user_id: Uuid, role: Role) -> GymResult<()> {
        let result = sqlx::query(
            "INSERT INTO profiles (user_id, role)
             SELECT id, $2 FROM users WHERE id = $1
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(GymError::not_found("Usuario no encontrado."));
        }

        tracing::info!("Role of user {} set to {}", user_id, role);
        Ok(())
    }

    /// Active regular users other than `exclude`, candidates for an assignment.
    pub async fn assignable_users(&self, exclude: Uuid) -> GymResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT u.id, u.username, u.email, p.role, u.created_at
             FROM users u
             JOIN profiles p ON p.user_id = u.id
             WHERE u.is_active AND p.role = 'user' AND u.id <> $1
             ORDER BY u.username",
        )
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }
}
