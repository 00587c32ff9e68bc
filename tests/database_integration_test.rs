mod common;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::{TestDatabase, TEST_PASSWORD};
use gymflow::auth::{AuthError, LoginForm, PasswordResetConfirmForm, Role};
use gymflow::catalog::fallback_exercises;
use gymflow::config::{AdminSeeder, AdminSetup};
use gymflow::error::GymError;
use gymflow::models::{
    Difficulty, EntryForm, FavoriteToggle, ProgressForm, RoutineFilter, RoutineForm, WorkoutForm,
};
use gymflow::services::{
    AssignmentService, DashboardService, ExerciseService, FavoriteService, ProfileService,
    ProgressService, RoutineService, WorkoutService,
};

fn routine_form(name: &str) -> RoutineForm {
    RoutineForm {
        name: name.to_string(),
        description: "Empuje".to_string(),
        difficulty: Difficulty::Hard,
        duration_min: 45,
        ..RoutineForm::default()
    }
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_registration_creates_one_user_profile() {
    let db = TestDatabase::new().await;
    let signed_in = db.register_user().await;

    assert_eq!(signed_in.session.role, Role::User);
    assert!(!signed_in.token.is_empty());

    let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE user_id = $1")
        .bind(signed_in.session.user_id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert_eq!(profiles, 1);

    let (profile, created) = ProfileService::new(db.pool.clone())
        .ensure_profile(signed_in.session.user_id)
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(profile.role, Role::User);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_login_session_and_logout() {
    let db = TestDatabase::new().await;
    let auth = db.auth();
    let registered = db.register_user().await;

    let bad = auth
        .login(&LoginForm {
            username: registered.session.username.clone(),
            password: "wrong-password".to_string(),
        })
        .await;
    assert_matches!(bad, Err(AuthError::InvalidCredentials));

    let signed_in = auth
        .login(&LoginForm {
            username: registered.session.username.clone(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .unwrap();

    let session = auth.validate_session(&signed_in.token).await.unwrap();
    assert_eq!(session.user_id, registered.session.user_id);

    // Role changes apply to sessions already issued
    ProfileService::new(db.pool.clone())
        .set_role(session.user_id, Role::Trainer)
        .await
        .unwrap();
    let session = auth.validate_session(&signed_in.token).await.unwrap();
    assert_eq!(session.role, Role::Trainer);

    auth.logout(&signed_in.token).await.unwrap();
    assert_matches!(
        auth.validate_session(&signed_in.token).await,
        Err(AuthError::InvalidToken)
    );
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_duplicate_username_is_rejected() {
    let db = TestDatabase::new().await;
    let first = db.register_user().await;

    let result = db
        .auth()
        .register(&gymflow::auth::RegisterForm {
            username: first.session.username.clone(),
            email: None,
            password1: TEST_PASSWORD.to_string(),
            password2: TEST_PASSWORD.to_string(),
        })
        .await;

    assert_matches!(result, Err(AuthError::UsernameTaken));
    assert_eq!(db.count("users").await, 1);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_plain_user_cannot_manage_routines() {
    let db = TestDatabase::new().await;
    let routines = RoutineService::new(db.pool.clone());
    let user = db.register_user().await.session;

    let result = routines.create(&user, &routine_form("Mía")).await;
    assert_matches!(result, Err(GymError::Forbidden(_)));
    assert_eq!(db.count("routines").await, 0);

    // A trainer's routine stays untouched by the plain user
    let trainer = db.session_with_role(Role::Trainer).await;
    let routine = routines.create(&trainer, &routine_form("Fuerza")).await.unwrap();

    assert_matches!(
        routines.update(&user, routine.id, &routine_form("Cambio")).await,
        Err(GymError::Forbidden(_))
    );
    assert_matches!(routines.delete(&user, routine.id).await, Err(GymError::Forbidden(_)));
    assert_eq!(routines.get(routine.id).await.unwrap().name, "Fuerza");
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_routine_crud_and_entries() {
    let db = TestDatabase::new().await;
    let routines = RoutineService::new(db.pool.clone());
    let exercises = ExerciseService::new(db.pool.clone());
    let trainer = db.session_with_role(Role::Trainer).await;

    let routine = routines.create(&trainer, &routine_form("Pierna")).await.unwrap();
    assert_eq!(routine.user_id, trainer.user_id);

    let squat = exercises.materialize(&fallback_exercises()[1]).await.unwrap();
    let bench = exercises.materialize(&fallback_exercises()[0]).await.unwrap();
    // Materializing twice returns the same row
    assert_eq!(exercises.materialize(&fallback_exercises()[1]).await.unwrap().id, squat.id);

    let mut second = EntryForm::suggested(1);
    second.sets = 5;
    routines.add_entry(&trainer, routine.id, squat.id, &second).await.unwrap();
    routines
        .add_entry(&trainer, routine.id, bench.id, &EntryForm::suggested(0))
        .await
        .unwrap();

    let entries = routines.entries(routine.id).await.unwrap();
    let positions: Vec<i32> = entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![1, 2]);
    assert_eq!(entries[0].exercise_id, bench.id);
    assert_eq!(entries[1].sets, 5);

    let mut update = routine_form("Pierna pesada");
    update.is_active = false;
    routines.update(&trainer, routine.id, &update).await.unwrap();

    let inactive = routines
        .list_for_user(trainer.user_id, RoutineFilter::Inactive)
        .await
        .unwrap();
    assert_eq!(inactive.len(), 1);
    assert_eq!(inactive[0].entry_count, 2);
    assert!(routines
        .list_for_user(trainer.user_id, RoutineFilter::Active)
        .await
        .unwrap()
        .is_empty());

    routines.delete(&trainer, routine.id).await.unwrap();
    assert_eq!(db.count("routines").await, 0);
    assert_eq!(db.count("routine_entries").await, 0);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_assignment_copies_routine_and_entries() {
    let db = TestDatabase::new().await;
    let routines = RoutineService::new(db.pool.clone());
    let exercises = ExerciseService::new(db.pool.clone());
    let assignments = AssignmentService::new(db.pool.clone());

    let trainer = db.session_with_role(Role::Trainer).await;
    let client = db.register_user().await.session;

    let source = routines.create(&trainer, &routine_form("Torso")).await.unwrap();
    for (index, catalog) in fallback_exercises().iter().take(3).enumerate() {
        let exercise = exercises.materialize(catalog).await.unwrap();
        let form = EntryForm {
            weight_kg: Some(20.0 + index as f64),
            notes: format!("nota {}", index),
            ..EntryForm::suggested(index as i64)
        };
        routines.add_entry(&trainer, source.id, exercise.id, &form).await.unwrap();
    }

    let copy = assignments.assign(&trainer, source.id, client.user_id).await.unwrap();

    assert_ne!(copy.id, source.id);
    assert_eq!(copy.user_id, client.user_id);
    assert_eq!(copy.trainer_id, Some(trainer.user_id));
    assert_eq!(copy.name, format!("Torso (de {})", trainer.username));
    assert!(!copy.is_public);
    assert!(copy.is_active);

    let original = routines.entries(source.id).await.unwrap();
    let copied = routines.entries(copy.id).await.unwrap();
    assert_eq!(original.len(), 3);
    assert_eq!(copied.len(), 3);
    for (before, after) in original.iter().zip(&copied) {
        assert_ne!(before.id, after.id);
        assert_eq!(before.exercise_id, after.exercise_id);
        assert_eq!(before.position, after.position);
        assert_eq!(before.sets, after.sets);
        assert_eq!(before.reps, after.reps);
        assert_eq!(before.weight_kg, after.weight_kg);
        assert_eq!(before.rest_seconds, after.rest_seconds);
        assert_eq!(before.notes, after.notes);
    }

    let overview = assignments.clients_of(trainer.user_id).await.unwrap();
    assert_eq!(overview.total_clients, 1);
    assert_eq!(overview.clients[0].client_id, client.user_id);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_assignment_to_missing_user_writes_nothing() {
    let db = TestDatabase::new().await;
    let routines = RoutineService::new(db.pool.clone());
    let assignments = AssignmentService::new(db.pool.clone());
    let trainer = db.session_with_role(Role::Trainer).await;
    let admin = db.session_with_role(Role::Admin).await;

    let source = routines.create(&trainer, &routine_form("Core")).await.unwrap();

    let result = assignments.assign(&trainer, source.id, Uuid::new_v4()).await;
    assert_matches!(result, Err(GymError::Validation(errors)) if errors.contains("recipient_id"));
    assert_eq!(db.count("routines").await, 1);

    // Admins manage routines but do not assign them
    let admin_routine = routines.create(&admin, &routine_form("Admin")).await.unwrap();
    let result = assignments.assign(&admin, admin_routine.id, trainer.user_id).await;
    assert_matches!(result, Err(GymError::Forbidden(_)));
    assert_eq!(db.count("routines").await, 2);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_favorite_toggle_twice_restores_state() {
    let db = TestDatabase::new().await;
    let favorites = FavoriteService::new(db.pool.clone());
    let exercises = ExerciseService::new(db.pool.clone());
    let user = db.register_user().await.session;

    let exercise = exercises.materialize(&fallback_exercises()[0]).await.unwrap();
    assert!(!favorites.is_exercise_favorite(user.user_id, exercise.id).await.unwrap());

    assert_eq!(
        favorites.toggle_exercise(user.user_id, exercise.id).await.unwrap(),
        FavoriteToggle::Added
    );
    assert!(exercises
        .favorite_external_ids(user.user_id)
        .await
        .unwrap()
        .contains(&exercise.external_id));

    assert_eq!(
        favorites.toggle_exercise(user.user_id, exercise.id).await.unwrap(),
        FavoriteToggle::Removed
    );
    assert!(!favorites.is_exercise_favorite(user.user_id, exercise.id).await.unwrap());
    assert_eq!(db.count("favorites").await, 0);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_workout_effort_bounds() {
    let db = TestDatabase::new().await;
    let routines = RoutineService::new(db.pool.clone());
    let workouts = WorkoutService::new(db.pool.clone());
    let trainer = db.session_with_role(Role::Trainer).await;

    let routine = routines.create(&trainer, &routine_form("Cardio")).await.unwrap();

    let too_hard = WorkoutForm {
        effort: 11,
        ..WorkoutForm::for_duration(30)
    };
    assert_matches!(
        workouts.log_workout(&trainer, routine.id, &too_hard).await,
        Err(GymError::Validation(_))
    );
    assert_eq!(db.count("workout_logs").await, 0);

    for effort in [1, 10] {
        let form = WorkoutForm {
            effort,
            ..WorkoutForm::for_duration(30)
        };
        workouts.log_workout(&trainer, routine.id, &form).await.unwrap();
    }
    assert_eq!(workouts.count_for_user(trainer.user_id).await.unwrap(), 2);

    // Only the owner may log against a routine
    let stranger = db.register_user().await.session;
    assert_matches!(
        workouts
            .log_workout(&stranger, routine.id, &WorkoutForm::default())
            .await,
        Err(GymError::Forbidden(_))
    );
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_progress_requires_positive_weight() {
    let db = TestDatabase::new().await;
    let progress = ProgressService::new(db.pool.clone());
    let user = db.register_user().await.session;

    let missing = ProgressForm::default();
    assert_matches!(
        progress.log_progress(user.user_id, &missing).await,
        Err(GymError::Validation(_))
    );

    let form = ProgressForm {
        weight_kg: Some(72.5),
        body_fat_pct: Some(18.0),
        ..ProgressForm::default()
    };
    let entry = progress.log_progress(user.user_id, &form).await.unwrap();
    assert_eq!(entry.weight_kg, 72.5);

    let latest = progress.latest(user.user_id).await.unwrap().unwrap();
    assert_eq!(latest.id, entry.id);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_password_reset_token_is_single_use() {
    let db = TestDatabase::new().await;
    let auth = db.auth();
    let registered = db.register_user().await;

    let email: Option<String> = sqlx::query_scalar("SELECT email FROM users WHERE id = $1")
        .bind(registered.session.user_id)
        .fetch_one(&db.pool)
        .await
        .unwrap();
    let (user, token) = auth
        .request_password_reset(&email.unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, registered.session.user_id);

    let form = PasswordResetConfirmForm {
        token: token.clone(),
        new_password1: "nueva-contraseña".to_string(),
        new_password2: "nueva-contraseña".to_string(),
    };
    auth.confirm_password_reset(&form).await.unwrap();
    assert_matches!(
        auth.confirm_password_reset(&form).await,
        Err(AuthError::InvalidResetToken)
    );

    let signed_in = auth
        .login(&LoginForm {
            username: registered.session.username.clone(),
            password: "nueva-contraseña".to_string(),
        })
        .await;
    assert!(signed_in.is_ok());

    assert!(auth
        .request_password_reset("nadie@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_admin_bootstrap_and_dashboards() {
    let db = TestDatabase::new().await;
    let seeder = AdminSeeder::new(db.pool.clone());

    let outcome = seeder
        .setup_admin("jefa", Some("jefa@gymflow.test"), TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(outcome, AdminSetup::Created);
    let outcome = seeder.setup_admin("jefa", None, TEST_PASSWORD).await.unwrap();
    assert_eq!(outcome, AdminSetup::Promoted);

    let trainer = db.session_with_role(Role::Trainer).await;
    db.register_user().await;

    let dashboards = DashboardService::new(db.pool.clone());
    let admin = dashboards.admin_dashboard().await.unwrap();
    assert_eq!(admin.user_count, 1);
    assert_eq!(admin.trainer_count, 1);

    let trainers = ProfileService::new(db.pool.clone()).list_trainers().await.unwrap();
    assert_eq!(trainers.len(), 1);
    assert_eq!(trainers[0].user_id, trainer.user_id);

    let user_view = dashboards.user_dashboard(trainer.user_id).await.unwrap();
    assert_eq!(user_view.routine_count, 0);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_schema_defaults_generate_uuids() {
    let db = TestDatabase::new().await;

    let id: Uuid = sqlx::query_scalar("SELECT gen_random_uuid()")
        .fetch_one(&db.pool)
        .await
        .unwrap();
    assert!(!id.is_nil());

    let exercise = ExerciseService::new(db.pool.clone())
        .materialize(&fallback_exercises()[2])
        .await
        .unwrap();
    assert!(!exercise.id.is_nil());
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_concurrent_materialize_returns_the_same_row() {
    let db = TestDatabase::new().await;
    let first = ExerciseService::new(db.pool.clone());
    let second = ExerciseService::new(db.pool.clone());
    let catalog = &fallback_exercises()[3];

    let (a, b) = tokio::join!(first.materialize(catalog), second.materialize(catalog));

    assert_eq!(a.unwrap().id, b.unwrap().id);
    assert_eq!(db.count("exercises").await, 1);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_concurrent_registration_of_one_username() {
    let db = TestDatabase::new().await;
    let auth = db.auth();
    let form = gymflow::auth::RegisterForm {
        username: "carrera".to_string(),
        email: None,
        password1: TEST_PASSWORD.to_string(),
        password2: TEST_PASSWORD.to_string(),
    };

    let (a, b) = tokio::join!(auth.register(&form), auth.register(&form));

    let mut outcomes = [a, b];
    outcomes.sort_by_key(|r| r.is_err());
    assert_matches!(outcomes[0], Ok(_));
    assert_matches!(outcomes[1], Err(AuthError::UsernameTaken));
    assert_eq!(db.count("users").await, 1);
}

#[tokio::test]
#[ignore = "requires a running docker daemon"]
async fn test_ensure_profile_reports_creation_once() {
    let db = TestDatabase::new().await;
    let signed_in = db.register_user().await;
    let profiles = ProfileService::new(db.pool.clone());

    sqlx::query("DELETE FROM profiles WHERE user_id = $1")
        .bind(signed_in.session.user_id)
        .execute(&db.pool)
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        profiles.ensure_profile(signed_in.session.user_id),
        profiles.ensure_profile(signed_in.session.user_id)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.0.id, b.0.id);
    assert!(a.1 ^ b.1);
}
