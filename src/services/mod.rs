// Business logic services

pub mod assignment_service;
pub mod dashboard_service;
pub mod exercise_service;
pub mod favorite_service;
pub mod mail_service;
pub mod profile_service;
pub mod progress_service;
pub mod routine_service;
pub mod workout_service;

pub use assignment_service::{AssignedRoutine, AssignmentService, ClientOverview, ClientRoutines};
pub use dashboard_service::{AdminDashboard, DashboardService, TrainerDashboard, UserDashboard};
pub use exercise_service::ExerciseService;
pub use favorite_service::FavoriteService;
pub use mail_service::{MailError, Mailer};
pub use profile_service::ProfileService;
pub use progress_service::ProgressService;
pub use routine_service::RoutineService;
pub use workout_service::WorkoutService;
