use uuid::Uuid;

use crate::auth::{Role, UserSession};
use crate::error::{GymError, GymResult};

/// Only trainers and administrators create, edit or delete routines.
pub fn require_routine_manager(session: &UserSession) -> GymResult<()> {
    match session.role {
        Role::Trainer | Role::Admin => Ok(()),
        Role::User => Err(GymError::forbidden(
            "Solo los entrenadores y administradores pueden gestionar rutinas.",
        )),
    }
}

/// Only trainers assign routines or have clients.
pub fn require_trainer(session: &UserSession) -> GymResult<()> {
    match session.role {
        Role::Trainer => Ok(()),
        Role::User | Role::Admin => Err(GymError::forbidden(
            "Solo los entrenadores pueden realizar esta acción.",
        )),
    }
}

pub fn require_admin(session: &UserSession) -> GymResult<()> {
    match session.role {
        Role::Admin => Ok(()),
        Role::User | Role::Trainer => Err(GymError::forbidden(
            "Solo los administradores pueden realizar esta acción.",
        )),
    }
}

/// The acting user must own the resource.
pub fn ensure_owner(session: &UserSession, owner_id: Uuid) -> GymResult<()> {
    if session.user_id == owner_id {
        Ok(())
    } else {
        Err(GymError::forbidden("No tienes permiso para modificar esta rutina."))
    }
}

/// Requested dashboard must match the caller's role.
pub fn require_dashboard(session: &UserSession, requested: Role) -> GymResult<()> {
    if session.role == requested {
        Ok(())
    } else {
        Err(GymError::forbidden("No tienes acceso a ese panel."))
    }
}
