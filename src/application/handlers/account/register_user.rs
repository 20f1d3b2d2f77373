//! RegisterUserHandler - Command handler for signing up doctors and patients.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{DomainError, IdentityAccount};
use crate::domain::scheduling::{Doctor, Registration, User};
use crate::ports::{DoctorRepository, IdentityProvider, UserRepository};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub registration: Registration,
}

/// Records created by a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
    pub doctor: Option<Doctor>,
}

/// Handler for registration.
///
/// Creates the identity account first, then the user record and, for
/// doctors, the doctor record. A relational failure removes whatever was
/// already created before the error is returned.
pub struct RegisterUserHandler {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserRepository>,
    doctors: Arc<dyn DoctorRepository>,
}

impl RegisterUserHandler {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserRepository>,
        doctors: Arc<dyn DoctorRepository>,
    ) -> Self {
        Self {
            identity,
            users,
            doctors,
        }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<RegisterUserResult, DomainError> {
        let registration = cmd.registration;

        // 1. Identity account
        let account = self
            .identity
            .create_account(&registration.email, &registration.password)
            .await?;

        // 2. User record
        let user = match self.users.create(registration.user_record(account.uid.clone())).await {
            Ok(user) => user,
            Err(err) => {
                self.compensate(&account, false).await;
                return Err(err);
            }
        };

        // 3. Doctor record
        let doctor = match registration.doctor_record(account.uid.clone()) {
            Some(new_doctor) => match self.doctors.create(new_doctor).await {
                Ok(doctor) => Some(doctor),
                Err(err) => {
                    self.compensate(&account, true).await;
                    return Err(err);
                }
            },
            None => None,
        };

        // 4. Verification email, best effort
        if let Err(err) = self.identity.send_verification_email(&account.id_token).await {
            warn!(uid = %account.uid, error = %err, "Verification email not sent");
        }

        info!(uid = %user.uid, role = %user.role, "User registered");
        Ok(RegisterUserResult { user, doctor })
    }

    /// Undoes a partial registration. Failures here are logged and the
    /// original error is what the caller sees.
    async fn compensate(&self, account: &IdentityAccount, user_created: bool) {
        warn!(uid = %account.uid, "Registration failed, rolling back");

        if user_created {
            if let Err(err) = self.users.delete(&account.uid).await {
                warn!(uid = %account.uid, error = %err, "Could not remove user record");
            }
        }
        if let Err(err) = self.identity.delete_account(&account.id_token).await {
            warn!(uid = %account.uid, error = %err, "Could not remove identity account");
        }
    }
}
