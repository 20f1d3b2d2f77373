//! PostgreSQL implementation of DoctorRepository.

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::scheduling::{Doctor, DoctorPatch, DoctorProfile, NewDoctor};
use crate::ports::DoctorRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{decode_user_id, violated_constraint};

const DOCTOR_COLUMNS: &str = "user_uid, specialty, location, created_at, updated_at";

const PROFILE_SELECT: &str = r#"
    SELECT u.uid, u.first_name, u.last_name, u.email, u.avatar_url,
           d.specialty, d.location, d.created_at, d.updated_at
    FROM doctors d
    JOIN users u ON u.uid = d.user_uid
"#;

/// PostgreSQL implementation of the DoctorRepository port.
pub struct PostgresDoctorRepository {
    pool: PgPool,
}

impl PostgresDoctorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DoctorRow {
    user_uid: String,
    specialty: String,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DoctorRow> for Doctor {
    type Error = DomainError;

    fn try_from(row: DoctorRow) -> Result<Self, Self::Error> {
        Ok(Doctor {
            user_uid: decode_user_id("user_uid", row.user_uid)?,
            specialty: row.specialty,
            location: row.location,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    uid: String,
    first_name: String,
    last_name: String,
    email: String,
    avatar_url: Option<String>,
    specialty: String,
    location: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for DoctorProfile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(DoctorProfile {
            uid: decode_user_id("uid", row.uid)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            avatar_url: row.avatar_url,
            specialty: row.specialty,
            location: row.location,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Domain error for a constraint violated while inserting a doctor.
fn insert_conflict(constraint: &str, uid: &UserId) -> Option<DomainError> {
    match constraint {
        "doctors_pkey" => Some(DomainError::new(
            ErrorCode::DoctorProfileExists,
            format!("User {} already has a doctor profile", uid),
        )),
        "doctors_user_uid_fkey" => Some(DomainError::new(
            ErrorCode::UserNotFound,
            format!("User {} not found", uid),
        )),
        _ => None,
    }
}

#[async_trait]
impl DoctorRepository for PostgresDoctorRepository {
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, DomainError> {
        let now = Timestamp::now();
        let row: DoctorRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO doctors (user_uid, specialty, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING {DOCTOR_COLUMNS}
            "#
        ))
        .bind(doctor.user_uid.as_str())
        .bind(&doctor.specialty)
        .bind(&doctor.location)
        .bind(now.as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match violated_constraint(&e).and_then(|c| insert_conflict(c, &doctor.user_uid)) {
                Some(err) => err,
                None => DomainError::database("Failed to insert doctor", e),
            }
        })?;

        row.try_into()
    }

    async fn find_by_user_uid(&self, uid: &UserId) -> Result<Option<Doctor>, DomainError> {
        let row: Option<DoctorRow> = sqlx::query_as(&format!(
            "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE user_uid = $1"
        ))
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch doctor", e))?;

        row.map(Doctor::try_from).transpose()
    }

    async fn update(
        &self,
        uid: &UserId,
        patch: DoctorPatch,
    ) -> Result<Option<Doctor>, DomainError> {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE doctors SET updated_at = ");
        query.push_bind(Utc::now());
        if let Some(specialty) = &patch.specialty {
            query.push(", specialty = ").push_bind(specialty.clone());
        }
        if let Some(location) = &patch.location {
            query.push(", location = ").push_bind(location.clone());
        }
        query.push(" WHERE user_uid = ").push_bind(uid.as_str().to_string());
        query.push(" RETURNING ").push(DOCTOR_COLUMNS);

        let row: Option<DoctorRow> = query
            .build_query_as()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to update doctor", e))?;

        row.map(Doctor::try_from).transpose()
    }

    async fn find_all_profiles(&self) -> Result<Vec<DoctorProfile>, DomainError> {
        let rows: Vec<ProfileRow> =
            sqlx::query_as(&format!("{PROFILE_SELECT} ORDER BY d.created_at, u.uid"))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to list doctors", e))?;

        rows.into_iter().map(DoctorProfile::try_from).collect()
    }

    async fn find_profile(&self, uid: &UserId) -> Result<Option<DoctorProfile>, DomainError> {
        let row: Option<ProfileRow> =
            sqlx::query_as(&format!("{PROFILE_SELECT} WHERE d.user_uid = $1"))
                .bind(uid.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch doctor profile", e))?;

        row.map(DoctorProfile::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_row_keeps_user_and_practice_fields() {
        let now = Utc::now();
        let profile = DoctorProfile::try_from(ProfileRow {
            uid: "doc-1".to_string(),
            first_name: "Meredith".to_string(),
            last_name: "Grey".to_string(),
            email: "grey@example.com".to_string(),
            avatar_url: None,
            specialty: "Cardiology".to_string(),
            location: "New York".to_string(),
            created_at: now,
            updated_at: now,
        })
        .unwrap();

        assert_eq!(profile.uid.as_str(), "doc-1");
        assert_eq!(profile.specialty, "Cardiology");
    }

    #[test]
    fn blank_user_uid_is_a_database_error() {
        let now = Utc::now();
        let err = Doctor::try_from(DoctorRow {
            user_uid: String::new(),
            specialty: "Cardiology".to_string(),
            location: "New York".to_string(),
            created_at: now,
            updated_at: now,
        })
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn insert_constraints_map_to_domain_codes() {
        let uid = UserId::new("doc-1").unwrap();
        assert_eq!(
            insert_conflict("doctors_pkey", &uid).unwrap().code,
            ErrorCode::DoctorProfileExists
        );
        assert_eq!(
            insert_conflict("doctors_user_uid_fkey", &uid).unwrap().code,
            ErrorCode::UserNotFound
        );
        assert!(insert_conflict("doctors_other", &uid).is_none());
    }
}
