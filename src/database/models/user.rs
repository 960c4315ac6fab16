use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::types::Role;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    /// Argon2 PHC string; never serialized into API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub salary: Decimal,
    pub join_date: NaiveDate,
    pub department_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    pub role: Role,
    pub casual_leaves_taken: i32,
    pub sick_leaves_taken: i32,
    pub remaining_leaves: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{PasswordHash, PasswordVerifier},
            Argon2,
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
            Argon2,
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(hash: String) -> User {
        User {
            id: Uuid::new_v4(),
            username: "asha".into(),
            password_hash: hash,
            name: "Asha Rao".into(),
            salary: Decimal::new(50_000, 0),
            join_date: NaiveDate::from_ymd_opt(2023, 1, 9).unwrap(),
            department_id: None,
            position_id: None,
            role: Role::Employee,
            casual_leaves_taken: 0,
            sick_leaves_taken: 0,
            remaining_leaves: 20,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn password_hash_verifies() {
        let hash = User::hash_password("s3cret").unwrap();
        let user = user_with_hash(hash);
        assert!(user.verify_password("s3cret").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn password_hash_is_not_serialized() {
        let user = user_with_hash(User::hash_password("s3cret").unwrap());
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "asha");
    }
}
