use super::*;

impl PostgresUserRepository {
    pub(super) async fn create_impl(&self, user: NewUserRecord) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, display_name, email, role, password_hash)
            VALUES ($1, $2, LOWER($3), $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(UserId::new().as_uuid())
        .bind(user.display_name.as_str())
        .bind(user.email.as_str())
        .bind(user.role.as_str())
        .bind(user.password_hash.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "create user"))?;

        UserRecord::try_from(row)
    }

    pub(super) async fn update_profile_impl(
        &self,
        user_id: UserId,
        display_name: &str,
        email: &EmailAddress,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET display_name = $2, email = LOWER($3), updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(display_name)
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| email_conflict_or_internal(error, "update user profile"))?
        .ok_or_else(|| user_not_found(user_id))?;

        UserRecord::try_from(row)
    }

    pub(super) async fn update_password_impl(
        &self,
        user_id: UserId,
        password_hash: &str,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update password: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user_id));
        }

        Ok(())
    }

    pub(super) async fn update_role_impl(
        &self,
        user_id: UserId,
        role: Role,
    ) -> AppResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id.as_uuid())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update user role: {error}")))?
        .ok_or_else(|| user_not_found(user_id))?;

        UserRecord::try_from(row)
    }
}
