use bcrypt::{hash, verify};
use diesel::prelude::*;

use crate::{
    db::models::api::error_codes,
    db::models::user::{CreateUserRequest, NewUser, User},
    db::repositories::users::UserRepo,
    error::AppError,
    validation::auth::validate_login_form,
};

pub struct UsersService;

impl UsersService {
    /// Registers an account. The request is expected to be validated already.
    pub fn create(
        conn: &mut PgConnection,
        req: &CreateUserRequest,
        bcrypt_cost: u32,
    ) -> Result<User, AppError> {
        // Check if email already exists
        if UserRepo::exists_by_email(conn, &req.email)? {
            return Err(AppError::conflict_with_code(
                "Email already exists",
                Some("email".to_string()),
                error_codes::USER_EMAIL_EXISTS,
            ));
        }

        // Check if username already exists
        if UserRepo::exists_by_username(conn, &req.username)? {
            return Err(AppError::conflict_with_code(
                "Username already exists",
                Some("username".to_string()),
                error_codes::USER_USERNAME_EXISTS,
            ));
        }

        let hashed_password = hash(&req.password, bcrypt_cost)?;

        let new_user = NewUser {
            username: req.username.clone(),
            email: req.email.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            hashed_password,
            role: req.role.clone(),
            is_active: true,
        };

        let user = UserRepo::insert(conn, &new_user)?;
        Ok(user)
    }

    pub fn authenticate(
        conn: &mut PgConnection,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        validate_login_form(username, password)?;

        let user = UserRepo::find_active_by_username(conn, username)?
            .ok_or_else(|| AppError::auth("Could not validate the user"))?;

        if !verify(password, &user.hashed_password)? {
            return Err(AppError::auth("Could not validate the user"));
        }

        Ok(user)
    }

    pub fn delete(conn: &mut PgConnection, user_id: i32) -> Result<(), AppError> {
        if UserRepo::find_by_id(conn, user_id)?.is_none() {
            return Err(AppError::not_found("user"));
        }
        UserRepo::delete_by_id(conn, user_id)?;
        Ok(())
    }
}
