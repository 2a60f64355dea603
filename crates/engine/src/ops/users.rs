use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, User, users};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Create a user. The password is stored as a bcrypt hash.
    ///
    /// A taken username is reported by the unique index, so two concurrent
    /// registrations cannot both succeed.
    pub async fn new_user(&self, username: &str, password: &str) -> ResultEngine<User> {
        let username = normalize_required_name(Some(username), "user")?;
        if password.is_empty() {
            return Err(EngineError::Validation(
                "password must not be empty".to_string(),
            ));
        }

        let hash = hash_password(password.to_string(), self.password_cost).await?;

        with_tx!(self, |db_tx| {
            let model = users::ActiveModel {
                username: ActiveValue::Set(username.clone()),
                password: ActiveValue::Set(hash.clone()),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::existing(err, &username))?;
            Ok(User::from(model))
        })
    }

    /// Resolve a username/password pair to its user.
    ///
    /// Unknown users and wrong passwords both yield `Unauthorized`, after the
    /// same amount of bcrypt work.
    pub async fn authenticate(&self, username: &str, password: &str) -> ResultEngine<User> {
        let model = with_tx!(self, |db_tx| {
            let model = users::Entity::find()
                .filter(users::Column::Username.eq(username))
                .one(&db_tx)
                .await?;
            Ok(model)
        })?;

        let hash = match &model {
            Some(model) => model.password.clone(),
            None => self.decoy_hash.clone(),
        };
        let valid = verify_password(password.to_string(), hash).await?;
        match model {
            Some(model) if valid => Ok(User::from(model)),
            _ => Err(EngineError::Unauthorized),
        }
    }
}

pub(super) async fn hash_password(password: String, cost: u32) -> ResultEngine<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|err| EngineError::Password(err.to_string()))?
        .map_err(|err| EngineError::Password(err.to_string()))
}

pub(super) async fn verify_password(password: String, hash: String) -> ResultEngine<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| EngineError::Password(err.to_string()))?
        .map_err(|err| EngineError::Password(err.to_string()))
}
