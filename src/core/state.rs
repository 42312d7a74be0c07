use std::sync::Arc;

use crate::controllers::token::TokenController;
use crate::controllers::user::UserController;
use crate::core::config::Settings;
use crate::core::error::ConfigError;
use crate::core::store::CredentialStore;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) user_controller: UserController,
    pub(crate) token_controller: Arc<TokenController>,
}

impl AppState {
    pub(crate) fn new(
        store: Arc<dyn CredentialStore>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        Ok(AppState {
            user_controller: UserController::new(store, settings.bcrypt_cost)?,
            token_controller: Arc::new(TokenController::new(settings)?),
        })
    }
}
