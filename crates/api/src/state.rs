//! Shared application state
//!
//! The composition root: builds the presence registry once and hands the same
//! instance to the connection handler and the message dispatcher.

use std::sync::Arc;

use crate::{
    auth::JwtManager,
    config::Config,
    store::{MessageStore, UserStore},
    upload::ImageUploader,
    websocket::{MessageDispatcher, PresenceHandler, PresenceRegistry, WebSocketState},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: JwtManager,
    pub users: UserStore,
    pub messages: MessageStore,
    pub images: ImageUploader,
    pub presence: PresenceRegistry,
    pub ws_state: WebSocketState,
    pub presence_handler: PresenceHandler,
    pub dispatcher: MessageDispatcher,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_expiry_hours);
        let images = ImageUploader::new(&config);

        let presence = PresenceRegistry::new();
        let ws_state = WebSocketState::new();
        let presence_handler = PresenceHandler::new(presence.clone(), ws_state.clone());
        let dispatcher = MessageDispatcher::new(presence.clone(), ws_state.clone());

        Self {
            config: Arc::new(config),
            jwt,
            users: UserStore::new(),
            messages: MessageStore::new(),
            images,
            presence,
            ws_state,
            presence_handler,
            dispatcher,
        }
    }
}
