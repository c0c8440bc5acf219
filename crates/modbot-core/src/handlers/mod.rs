//! Built-in message handlers and the standard dispatcher wiring.

use std::sync::Arc;

use crate::{
    dispatch::Dispatcher, platform::ChatPlatform, removal::RemovalWorkflow,
    username_cache::UsernameCache, Result,
};

mod greeting;
mod observer;
mod remove;

pub use greeting::{GreetingHandler, GREETING};
pub use observer::UsernameObserver;
pub use remove::{DeleteTextTrigger, RemoveCommandHandler};

#[derive(Clone, Debug, Default)]
pub struct DispatchOptions {
    /// The bot's own username, used to ignore `/cmd@otherbot`.
    pub bot_username: Option<String>,
    /// Enables the free-text `delete ...` trigger.
    pub text_trigger: bool,
}

/// `/start`, `/delete` + `/kick`, the `delete` text trigger and the username observer.
pub fn standard_dispatcher(
    platform: Arc<dyn ChatPlatform>,
    usernames: Arc<UsernameCache>,
    options: DispatchOptions,
) -> Result<Dispatcher> {
    let workflow = Arc::new(RemovalWorkflow::new(platform.clone(), usernames.clone()));

    let mut dispatcher = Dispatcher::new();
    dispatcher
        .register(Arc::new(GreetingHandler::new(
            platform,
            options.bot_username.clone(),
        )))
        .register(Arc::new(RemoveCommandHandler::new(
            workflow.clone(),
            options.bot_username,
        )));
    if options.text_trigger {
        dispatcher.register(Arc::new(DeleteTextTrigger::new(workflow)?));
    }
    dispatcher.register(Arc::new(UsernameObserver::new(usernames)));

    Ok(dispatcher)
}
