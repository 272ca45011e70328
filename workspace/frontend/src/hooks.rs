//! Application-wide state: the controller, the passive session state it
//! drives, and a counter that tells history views to re-read the log.

use std::rc::Rc;

use compute::controller::{Controller, SessionState, SessionUpdate};
use yew::prelude::*;

use crate::api_client::BrowserPredictionApi;
use crate::storage::BrowserStorage;

pub type AppController = Controller<BrowserPredictionApi, BrowserStorage>;

/// Reducer wrapper so lifecycle updates are applied to the latest state.
#[derive(Clone, Default, PartialEq)]
pub struct Session(pub SessionState);

impl Reducible for Session {
    type Action = SessionUpdate;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        next.0.apply(action);
        Rc::new(next)
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub controller: Rc<AppController>,
    pub session: UseReducerHandle<Session>,
    pub history_version: UseStateHandle<u32>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.controller, &other.controller)
            && self.session == other.session
            && *self.history_version == *other.history_version
    }
}

impl AppContext {
    pub fn state(&self) -> &SessionState {
        &self.session.0
    }

    pub fn apply(&self, updates: Vec<SessionUpdate>) {
        for update in updates {
            self.session.dispatch(update);
        }
    }

    /// Re-fetches health and model info in the background.
    pub fn refresh(&self) {
        let controller = self.controller.clone();
        let context = self.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let updates = controller.on_init().await;
            log::debug!("Session refresh produced {} updates", updates.len());
            context.apply(updates);
        });
    }

    /// Signals that a prediction was added to the log.
    pub fn history_changed(&self) {
        self.history_version.set(*self.history_version + 1);
    }
}

#[derive(Properties, PartialEq)]
pub struct AppProviderProps {
    pub children: Children,
}

#[function_component(AppProvider)]
pub fn app_provider(props: &AppProviderProps) -> Html {
    let controller = use_memo((), |_| {
        log::debug!("Creating prediction controller");
        compute::default_controller(BrowserPredictionApi::default(), BrowserStorage)
    });
    let session = use_reducer(Session::default);
    let history_version = use_state(|| 0u32);

    let context = AppContext {
        controller,
        session,
        history_version,
    };

    // Initial health and model info fetch
    {
        let context = context.clone();
        use_effect_with((), move |_| {
            context.refresh();
            || ()
        });
    }

    html! {
        <ContextProvider<AppContext> context={context}>
            {props.children.clone()}
        </ContextProvider<AppContext>>
    }
}

#[hook]
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("use_app called outside AppProvider")
}
