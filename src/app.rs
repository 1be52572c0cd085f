use std::{future::Future, path::PathBuf, sync::Arc};

use iced::Task;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::application::{DialogFileSaver, DirectoryFileSaver, FileSaver, SubmitWorkflow};
use crate::config::AppConfig;
use crate::domain::AppError;
use crate::ui::{DownloadMessage, DownloadView};

pub struct DownloadApp {
    view: DownloadView,
    api_client: ApiClient,
    workflow: SubmitWorkflow,
}

impl DownloadApp {
    pub fn new(config: AppConfig) -> Self {
        let api_client = ApiClient::new(config.api);
        let saver: Arc<dyn FileSaver> = match config.save_dir {
            Some(dir) => {
                info!(dir = %dir.display(), "Saving downloads directly");
                Arc::new(DirectoryFileSaver::new(dir))
            }
            None => Arc::new(DialogFileSaver),
        };

        Self {
            view: DownloadView::default(),
            workflow: SubmitWorkflow::new(api_client.clone(), saver),
            api_client,
        }
    }

    /// Builds the app and schedules the startup health probe.
    pub fn boot() -> (Self, Task<Message>) {
        let app = Self::new(AppConfig::from_env());
        let api_client = app.api_client.clone();

        let probe = Task::perform(
            async move { api_client.health().await.unwrap_or(false) },
            Message::BackendChecked,
        );
        (app, probe)
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// Result of the startup health probe
    BackendChecked(bool),
    /// Final result after converting and saving
    SubmitFinished(Result<PathBuf, AppError>),
}

/// Starts a submission from the current form. Returns the work that ends in
/// `SubmitFinished`, or `None` when nothing needs to run.
fn submit(app: &mut DownloadApp) -> Option<impl Future<Output = Message> + Send + 'static> {
    if app.view.form.loading {
        return None;
    }

    let pending = app.workflow.start(&mut app.view.form)?;
    app.view.status_message = "Converting, this can take a while...".to_string();
    Some(async move { Message::SubmitFinished(pending.await) })
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            if let DownloadMessage::SubmitPressed = ui_msg {
                // iced runs the future on the background tokio executor
                if let Some(pending) = submit(app) {
                    return Task::future(pending);
                }
            }
        }
        Message::BackendChecked(healthy) => {
            // A running submission owns the status line
            if !healthy && !app.view.form.loading {
                let base = &app.api_client.config().base_url;
                warn!(%base, "Backend not reachable");
                app.view.status_message =
                    format!("The backend server must be running at {}", base);
            }
        }
        Message::SubmitFinished(result) => {
            app.view.status_message = match &result {
                Ok(path) => format!("Saved: {}", path.display()),
                Err(_) => String::new(),
            };
            app.workflow.finish(&mut app.view.form, result);
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}
