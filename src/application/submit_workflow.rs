use std::{future::Future, path::PathBuf, sync::Arc};

use tracing::{info, warn};

use super::file_saver::FileSaver;
use crate::{
    api::ApiClient,
    domain::{AppError, FormState},
};

/// One form submission: validate, convert on the backend, save the result.
#[derive(Clone)]
pub struct SubmitWorkflow {
    api_client: ApiClient,
    saver: Arc<dyn FileSaver>,
}

impl SubmitWorkflow {
    pub fn new(api_client: ApiClient, saver: Arc<dyn FileSaver>) -> Self {
        Self { api_client, saver }
    }

    /// Starts a submission on `state`. Returns the conversion and save work
    /// still to run, or `None` when the input was rejected locally. The
    /// result of that work goes back through [`SubmitWorkflow::finish`].
    pub fn start(
        &self,
        state: &mut FormState,
    ) -> Option<impl Future<Output = Result<PathBuf, AppError>> + Send + 'static> {
        let url = state.begin_submission()?;
        let workflow = self.clone();
        Some(async move { workflow.execute(url).await })
    }

    /// Settles a submission started with [`SubmitWorkflow::start`].
    pub fn finish(&self, state: &mut FormState, result: Result<PathBuf, AppError>) {
        match &result {
            Ok(path) => info!(path = %path.display(), "Download finished"),
            Err(e) => warn!(error = %e, "Submission failed"),
        }
        state.finish_submission(result);
    }

    async fn execute(&self, url: String) -> Result<PathBuf, AppError> {
        info!(%url, "Requesting conversion");

        let audio = self.api_client.convert(&url).await?;
        self.saver.save(audio.bytes, &audio.filename).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::*;
    use crate::api::ApiConfig;
    use crate::domain::{error::VALIDATION_MESSAGE, SubmitPhase};

    #[derive(Default)]
    struct RecordingSaver {
        saved: Mutex<Vec<(Bytes, String)>>,
        fail_with: Option<AppError>,
    }

    #[async_trait]
    impl FileSaver for RecordingSaver {
        async fn save(&self, bytes: Bytes, suggested_name: &str) -> Result<PathBuf, AppError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.saved
                .lock()
                .unwrap()
                .push((bytes, suggested_name.to_string()));
            Ok(PathBuf::from("/downloads").join(suggested_name))
        }
    }

    async fn submit(workflow: &SubmitWorkflow, state: &mut FormState) {
        if let Some(pending) = workflow.start(state) {
            let result = pending.await;
            workflow.finish(state, result);
        }
    }

    fn workflow(base_url: &str, saver: Arc<RecordingSaver>) -> SubmitWorkflow {
        SubmitWorkflow::new(ApiClient::new(ApiConfig::new(base_url)), saver)
    }

    fn form(url: &str) -> FormState {
        FormState {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_blank_input_makes_no_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/convert")
            .expect(0)
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver::default());
        let workflow = workflow(&server.url(), saver.clone());

        for input in ["", "   ", "\n\t"] {
            let mut state = form(input);
            submit(&workflow, &mut state).await;

            assert_eq!(state.error.as_deref(), Some(VALIDATION_MESSAGE));
            assert!(!state.loading);
            assert!(!state.success);
        }

        mock.assert_async().await;
        assert!(saver.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_success_saves_under_header_filename() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(200)
            .with_header(
                "content-disposition",
                r#"attachment; filename="song name.m4a""#,
            )
            .with_body("audio-bytes")
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver::default());
        let workflow = workflow(&server.url(), saver.clone());

        let mut state = form("https://www.youtube.com/watch?v=abc");
        submit(&workflow, &mut state).await;

        assert!(state.success);
        assert!(!state.loading);
        assert_eq!(state.error, None);
        assert!(state.url.is_empty());
        assert_eq!(state.phase(), SubmitPhase::Succeeded);

        let saved = saver.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, Bytes::from_static(b"audio-bytes"));
        assert_eq!(saved[0].1, "song name.m4a");
    }

    #[tokio::test]
    async fn test_success_without_header_uses_default_name() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(200)
            .with_body("audio-bytes")
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver::default());
        let workflow = workflow(&server.url(), saver.clone());

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;

        assert!(state.success);
        assert_eq!(saver.saved.lock().unwrap()[0].1, "audio.m4a");
    }

    #[tokio::test]
    async fn test_server_error_message_surfaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(500)
            .with_body(r#"{"error":"X"}"#)
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver::default());
        let workflow = workflow(&server.url(), saver.clone());

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;

        assert_eq!(state.error.as_deref(), Some("X"));
        assert!(!state.success);
        assert!(!state.loading);
        assert_eq!(state.url, "https://youtu.be/abc");
        assert!(saver.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_without_body_names_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(503)
            .create_async()
            .await;
        let workflow = workflow(&server.url(), Arc::new(RecordingSaver::default()));

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;

        assert!(state.error.unwrap().contains("503"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_transport_error_keeps_input() {
        let workflow = workflow("http://127.0.0.1:9", Arc::new(RecordingSaver::default()));

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;

        let error = state.error.clone().unwrap();
        assert!(!error.is_empty());
        assert!(!state.loading);
        assert!(!state.success);
        assert_eq!(state.url, "https://youtu.be/abc");
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(200)
            .with_body("audio-bytes")
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver {
            fail_with: Some(AppError::Cancelled),
            ..Default::default()
        });
        let workflow = workflow(&server.url(), saver);

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;

        assert_eq!(state.error.as_deref(), Some("Download cancelled"));
        assert!(!state.success);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(200)
            .with_body("audio-bytes")
            .create_async()
            .await;
        let workflow = workflow(&server.url(), Arc::new(RecordingSaver::default()));

        let mut state = form("   ");
        submit(&workflow, &mut state).await;
        assert!(state.error.is_some());

        state.url = "https://youtu.be/abc".to_string();
        submit(&workflow, &mut state).await;
        assert_eq!(state.error, None);
        assert!(state.success);
    }

    async fn submit_with_disposition(disposition: &str) -> (FormState, Arc<RecordingSaver>) {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/convert")
            .with_status(200)
            .with_header("content-disposition", disposition)
            .with_body("audio-bytes")
            .create_async()
            .await;
        let saver = Arc::new(RecordingSaver::default());
        let workflow = workflow(&server.url(), saver.clone());

        let mut state = form("https://youtu.be/abc");
        submit(&workflow, &mut state).await;
        (state, saver)
    }

    #[tokio::test]
    async fn test_bare_percent_in_filename_fails() {
        let (state, saver) = submit_with_disposition(r#"attachment; filename="100%.m4a""#).await;

        assert_eq!(state.error.as_deref(), Some("URI malformed"));
        assert!(!state.success);
        assert!(!state.loading);
        assert_eq!(state.url, "https://youtu.be/abc");
        assert!(saver.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_utf8_filename_fails() {
        let (state, saver) = submit_with_disposition("attachment; filename=%FF.m4a").await;

        assert_eq!(state.error.as_deref(), Some("URI malformed"));
        assert!(!state.success);
        assert!(!state.loading);
        assert_eq!(state.url, "https://youtu.be/abc");
        assert!(saver.saved.lock().unwrap().is_empty());
    }
}
