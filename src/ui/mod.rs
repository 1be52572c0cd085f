use iced::{
    widget::{button, column, text, text_input, Space},
    Element, Length,
};

use crate::domain::{FormState, SubmitPhase};

/// Main view state
pub struct DownloadView {
    pub form: FormState,
    /// Informational line below the form (backend status, last saved file).
    pub status_message: String,
}

impl Default for DownloadView {
    fn default() -> Self {
        Self {
            form: FormState::default(),
            status_message: "Paste a YouTube link to download its audio".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    SubmitPressed,
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.form.url = url;
            }
            DownloadMessage::SubmitPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let idle = !self.form.loading;

        let label = match self.form.phase() {
            SubmitPhase::Requesting => "Downloading...",
            _ => "Download Audio",
        };

        let mut content = column![
            text("YouTube to Audio").size(32),
            text("Convert YouTube videos to audio").size(14),
            Space::new().height(Length::Fixed(20.0)),
            text_input("https://www.youtube.com/watch?v=...", &self.form.url)
                .on_input_maybe(idle.then_some(DownloadMessage::UrlChanged))
                .on_submit_maybe(idle.then_some(DownloadMessage::SubmitPressed))
                .padding(10),
            button(label)
                .on_press_maybe(idle.then_some(DownloadMessage::SubmitPressed))
                .padding([10, 20]),
        ]
        .padding(20)
        .spacing(10);

        if let Some(error) = &self.form.error {
            content = content.push(text(error).size(14).style(text::danger));
        }
        if self.form.success {
            content = content.push(text("Download complete! ✓").size(14).style(text::success));
        }

        content
            .push(Space::new().height(Length::Fixed(10.0)))
            .push(text(&self.status_message).size(12))
            .into()
    }
}
