// tests/common/mailer.rs
use async_trait::async_trait;
use std::sync::Mutex;
use timeline_backend::error::{AppError, AppResult};
use timeline_backend::utils::email::{Mailer, OutgoingMail};

/// 送信内容を記録するだけの Mailer
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingMail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 常に送信失敗を返す
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_with_template(&self, name: &str) -> Vec<OutgoingMail> {
        self.sent()
            .into_iter()
            .filter(|mail| mail.template.name() == name)
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        if self.fail {
            return Err(AppError::ExternalServiceError(
                "SMTP relay unavailable".to_string(),
            ));
        }
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}
