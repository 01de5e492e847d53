// src/signals/mail_handler.rs
use crate::error::AppResult;
use crate::signals::{ClassSignal, SignalHandler};
use crate::utils::email::{MailTemplate, Mailer, OutgoingMail};
use async_trait::async_trait;
use std::sync::Arc;

/// 開始前シグナルを受けて講師・受講者にメールを送る
pub struct ClassStartingMailHandler {
    mailer: Arc<dyn Mailer>,
}

impl ClassStartingMailHandler {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl SignalHandler for ClassStartingMailHandler {
    async fn handle(&self, signal: &ClassSignal) -> AppResult<()> {
        let mail = match signal {
            ClassSignal::StartingTeacher(notice) => OutgoingMail::new(
                MailTemplate::ClassStartingTeacher(notice.clone()),
                vec![notice.teacher.email.clone()],
                notice.teacher.timezone,
            ),
            ClassSignal::StartingStudent(notice) => OutgoingMail::new(
                MailTemplate::ClassStartingStudent(notice.clone()),
                vec![notice.student.email.clone()],
                notice.student.timezone,
            ),
        };

        self.mailer.send(mail).await
    }
}
