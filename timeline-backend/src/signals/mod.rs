// src/signals/mod.rs

//! クラス開始シグナルのバス。
//!
//! 通知ジョブは「誰に通知すべきか」を判定してシグナルを送るだけで、
//! 実際のメール送信などの副作用は登録されたハンドラが担う。

pub mod mail_handler;

use crate::domain::notification::{Audience, ClassNotice};
use crate::error::AppResult;
use async_trait::async_trait;
use std::sync::Arc;

/// 開始前通知シグナル
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassSignal {
    /// タイムライン1件につき1回（代表クラスのみ）
    StartingTeacher(ClassNotice),
    /// クラスごとに1回
    StartingStudent(ClassNotice),
}

impl ClassSignal {
    pub fn audience(&self) -> Audience {
        match self {
            ClassSignal::StartingTeacher(_) => Audience::Teacher,
            ClassSignal::StartingStudent(_) => Audience::Student,
        }
    }

    pub fn notice(&self) -> &ClassNotice {
        match self {
            ClassSignal::StartingTeacher(notice) | ClassSignal::StartingStudent(notice) => notice,
        }
    }
}

#[async_trait]
pub trait SignalHandler: Send + Sync {
    async fn handle(&self, signal: &ClassSignal) -> AppResult<()>;
}

/// ハンドラは登録順に逐次実行され、最初のエラーで中断して呼び出し元へ返す
#[derive(Default, Clone)]
pub struct SignalBus {
    handlers: Vec<Arc<dyn SignalHandler>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&mut self, handler: Arc<dyn SignalHandler>) {
        self.handlers.push(handler);
    }

    pub fn with_handler(mut self, handler: Arc<dyn SignalHandler>) -> Self {
        self.connect(handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub async fn send(&self, signal: ClassSignal) -> AppResult<()> {
        tracing::debug!(
            audience = %signal.audience(),
            class_id = %signal.notice().class_id,
            handlers = self.handlers.len(),
            "Dispatching class signal"
        );

        for handler in &self.handlers {
            handler.handle(&signal).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::notification::Contact;
    use crate::error::AppError;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct Recorder {
        seen: Mutex<Vec<Audience>>,
    }

    #[async_trait]
    impl SignalHandler for Recorder {
        async fn handle(&self, signal: &ClassSignal) -> AppResult<()> {
            self.seen.lock().unwrap().push(signal.audience());
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl SignalHandler for Failing {
        async fn handle(&self, _signal: &ClassSignal) -> AppResult<()> {
            Err(AppError::ExternalServiceError("smtp down".to_string()))
        }
    }

    fn notice() -> ClassNotice {
        let contact = Contact {
            name: "n".to_string(),
            email: "n@example.com".to_string(),
            timezone: chrono_tz::Tz::UTC,
        };
        ClassNotice {
            class_id: Uuid::new_v4(),
            timeline_id: Uuid::new_v4(),
            lesson_name: "Lesson".to_string(),
            start_time: Utc::now(),
            end_time: Utc::now(),
            teacher: contact.clone(),
            student: contact,
        }
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let first = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let bus = SignalBus::new()
            .with_handler(first.clone())
            .with_handler(first.clone());

        bus.send(ClassSignal::StartingTeacher(notice())).await.unwrap();
        bus.send(ClassSignal::StartingStudent(notice())).await.unwrap();

        assert_eq!(
            *first.seen.lock().unwrap(),
            vec![
                Audience::Teacher,
                Audience::Teacher,
                Audience::Student,
                Audience::Student
            ]
        );
    }

    #[tokio::test]
    async fn test_handler_error_is_propagated() {
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let bus = SignalBus::new()
            .with_handler(Arc::new(Failing))
            .with_handler(recorder.clone());

        let result = bus.send(ClassSignal::StartingStudent(notice())).await;

        assert!(matches!(result, Err(AppError::ExternalServiceError(_))));
        assert!(recorder.seen.lock().unwrap().is_empty());
    }
}
