// timeline-backend/src/utils/email.rs

use crate::domain::notification::{ClassNotice, Contact};
use crate::error::{AppError, AppResult};
use askama::{Html, MarkupDisplay};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::env;
use thiserror::Error;
use tracing::{debug, info};

/// メール送信エラー
#[derive(Error, Debug)]
pub enum EmailError {
    #[error("SMTP configuration error: {0}")]
    ConfigurationError(String),

    #[error("Failed to send email: {0}")]
    SendError(String),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Missing email configuration")]
    MissingConfiguration,
}

/// メール設定
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP サーバーホスト
    pub smtp_host: String,
    /// SMTP サーバーポート
    pub smtp_port: u16,
    /// SMTP ユーザー名
    pub smtp_username: String,
    /// SMTP パスワード
    pub smtp_password: String,
    /// 送信者メールアドレス
    pub from_email: String,
    /// 送信者名
    pub from_name: String,
    /// TLS を使用するか
    pub use_tls: bool,
    /// 開発モードかどうか（ログ出力のみ）
    pub development_mode: bool,
    /// 本文中のリンクに使うサイトURL
    pub site_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "user".to_string(),
            smtp_password: "password".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Timeline".to_string(),
            use_tls: true,
            development_mode: true, // 開発環境ではデフォルトで true
            site_url: "http://localhost:5000".to_string(),
        }
    }
}

impl EmailConfig {
    /// 環境変数から設定を読み込み
    pub fn from_env() -> Result<Self, EmailError> {
        let development_mode = env::var("EMAIL_DEVELOPMENT_MODE")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());

        // 開発モードの場合はデフォルト設定を返す
        if development_mode {
            return Ok(Self {
                development_mode: true,
                site_url,
                ..Default::default()
            });
        }

        let smtp_host = env::var("SMTP_HOST").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_port = env::var("SMTP_PORT")
            .unwrap_or_else(|_| "587".to_string())
            .parse()
            .map_err(|_| EmailError::ConfigurationError("Invalid SMTP port".to_string()))?;

        let smtp_username =
            env::var("SMTP_USERNAME").map_err(|_| EmailError::MissingConfiguration)?;

        let smtp_password =
            env::var("SMTP_PASSWORD").map_err(|_| EmailError::MissingConfiguration)?;

        let from_email = env::var("FROM_EMAIL").map_err(|_| EmailError::MissingConfiguration)?;

        let from_name = env::var("FROM_NAME").unwrap_or_else(|_| "Timeline".to_string());

        let use_tls = env::var("SMTP_USE_TLS")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_email,
            from_name,
            use_tls,
            development_mode: false,
            site_url,
        })
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<(), EmailError> {
        if self.development_mode {
            return Ok(()); // 開発モードでは検証をスキップ
        }

        if self.smtp_host.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP host is required".to_string(),
            ));
        }

        if self.smtp_username.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP username is required".to_string(),
            ));
        }

        if self.smtp_password.is_empty() {
            return Err(EmailError::ConfigurationError(
                "SMTP password is required".to_string(),
            ));
        }

        if !is_valid_email(&self.from_email) {
            return Err(EmailError::InvalidAddress(self.from_email.clone()));
        }

        Ok(())
    }
}

/// レンダリング済みのメール
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// 送信するテンプレートとそのコンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailTemplate {
    /// 講師向け: 担当クラスがまもなく開始
    ClassStartingTeacher(ClassNotice),
    /// 受講者向け: 予約したクラスがまもなく開始
    ClassStartingStudent(ClassNotice),
    /// しばらく受講していない顧客へのリマインド
    ReminderForInactiveStudents { customer: Contact },
}

impl MailTemplate {
    pub fn name(&self) -> &'static str {
        match self {
            MailTemplate::ClassStartingTeacher(_) => "class_starting_teacher",
            MailTemplate::ClassStartingStudent(_) => "class_starting_student",
            MailTemplate::ReminderForInactiveStudents { .. } => "reminder_for_inactive_students",
        }
    }

    /// 宛先のタイムゾーンで時刻を埋め込んでレンダリング
    pub fn render(&self, timezone: Tz, site_url: &str) -> EmailTemplate {
        match self {
            MailTemplate::ClassStartingTeacher(notice) => {
                let start = local_time(notice.start_time, timezone);
                let subject = format!("Your class \"{}\" starts soon", notice.lesson_name);
                let html_body = format!(
                    r#"<p>Hello {teacher},</p>
<p>Your class <b>{lesson}</b> starts at <b>{start}</b>.</p>
<p><a href="{site_url}/timeline/">Open your calendar</a></p>"#,
                    teacher = html(&notice.teacher.name),
                    lesson = html(&notice.lesson_name),
                    start = start,
                    site_url = html(site_url),
                );
                let text_body = format!(
                    "Hello {},\n\nYour class \"{}\" starts at {}.\n\n{}/timeline/\n",
                    notice.teacher.name, notice.lesson_name, start, site_url
                );
                EmailTemplate {
                    subject,
                    html_body,
                    text_body,
                }
            }
            MailTemplate::ClassStartingStudent(notice) => {
                let start = local_time(notice.start_time, timezone);
                let subject = format!("Your lesson \"{}\" starts soon", notice.lesson_name);
                let html_body = format!(
                    r#"<p>Hello {student},</p>
<p>Your lesson <b>{lesson}</b> with {teacher} starts at <b>{start}</b>.</p>
<p>Please be ready a couple of minutes in advance.</p>"#,
                    student = html(&notice.student.name),
                    lesson = html(&notice.lesson_name),
                    teacher = html(&notice.teacher.name),
                    start = start,
                );
                let text_body = format!(
                    "Hello {},\n\nYour lesson \"{}\" with {} starts at {}.\nPlease be ready a couple of minutes in advance.\n",
                    notice.student.name, notice.lesson_name, notice.teacher.name, start
                );
                EmailTemplate {
                    subject,
                    html_body,
                    text_body,
                }
            }
            MailTemplate::ReminderForInactiveStudents { customer } => {
                let subject = "We miss you! Schedule your next lesson".to_string();
                let html_body = format!(
                    r#"<p>Hello {name},</p>
<p>You have not had a lesson for a while, and you still have lessons left in your subscription.</p>
<p><a href="{site_url}/market/">Schedule your next lesson</a></p>"#,
                    name = html(&customer.name),
                    site_url = html(site_url),
                );
                let text_body = format!(
                    "Hello {},\n\nYou have not had a lesson for a while, and you still have lessons left in your subscription.\n\nSchedule your next lesson: {}/market/\n",
                    customer.name, site_url
                );
                EmailTemplate {
                    subject,
                    html_body,
                    text_body,
                }
            }
        }
    }
}

/// HTML 本文に埋め込む値をエスケープ
fn html(value: &str) -> MarkupDisplay<Html, &str> {
    MarkupDisplay::new_unsafe(value, Html)
}

fn local_time(at: DateTime<Utc>, timezone: Tz) -> String {
    at.with_timezone(&timezone)
        .format("%Y-%m-%d %H:%M (%Z)")
        .to_string()
}

/// テンプレート + 宛先 + タイムゾーン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub template: MailTemplate,
    pub to: Vec<String>,
    pub timezone: Tz,
}

impl OutgoingMail {
    pub fn new(template: MailTemplate, to: Vec<String>, timezone: Tz) -> Self {
        Self {
            template,
            to,
            timezone,
        }
    }
}

/// メール送信の抽象（シグナルハンドラ・ジョブから利用）
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()>;
}

/// 送信内容
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// メール送信サービス
pub struct EmailService {
    config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl EmailService {
    /// 新しいEmailServiceを作成
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let transport = if config.development_mode {
            None
        } else {
            Some(build_transport(&config)?)
        };

        Ok(Self { config, transport })
    }

    /// 環境変数から設定を読み込んでEmailServiceを作成
    pub fn from_env() -> Result<Self, EmailError> {
        let config = EmailConfig::from_env()?;
        Self::new(config)
    }

    pub fn is_development_mode(&self) -> bool {
        self.config.development_mode
    }

    /// メールを1通送信
    pub async fn send_email(&self, message: EmailMessage) -> AppResult<()> {
        if !is_valid_email(&message.to_email) {
            return Err(AppError::ValidationError(format!(
                "Invalid email address: {}",
                message.to_email
            )));
        }

        let Some(transport) = &self.transport else {
            // 開発モードではログ出力のみ
            self.log_email(&message);
            return Ok(());
        };

        let from: Mailbox = format!("{} <{}>", self.config.from_name, self.config.from_email)
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.config.from_email.clone()))?;
        let to: Mailbox = message
            .to_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(message.to_email.clone()))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body,
                message.html_body,
            ))
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendError(e.to_string()))?;

        info!(
            to_email = %mask_email(&message.to_email),
            subject = %message.subject,
            "Email sent successfully"
        );

        Ok(())
    }

    /// 開発モードでのメールログ出力
    fn log_email(&self, message: &EmailMessage) {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            "📧 EMAIL (Development Mode)"
        );
        debug!("--- Text Body ---\n{}", message.text_body);
    }
}

#[async_trait]
impl Mailer for EmailService {
    async fn send(&self, mail: OutgoingMail) -> AppResult<()> {
        let rendered = mail.template.render(mail.timezone, &self.config.site_url);

        debug!(
            template = mail.template.name(),
            recipients = mail.to.len(),
            "Rendering mail"
        );

        for to_email in mail.to {
            self.send_email(EmailMessage {
                to_email,
                subject: rendered.subject.clone(),
                html_body: rendered.html_body.clone(),
                text_body: rendered.text_body.clone(),
            })
            .await?;
        }

        Ok(())
    }
}

fn build_transport(config: &EmailConfig) -> Result<AsyncSmtpTransport<Tokio1Executor>, EmailError> {
    let credentials = Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

    let builder = if config.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| EmailError::ConfigurationError(e.to_string()))?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };

    Ok(builder
        .port(config.smtp_port)
        .credentials(credentials)
        .build())
}

/// 簡易メールアドレス検証
fn is_valid_email(email: &str) -> bool {
    // @が一つだけあること
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    // ローカル部とドメイン部が空でないこと
    if local.is_empty() || domain.is_empty() {
        return false;
    }

    // ドメイン部に.が含まれ、.で始まったり終わったりしないこと
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// メールアドレスをマスク
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let (local, domain) = email.split_at(at_pos);
        let masked_local = match (local.chars().next(), local.chars().count()) {
            (Some(first), count) if count > 2 => format!("{first}****"),
            (_, count) => "*".repeat(count),
        };
        format!("{}{}", masked_local, domain)
    } else {
        "****@****".to_string()
    }
}
