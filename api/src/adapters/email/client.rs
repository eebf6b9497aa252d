//! Email delivery client implementation
//!
//! The mail service owns templates and rendering. We post the assignment and
//! the recipient; a 2xx answer means the message was accepted for delivery.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::entities::{HomeworkAssignment, Learner};
use crate::domain::ports::EmailDelivery;
use crate::error::DeliveryError;

/// HTTP client for the email delivery service
pub struct HttpEmailClient {
    http: Client,
    base_url: String,
    api_token: String,
}

impl HttpEmailClient {
    pub fn new(base_url: String, api_token: String) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_empty_response(
        &self,
        response: reqwest::Response,
    ) -> Result<(), DeliveryError> {
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else if status.is_client_error() && status.as_u16() != 401 && status.as_u16() != 429 {
            // bad address, unknown template: resending the same payload won't help
            let message = response.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected(message))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(DeliveryError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[derive(Serialize)]
struct SendHomeworkRequest<'a> {
    to: &'a str,
    name: &'a str,
    subject: &'a str,
    body: &'a str,
    chapter_id: i32,
}

impl<'a> SendHomeworkRequest<'a> {
    fn new(assignment: &'a HomeworkAssignment, learner: &'a Learner) -> Self {
        Self {
            to: &learner.email,
            name: &learner.name,
            subject: &assignment.title,
            body: &assignment.content,
            chapter_id: assignment.chapter_id,
        }
    }
}

#[async_trait]
impl EmailDelivery for HttpEmailClient {
    async fn send_homework(
        &self,
        assignment: &HomeworkAssignment,
        learner: &Learner,
    ) -> Result<(), DeliveryError> {
        let resp = self
            .http
            .post(self.api_url("/send"))
            .bearer_auth(&self.api_token)
            .json(&SendHomeworkRequest::new(assignment, learner))
            .send()
            .await?;

        self.handle_empty_response(resp).await
    }
}

/// Mailer used when no email service is configured. Every send is reported
/// as not delivered so the notification log shows it.
pub struct NoopEmailClient;

#[async_trait]
impl EmailDelivery for NoopEmailClient {
    async fn send_homework(
        &self,
        assignment: &HomeworkAssignment,
        learner: &Learner,
    ) -> Result<(), DeliveryError> {
        tracing::warn!(
            learner = %learner.id,
            homework = %assignment.id,
            "Email delivery not configured, homework not sent"
        );
        Err(DeliveryError::Rejected(
            "email delivery is not configured".to_string(),
        ))
    }
}

/// The mailer picked at startup from configuration
pub enum EmailClient {
    Http(HttpEmailClient),
    Noop(NoopEmailClient),
}

impl EmailClient {
    pub fn from_config(api_url: Option<String>, api_token: Option<String>) -> Self {
        match api_url {
            Some(url) => EmailClient::Http(HttpEmailClient::new(url, api_token.unwrap_or_default())),
            None => EmailClient::Noop(NoopEmailClient),
        }
    }
}

#[async_trait]
impl EmailDelivery for EmailClient {
    async fn send_homework(
        &self,
        assignment: &HomeworkAssignment,
        learner: &Learner,
    ) -> Result<(), DeliveryError> {
        match self {
            EmailClient::Http(client) => client.send_homework(assignment, learner).await,
            EmailClient::Noop(client) => client.send_homework(assignment, learner).await,
        }
    }
}
