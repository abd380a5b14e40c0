use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Outbound notification port. Delivery is awaited for ordering but the
/// message itself is fire-and-forget; there is no read-back.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;
}

#[derive(Serialize)]
struct MailSender<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct MailRecipient<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MailPayload<'a> {
    sender: MailSender<'a>,
    to: Vec<MailRecipient<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

/// Transactional-email HTTP API client (Brevo-shaped v3 endpoint).
pub struct HttpMailer {
    config: MailConfig,
    client: reqwest::Client,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        let payload = MailPayload {
            sender: MailSender {
                name: &self.config.sender_name,
                email: &self.config.sender_email,
            },
            to: vec![MailRecipient { email: &email.to }],
            subject: &email.subject,
            html_content: &email.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "(no body)".to_string());
            return Err(anyhow!("mail API error: {} - {}", status, body));
        }

        Ok(())
    }
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(|d| d.format("%a %b %d %Y").to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn details_table(reason: &str, dates: &[NaiveDate], note: Option<&str>) -> String {
    let cell = "padding: 8px; border: 1px solid #ddd;";
    let mut rows = format!(
        r#"<tr><td style="{cell}"><strong>Reason</strong></td><td style="{cell}">{reason}</td></tr>
           <tr><td style="{cell}"><strong>Leave Dates</strong></td><td style="{cell}">{dates}</td></tr>"#,
        cell = cell,
        reason = reason,
        dates = format_dates(dates),
    );
    if let Some(note) = note {
        rows.push_str(&format!(
            r#"<tr><td style="{cell}"><strong>Reviewer's Note</strong></td><td style="{cell}">{note}</td></tr>"#,
            cell = cell,
            note = note,
        ));
    }
    format!(
        r#"<table style="width: 100%; border-collapse: collapse; margin-top: 16px;">{rows}</table>"#
    )
}

fn layout(banner_color: &str, title: &str, body: &str) -> String {
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: auto; border: 1px solid #eee; border-radius: 8px;">
          <div style="background-color: {banner_color}; color: white; padding: 16px 24px;">
            <h2 style="margin: 0;">{title}</h2>
          </div>
          <div style="padding: 24px;">{body}</div>
        </div>"#
    )
}

pub fn new_application_email(
    manager_name: &str,
    manager_email: &str,
    employee_name: &str,
    reason: &str,
    dates: &[NaiveDate],
) -> Email {
    let body = format!(
        r#"<p>Dear <strong>{manager_name}</strong>,</p>
        <p><strong>{employee_name}</strong> has submitted a new leave application. Below are the details:</p>
        {table}
        <p style="margin-top: 24px;">Please log in to the system to review and take appropriate action.</p>
        <p style="margin-top: 32px;">Regards,<br><strong>Leave Management System</strong></p>"#,
        table = details_table(reason, dates, None),
    );
    Email {
        to: manager_email.to_string(),
        subject: "New Leave Application Submitted".to_string(),
        html: layout("#004aad", "New Leave Application", &body),
    }
}

pub fn approved_email(
    employee_name: &str,
    employee_email: &str,
    reviewer_name: &str,
    reason: &str,
    dates: &[NaiveDate],
) -> Email {
    let body = format!(
        r#"<p>Dear <strong>{employee_name}</strong>,</p>
        <p>We are pleased to inform you that your leave request has been <strong>approved</strong>.</p>
        {table}
        <p style="margin-top: 24px;">If you have any questions, feel free to contact your manager or HR.</p>
        <p style="margin-top: 32px;">Best regards,<br><strong>{reviewer_name}</strong></p>"#,
        table = details_table(reason, dates, None),
    );
    Email {
        to: employee_email.to_string(),
        subject: "Your Leave Has Been Approved".to_string(),
        html: layout("#28a745", "Leave Approved", &body),
    }
}

pub fn rejected_email(
    employee_name: &str,
    employee_email: &str,
    reviewer_name: &str,
    reason: &str,
    dates: &[NaiveDate],
    note: Option<&str>,
) -> Email {
    let body = format!(
        r#"<p>Dear <strong>{employee_name}</strong>,</p>
        <p>We regret to inform you that your leave request has been <strong>rejected</strong>.</p>
        {table}
        <p style="margin-top: 24px;">If you have any concerns or need clarification, please contact your manager.</p>
        <p style="margin-top: 32px;">Best regards,<br><strong>{reviewer_name}</strong></p>"#,
        table = details_table(reason, dates, note),
    );
    Email {
        to: employee_email.to_string(),
        subject: "Your Leave Has Been Rejected".to_string(),
        html: layout("#dc3545", "Leave Request Rejected", &body),
    }
}
