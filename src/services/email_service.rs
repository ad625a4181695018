use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use url::Url;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, Serialize)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResendResponse {
    pub id: Option<String>,
}

/// Transactional mail over the Resend HTTP API. Delivery is always
/// best-effort: callers spawn sends after their database write and drop
/// the result.
#[derive(Clone)]
pub struct EmailService {
    client: Client,
    api_key: Option<String>,
    from: String,
    site_url: Url,
    test_mode: bool,
    test_address: String,
}

impl EmailService {
    pub fn new(
        api_key: Option<String>,
        from: String,
        site_url: &str,
        test_mode: bool,
        test_address: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client for email service");

        let api_key = api_key.filter(|key| !key.trim().is_empty());
        if api_key.is_some() {
            info!("Email sending enabled via Resend");
        } else {
            info!("Email sending disabled (RESEND_API_KEY not set or empty)");
        }
        if test_mode {
            info!("Email test mode on, all mail goes to {}", test_address);
        }

        let site_url = Url::parse(site_url).unwrap_or_else(|err| {
            warn!("Invalid SITE_URL ({err}), falling back to http://localhost:3000");
            Url::parse("http://localhost:3000").expect("fallback site url")
        });

        Self {
            client,
            api_key,
            from,
            site_url,
            test_mode,
            test_address,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// In test mode every message is redirected to the single test
    /// address no matter who it was meant for.
    pub fn resolve_recipient<'a>(&'a self, recipient: &'a str) -> &'a str {
        if self.test_mode {
            &self.test_address
        } else {
            recipient
        }
    }

    fn dashboard_link(&self, path: &str) -> String {
        self.site_url
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.site_url, path))
    }

    /// "Someone applied" mail to the campaign's business.
    pub async fn send_application_received(
        &self,
        business_email: &str,
        business_name: &str,
        campaign_title: &str,
        advertiser_name: &str,
        message: Option<&str>,
    ) -> Result<(), String> {
        let subject = application_received_subject(advertiser_name, campaign_title);
        let html = application_received_html(
            business_name,
            campaign_title,
            advertiser_name,
            message,
            &self.dashboard_link("business/dashboard"),
        );
        self.deliver(business_email, subject, html).await
    }

    /// Accept/reject outcome mail to the advertiser.
    pub async fn send_application_decided(
        &self,
        advertiser_email: &str,
        advertiser_name: &str,
        campaign_title: &str,
        business_name: &str,
        accepted: bool,
    ) -> Result<(), String> {
        let subject = application_decided_subject(campaign_title, accepted);
        let html = application_decided_html(
            advertiser_name,
            campaign_title,
            business_name,
            accepted,
            &self.dashboard_link("advertiser/dashboard"),
        );
        self.deliver(advertiser_email, subject, html).await
    }

    async fn deliver(&self, to: &str, subject: String, html: String) -> Result<(), String> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Ok(()),
        };

        let recipient = self.resolve_recipient(to);
        let payload = EmailPayload {
            from: self.from.clone(),
            to: vec![recipient.to_string()],
            subject: subject.clone(),
            html,
        };

        info!("Sending email \"{}\" to {}", subject, recipient);

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Resend rejected \"{}\" with status {}: {}", subject, status, body);
            return Err(format!("HTTP error {}: {}", status, body));
        }

        match response.json::<ResendResponse>().await {
            Ok(resp) => {
                info!(
                    "Email \"{}\" accepted by Resend (id {})",
                    subject,
                    resp.id.as_deref().unwrap_or("unknown")
                );
            }
            Err(_) => {
                warn!("Resend accepted \"{}\" but returned a non-JSON body", subject);
            }
        }
        Ok(())
    }
}

pub fn application_received_subject(advertiser_name: &str, campaign_title: &str) -> String {
    format!(
        "New Application: {} applied for \"{}\"",
        advertiser_name, campaign_title
    )
}

pub fn application_decided_subject(campaign_title: &str, accepted: bool) -> String {
    if accepted {
        format!("Application Accepted ✅: {}", campaign_title)
    } else {
        format!("Application Rejected ❌: {}", campaign_title)
    }
}

fn application_received_html(
    business_name: &str,
    campaign_title: &str,
    advertiser_name: &str,
    message: Option<&str>,
    dashboard_url: &str,
) -> String {
    let message_block = message
        .filter(|m| !m.trim().is_empty())
        .map(|m| format!("<p><strong>Their message:</strong> {}</p>", m))
        .unwrap_or_default();

    format!(
        "<div>\
         <h2>New application for \"{campaign_title}\"</h2>\
         <p>Hi {business_name},</p>\
         <p><strong>{advertiser_name}</strong> wants to wear your merch.</p>\
         {message_block}\
         <p><a href=\"{dashboard_url}\">Review it on your dashboard</a></p>\
         </div>"
    )
}

fn application_decided_html(
    advertiser_name: &str,
    campaign_title: &str,
    business_name: &str,
    accepted: bool,
    dashboard_url: &str,
) -> String {
    let verdict = if accepted {
        format!("<p><strong>{business_name}</strong> accepted your application. They will reach out with the next steps.</p>")
    } else {
        format!("<p><strong>{business_name}</strong> went with someone else this time.</p>")
    };

    format!(
        "<div>\
         <h2>Your application for \"{campaign_title}\"</h2>\
         <p>Hi {advertiser_name},</p>\
         {verdict}\
         <p><a href=\"{dashboard_url}\">See all your applications</a></p>\
         </div>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(test_mode: bool, api_key: Option<&str>) -> EmailService {
        EmailService::new(
            api_key.map(String::from),
            "Human Billboard <onboarding@resend.dev>".to_string(),
            "https://humanbillboard.example",
            test_mode,
            "delivered@resend.dev".to_string(),
        )
    }

    #[test]
    fn test_mode_redirects_every_recipient() {
        let svc = service(true, Some("re_key"));
        assert_eq!(svc.resolve_recipient("owner@business.com"), "delivered@resend.dev");
        assert_eq!(svc.resolve_recipient("fan@example.com"), "delivered@resend.dev");
    }

    #[test]
    fn live_mode_keeps_the_real_recipient() {
        let svc = service(false, Some("re_key"));
        assert_eq!(svc.resolve_recipient("owner@business.com"), "owner@business.com");
    }

    #[test]
    fn missing_api_key_disables_sending() {
        assert!(!service(true, None).is_enabled());
        assert!(!service(true, Some("   ")).is_enabled());
        assert!(service(true, Some("re_key")).is_enabled());
    }

    #[test]
    fn disabled_service_swallows_sends() {
        let svc = service(true, None);
        let sent = tokio_test::block_on(svc.send_application_received(
            "owner@business.com",
            "Torchy's",
            "Taco tee Tuesdays",
            "Jordan Walker",
            None,
        ));
        assert!(sent.is_ok());
    }

    #[test]
    fn subjects_carry_the_names() {
        let subject = application_received_subject("Jordan Walker", "Taco tee Tuesdays");
        assert_eq!(subject, "New Application: Jordan Walker applied for \"Taco tee Tuesdays\"");

        assert!(application_decided_subject("Taco tee Tuesdays", true).starts_with("Application Accepted"));
        assert!(application_decided_subject("Taco tee Tuesdays", false).starts_with("Application Rejected"));
    }

    #[test]
    fn received_html_includes_the_optional_message() {
        let html = application_received_html(
            "Torchy's",
            "Taco tee Tuesdays",
            "Jordan Walker",
            Some("I run 5k downtown every morning."),
            "https://humanbillboard.example/business/dashboard",
        );
        assert!(html.contains("I run 5k downtown every morning."));
        assert!(html.contains("business/dashboard"));

        let bare = application_received_html(
            "Torchy's",
            "Taco tee Tuesdays",
            "Jordan Walker",
            None,
            "https://humanbillboard.example/business/dashboard",
        );
        assert!(!bare.contains("Their message"));
    }
}
