//! Design status emails for customers and the shop.
//!
//! Messages are rendered from askama templates under `templates/email/` and
//! handed to [`EmailService`] when SMTP is configured. Without SMTP the
//! rendered message is logged instead.

use askama::Template;
use thiserror::Error;

use product_configurator_core::DesignStatus;

use super::email::{EmailError, EmailService, OutgoingEmail};
use crate::config::EmailConfig;

/// Errors that can occur while notifying.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Which email to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    DesignSubmitted,
    DesignApproved,
    DesignRejected,
    DesignInProduction,
    DesignCompleted,
    /// Sent to the shop, not the customer.
    NewDesignSubmission,
}

impl NotificationKind {
    /// Customer email for a design entering `status`.
    #[must_use]
    pub const fn for_status(status: DesignStatus) -> Option<Self> {
        match status {
            DesignStatus::Pending => Some(Self::DesignSubmitted),
            DesignStatus::Approved => Some(Self::DesignApproved),
            DesignStatus::Rejected => Some(Self::DesignRejected),
            DesignStatus::InProduction => Some(Self::DesignInProduction),
            DesignStatus::Completed => Some(Self::DesignCompleted),
            DesignStatus::Draft => None,
        }
    }

    const fn subject(self) -> &'static str {
        match self {
            Self::DesignSubmitted => "Design Submitted Successfully",
            Self::DesignApproved => "Design Approved - Ready for Production",
            Self::DesignRejected => "Design Requires Revision",
            Self::DesignInProduction => "Design in Production",
            Self::DesignCompleted => "Design Completed - Order Ready",
            Self::NewDesignSubmission => "New Design Submission",
        }
    }
}

/// Shop details used in every email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopContext {
    pub name: String,
    /// Storefront domain for customer links.
    pub domain: String,
    /// `*.myshopify.com` domain for admin links.
    pub admin_domain: String,
    /// Sender address: the notification email setting or the shop email.
    pub from: Option<String>,
}

/// The design an email is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignNotice {
    /// Metaobject GID.
    pub design_gid: String,
    pub handle: Option<String>,
    pub customer_email: String,
    /// Note from the reviewer, shown in status emails.
    pub message: Option<String>,
}

impl DesignNotice {
    /// Short id shown to people: the handle, else the last GID segment.
    #[must_use]
    pub fn display_id(&self) -> &str {
        match self.handle.as_deref() {
            Some(handle) if !handle.is_empty() => handle,
            _ => self
                .design_gid
                .rsplit('/')
                .next()
                .unwrap_or(&self.design_gid),
        }
    }
}

/// Values the templates interpolate.
#[derive(Debug, Clone)]
struct EmailContext {
    shop_name: String,
    design_id: String,
    customer_email: String,
    message: Option<String>,
    design_url: String,
    order_url: String,
    admin_url: String,
}

impl EmailContext {
    fn new(shop: &ShopContext, notice: &DesignNotice) -> Self {
        let design_id = notice.display_id().to_string();
        Self {
            shop_name: shop.name.clone(),
            design_url: format!(
                "https://{}/apps/my-designs?email={}",
                shop.domain,
                urlencoding::encode(&notice.customer_email)
            ),
            order_url: format!("https://{}/account", shop.domain),
            admin_url: format!(
                "https://{}/admin/apps/product-configurator/designs/{design_id}",
                shop.admin_domain
            ),
            design_id,
            customer_email: notice.customer_email.clone(),
            message: notice.message.clone().filter(|m| !m.trim().is_empty()),
        }
    }
}

macro_rules! email_templates {
    ($($html:ident => $html_path:tt, $text:ident => $text_path:tt;)+) => {
        $(
            #[derive(Template)]
            #[template(path = $html_path)]
            struct $html<'a> {
                ctx: &'a EmailContext,
            }

            #[derive(Template)]
            #[template(path = $text_path)]
            struct $text<'a> {
                ctx: &'a EmailContext,
            }
        )+
    };
}

email_templates! {
    SubmittedHtml => "email/design_submitted.html", SubmittedText => "email/design_submitted.txt";
    ApprovedHtml => "email/design_approved.html", ApprovedText => "email/design_approved.txt";
    RejectedHtml => "email/design_rejected.html", RejectedText => "email/design_rejected.txt";
    InProductionHtml => "email/design_in_production.html", InProductionText => "email/design_in_production.txt";
    CompletedHtml => "email/design_completed.html", CompletedText => "email/design_completed.txt";
    AdminHtml => "email/new_design_submission.html", AdminText => "email/new_design_submission.txt";
}

/// Render subject, text and HTML bodies.
fn render(
    kind: NotificationKind,
    ctx: &EmailContext,
) -> Result<(String, String, String), askama::Error> {
    let (text, html) = match kind {
        NotificationKind::DesignSubmitted => {
            (SubmittedText { ctx }.render()?, SubmittedHtml { ctx }.render()?)
        }
        NotificationKind::DesignApproved => {
            (ApprovedText { ctx }.render()?, ApprovedHtml { ctx }.render()?)
        }
        NotificationKind::DesignRejected => {
            (RejectedText { ctx }.render()?, RejectedHtml { ctx }.render()?)
        }
        NotificationKind::DesignInProduction => (
            InProductionText { ctx }.render()?,
            InProductionHtml { ctx }.render()?,
        ),
        NotificationKind::DesignCompleted => {
            (CompletedText { ctx }.render()?, CompletedHtml { ctx }.render()?)
        }
        NotificationKind::NewDesignSubmission => {
            (AdminText { ctx }.render()?, AdminHtml { ctx }.render()?)
        }
    };
    let subject = format!("{} - {}", ctx.shop_name, kind.subject());
    Ok((subject, text, html))
}

/// Builds and delivers design emails.
#[derive(Clone)]
pub struct Notifier {
    email: Option<EmailService>,
}

impl Notifier {
    /// Notifier that delivers over SMTP when `config` is set.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured.
    pub fn new(config: Option<&EmailConfig>) -> Result<Self, NotificationError> {
        let email = config
            .map(EmailService::new)
            .transpose()
            .map_err(EmailError::from)?;
        Ok(Self { email })
    }

    /// Notifier that only logs.
    #[must_use]
    pub const fn log_only() -> Self {
        Self { email: None }
    }

    /// Email the customer about their design.
    ///
    /// # Errors
    ///
    /// Returns error if rendering or delivery fails.
    pub async fn notify_customer(
        &self,
        kind: NotificationKind,
        shop: &ShopContext,
        notice: &DesignNotice,
    ) -> Result<(), NotificationError> {
        let email = build_email(kind, shop, notice, &notice.customer_email)?;
        self.deliver(email).await
    }

    /// Tell the shop a design was submitted.
    ///
    /// # Errors
    ///
    /// Returns error if rendering or delivery fails.
    pub async fn notify_admin(
        &self,
        to: &str,
        shop: &ShopContext,
        notice: &DesignNotice,
    ) -> Result<(), NotificationError> {
        let email = build_email(NotificationKind::NewDesignSubmission, shop, notice, to)?;
        self.deliver(email).await
    }

    async fn deliver(&self, email: OutgoingEmail) -> Result<(), NotificationError> {
        match &self.email {
            Some(service) => service.send(&email).await?,
            None => tracing::info!(
                to = %email.to,
                subject = %email.subject,
                body = %email.text,
                "SMTP not configured, email logged"
            ),
        }
        Ok(())
    }
}

fn build_email(
    kind: NotificationKind,
    shop: &ShopContext,
    notice: &DesignNotice,
    to: &str,
) -> Result<OutgoingEmail, NotificationError> {
    let ctx = EmailContext::new(shop, notice);
    let (subject, text, html) = render(kind, &ctx)?;
    Ok(OutgoingEmail {
        to: to.to_string(),
        from: shop.from.clone(),
        subject,
        text,
        html,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shop() -> ShopContext {
        ShopContext {
            name: "Tee Shop".to_string(),
            domain: "tees.example.com".to_string(),
            admin_domain: "tees.myshopify.com".to_string(),
            from: Some("studio@tees.example.com".to_string()),
        }
    }

    fn notice() -> DesignNotice {
        DesignNotice {
            design_gid: "gid://shopify/Metaobject/987".to_string(),
            handle: None,
            customer_email: "jo+tees@example.com".to_string(),
            message: Some("Please enlarge the logo".to_string()),
        }
    }

    #[test]
    fn test_display_id_prefers_handle() {
        let mut n = notice();
        assert_eq!(n.display_id(), "987");
        n.handle = Some("design-abc".to_string());
        assert_eq!(n.display_id(), "design-abc");
    }

    #[test]
    fn test_kind_for_status() {
        assert_eq!(NotificationKind::for_status(DesignStatus::Draft), None);
        assert_eq!(
            NotificationKind::for_status(DesignStatus::Rejected),
            Some(NotificationKind::DesignRejected)
        );
    }

    #[test]
    fn test_rejected_email_content() {
        let email = build_email(
            NotificationKind::DesignRejected,
            &shop(),
            &notice(),
            "jo+tees@example.com",
        )
        .unwrap();

        assert_eq!(email.subject, "Tee Shop - Design Requires Revision");
        assert!(email.text.contains("Please enlarge the logo"));
        assert!(
            email
                .html
                .contains("https://tees.example.com/apps/my-designs?email=jo%2Btees%40example.com")
        );
        assert_eq!(email.from.as_deref(), Some("studio@tees.example.com"));
    }

    #[test]
    fn test_admin_email_links_to_review_page() {
        let email = build_email(
            NotificationKind::NewDesignSubmission,
            &shop(),
            &notice(),
            "ops@tees.example.com",
        )
        .unwrap();

        assert_eq!(email.subject, "Tee Shop - New Design Submission");
        assert!(email.text.contains(
            "https://tees.myshopify.com/admin/apps/product-configurator/designs/987"
        ));
        assert!(email.text.contains("jo+tees@example.com"));
    }

    #[tokio::test]
    async fn test_log_only_delivery_succeeds() {
        let notifier = Notifier::log_only();
        let result = notifier
            .notify_customer(NotificationKind::DesignCompleted, &shop(), &notice())
            .await;
        assert!(result.is_ok());
    }
}
