//! The two emails sent after a registration.

use super::{ContentKind, OutgoingEmail};
use crate::entities::registration::Registration;
use crate::service::SEAT_CAPACITY;
use crate::validation::EmailAddress;
use time::macros::format_description;
use webinar_sdk::objects::referral_label;

pub const CONFIRMATION_SUBJECT: &str = "🎉 Welcome to the TransformBuddy.AI Free Webinar!";

/// Notification to the organisers with every field of the registration.
pub fn admin_notification(admin: &EmailAddress, registration: &Registration) -> OutgoingEmail {
    let registered_at = registration
        .created_at
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| registration.created_at.to_string());

    let body = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
    <div style="background: #1a1a1b; padding: 30px; text-align: center;">
      <h1 style="color: #DAFF01; margin: 0;">New Webinar Registration!</h1>
    </div>
    <div style="background: #f8f9fa; padding: 20px;">
      <p><strong>Name:</strong> {name}</p>
      <p><strong>Email:</strong> {email}</p>
      <p><strong>WhatsApp:</strong> {whatsapp}</p>
      <p><strong>Source:</strong> {source}</p>
      <p><strong>Registration Time:</strong> {registered_at}</p>
    </div>
    <p style="color: #666; font-size: 14px; text-align: center;">
      <em>Sent by the webinar registration system.</em>
    </p>
  </body>
</html>"#,
        name = escape_html(&registration.full_name),
        email = escape_html(&registration.email),
        whatsapp = escape_html(&registration.whatsapp),
        source = escape_html(referral_label(registration.referral_source.as_deref())),
    );

    OutgoingEmail {
        to: admin.to_string(),
        subject: format!("New Webinar Registration - {}", registration.full_name),
        body,
        kind: ContentKind::Html,
    }
}

/// Welcome email to the registrant. Personalized with the name only.
pub fn user_confirmation(registration: &Registration) -> OutgoingEmail {
    let body = format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; color: #333; max-width: 600px; margin: 0 auto;">
    <div style="background: #1a1a1b; padding: 40px 30px; text-align: center;">
      <h1 style="color: #DAFF01; margin: 0 0 10px 0;">You're In!</h1>
      <p style="color: #fff; font-size: 18px; margin: 0;">Welcome to the AI Transformation Revolution</p>
    </div>
    <div style="background: white; padding: 40px 30px;">
      <p style="font-size: 18px;">Hi {name}!</p>
      <p>You've successfully registered for our <strong>FREE webinar</strong> on transforming your body and mind with AI.</p>
      <h3>What's Next?</h3>
      <ul>
        <li><strong>Calendar invite</strong> will be sent separately</li>
        <li><strong>Webinar link</strong> will arrive 24 hours before the event</li>
        <li><strong>WhatsApp reminders</strong> so you don't miss it</li>
      </ul>
      <p style="color: #cc0000; font-weight: bold;">Limited to {capacity} participants - you've secured your spot!</p>
      <p style="color: #666; font-size: 14px;">Questions? Just reply to this email.</p>
    </div>
  </body>
</html>"#,
        name = escape_html(&registration.full_name),
        capacity = SEAT_CAPACITY,
    );

    OutgoingEmail {
        to: registration.email.clone(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        body,
        kind: ContentKind::Html,
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
