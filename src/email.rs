//! Pure email composition: no transport, no side effects.
//!
//! Renders the two per-inquiry emails (admin notification with an HTML table
//! of the data bag, customer confirmation with static next-steps text) as
//! HTML plus a plain-text alternative.

use crate::models::DataBag;

/// A rendered email, ready for a transport. Produced fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Turn a camelCase form key into a display label: insert a space before
/// every uppercase letter, then uppercase the first character.
///
/// `businessName` -> `Business Name`, `email` -> `Email`.
pub fn humanize(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

/// Minimal HTML escaping for user-supplied values embedded in the templates.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Data-bag entries shown to humans: `_`-prefixed keys are internal and
/// empty/falsy values carry no information, so both are dropped.
fn visible_entries(data: &DataBag) -> impl Iterator<Item = (String, String)> + '_ {
    data.iter()
        .filter(|(key, value)| !key.starts_with('_') && !value.is_empty())
        .map(|(key, value)| (humanize(key), value.display()))
}

/// Admin notification: subject embeds the service name, body tabulates the
/// inquiry data. Deterministic for a given `(service_name, data)`.
pub fn compose_admin_email(service_name: &str, data: &DataBag) -> ComposedEmail {
    let subject = format!("New Service Inquiry: {}", service_name);

    let table_rows: String = visible_entries(data)
        .map(|(label, value)| {
            format!(
                r#"<tr>
          <td style="padding: 8px; border-bottom: 1px solid #e5e7eb; font-weight: 500; color: #374151;">{}</td>
          <td style="padding: 8px; border-bottom: 1px solid #e5e7eb; color: #1f2937;">{}</td>
        </tr>"#,
                escape_html(&label),
                escape_html(&value)
            )
        })
        .collect();

    let email = data
        .get("email")
        .map(|v| v.display())
        .unwrap_or_default();
    let phone_line = data
        .get("phone")
        .filter(|v| !v.is_empty())
        .map(|v| format!("<p><strong>Phone:</strong> {}</p>", escape_html(&v.display())))
        .unwrap_or_default();
    let business_line = data
        .get("businessName")
        .filter(|v| !v.is_empty())
        .map(|v| {
            format!(
                "<p><strong>Business Name:</strong> {}</p>",
                escape_html(&v.display())
            )
        })
        .unwrap_or_default();

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f9fafb; }}
    .header {{ background-color: #0f172a; color: #fff; padding: 20px; border-radius: 8px 8px 0 0; }}
    .header h1 {{ margin: 0; font-size: 24px; }}
    .content {{ background-color: #fff; padding: 20px; border: 1px solid #e5e7eb; }}
    .section-title {{ font-size: 18px; font-weight: bold; color: #1f2937; margin: 20px 0 10px 0; border-bottom: 2px solid #06b6d4; padding-bottom: 10px; }}
    .inquiry-table {{ width: 100%; border-collapse: collapse; }}
    .footer {{ background-color: #f3f4f6; padding: 15px; text-align: center; font-size: 12px; color: #6b7280; border-top: 1px solid #e5e7eb; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>New Service Inquiry</h1>
      <p>Service: <strong>{service}</strong></p>
    </div>

    <div class="content">
      <div class="section-title">Inquiry Details</div>
      <table class="inquiry-table">
        {rows}
      </table>

      <div class="section-title">Customer Contact Information</div>
      <p><strong>Email:</strong> {email}</p>
      {phone}
      {business}

      <div style="background-color: #f0f9ff; border-left: 4px solid #06b6d4; padding: 15px; margin-top: 20px; border-radius: 4px;">
        <p style="margin: 0; color: #0c4a6e;">
          <strong>Note:</strong> This inquiry was submitted through your website's service request form.
          Please review and respond to the customer within 24-48 hours.
        </p>
      </div>
    </div>

    <div class="footer">
      <p>This is an automated email from your service inquiry system.</p>
    </div>
  </div>
</body>
</html>"#,
        service = escape_html(service_name),
        rows = table_rows,
        email = escape_html(&email),
        phone = phone_line,
        business = business_line,
    );

    let mut text = format!("New Service Inquiry: {}\n\n", service_name);
    for (label, value) in visible_entries(data) {
        text.push_str(&format!("{}: {}\n", label, value));
    }
    text.push_str("\nPlease review and respond to the customer within 24-48 hours.\n");

    ComposedEmail {
        subject,
        html,
        text,
    }
}

/// Customer confirmation: static thank-you template naming the service.
pub fn compose_customer_email(service_name: &str) -> ComposedEmail {
    let subject = format!("Inquiry Confirmation: {}", service_name);

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; background-color: #f9fafb; }}
    .header {{ background-color: #0f172a; color: #fff; padding: 20px; border-radius: 8px 8px 0 0; text-align: center; }}
    .header h1 {{ margin: 0; font-size: 24px; }}
    .content {{ background-color: #fff; padding: 20px; border: 1px solid #e5e7eb; }}
    .footer {{ background-color: #f3f4f6; padding: 15px; text-align: center; font-size: 12px; color: #6b7280; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Thank You for Your Inquiry</h1>
    </div>

    <div class="content">
      <p>Hello,</p>
      <p>We have received your service inquiry for <strong>{service}</strong>.</p>
      <p>Our team will review your request and get back to you within 24-48 hours with a detailed proposal and timeline.</p>

      <div style="background-color: #f0f9ff; border-left: 4px solid #06b6d4; padding: 15px; margin: 20px 0; border-radius: 4px;">
        <p style="margin: 0; color: #0c4a6e;">
          <strong>What happens next:</strong>
          <br>1. We'll review your inquiry
          <br>2. Send you a detailed proposal
          <br>3. Schedule a consultation call
          <br>4. Begin development process
        </p>
      </div>
    </div>

    <div class="footer">
      <p>This is an automated confirmation from our service inquiry system.</p>
    </div>
  </div>
</body>
</html>"#,
        service = escape_html(service_name),
    );

    let text = format!(
        "Thank you for your inquiry\n\n\
         We have received your service inquiry for {}.\n\
         Our team will review your request and get back to you within 24-48 hours \
         with a detailed proposal and timeline.\n\n\
         What happens next:\n\
         1. We'll review your inquiry\n\
         2. Send you a detailed proposal\n\
         3. Schedule a consultation call\n\
         4. Begin development process\n",
        service_name
    );

    ComposedEmail {
        subject,
        html,
        text,
    }
}
