//! Found-pet notification email.
//!
//! Every interpolated value is HTML-escaped before it reaches the template.

use crate::domain::{EmailAddress, GeoLocation};

/// Subject used when the caller does not provide one.
pub fn default_subject(pet_name: &str) -> String {
    format!("Your pet {pet_name} has been found")
}

/// Email handed to the email port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Recipient.
    pub to: EmailAddress,
    /// Subject line.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
}

/// Data needed to tell an owner their pet was found.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPetNotification {
    /// Owner email.
    pub to: EmailAddress,
    /// Explicit subject; the default is derived from the pet name.
    pub subject: Option<String>,
    /// Pet name.
    pub pet_name: String,
    /// How to reach the finder.
    pub finder_contact: String,
    /// Finder message.
    pub message: Option<String>,
    /// Where the pet was seen.
    pub location: Option<GeoLocation>,
}

impl FoundPetNotification {
    /// Render into an email ready to send.
    ///
    /// # Examples
    /// ```
    /// use tagpet::domain::{EmailAddress, FoundPetNotification};
    ///
    /// let email = FoundPetNotification {
    ///     to: EmailAddress::new("owner@example.com").expect("email"),
    ///     subject: None,
    ///     pet_name: "Luna <3".into(),
    ///     finder_contact: "600 111 222".into(),
    ///     message: None,
    ///     location: None,
    /// }
    /// .render();
    /// assert_eq!(email.subject, "Your pet Luna <3 has been found");
    /// assert!(email.html.contains("Luna &lt;3"));
    /// ```
    pub fn render(&self) -> OutboundEmail {
        let subject = self
            .subject
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| default_subject(&self.pet_name), str::to_owned);
        OutboundEmail {
            to: self.to.clone(),
            subject,
            html: self.render_html(),
        }
    }

    fn render_html(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str(HEAD);
        html.push_str(&format!(
            "<p>Hello,</p>\n<p>Good news! Your pet <strong>{}</strong> has been found.</p>\n",
            escape(&self.pet_name)
        ));
        html.push_str("<div class=\"location\">\n<h3>📍 Location</h3>\n");
        match &self.location {
            Some(location) => {
                if let Some(address) = &location.address {
                    html.push_str(&format!(
                        "<p><strong>Address:</strong> {}</p>\n",
                        escape(address)
                    ));
                }
                let coordinates = location.coordinates;
                html.push_str(&format!(
                    "<p><strong>Coordinates:</strong> {}</p>\n",
                    escape(&coordinates.to_string())
                ));
                html.push_str(&format!(
                    "<p><a href=\"{}\" target=\"_blank\">View on Google Maps</a></p>\n",
                    escape(&coordinates.map_link())
                ));
            }
            None => html.push_str("<p>Location not available</p>\n"),
        }
        html.push_str("</div>\n<div class=\"info-box\">\n<h3>Contact information</h3>\n");
        html.push_str(&format!(
            "<p><strong>Finder contact:</strong><br>{}</p>\n",
            escape(&self.finder_contact)
        ));
        if let Some(message) = &self.message {
            html.push_str(&format!(
                "<p><strong>Message:</strong><br>{}</p>\n",
                escape(message)
            ));
        }
        html.push_str(FOOT);
        html
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<style>
body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
.container { max-width: 600px; margin: 0 auto; padding: 20px; }
.header { background-color: #4F46E5; color: white; padding: 20px; text-align: center; border-radius: 8px 8px 0 0; }
.content { background-color: #f9fafb; padding: 30px; border-radius: 0 0 8px 8px; }
.info-box { background-color: white; padding: 15px; margin: 15px 0; border-radius: 6px; border-left: 4px solid #4F46E5; }
.location { background-color: #ECFDF5; padding: 15px; margin: 15px 0; border-radius: 6px; border-left: 4px solid #10B981; }
.footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #e5e7eb; font-size: 12px; color: #6b7280; text-align: center; }
</style>
</head>
<body>
<div class="container">
<div class="header"><h1>🐾 Your pet has been found</h1></div>
<div class="content">
"#;

const FOOT: &str = r#"</div>
<p>Please contact the person who found your pet as soon as possible.</p>
<div class="footer">
<p>This email was sent automatically when someone scanned your pet's QR tag.</p>
<p>Tag Pet - Pet identification</p>
</div>
</div>
</div>
</body>
</html>
"#;
