use serde::Deserialize;

/// Company and contact details gathered for an outreach email
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Prospect {
    pub company_name: Option<String>,
    pub company_overview: Option<String>,
    pub website_url: Option<String>,
    pub location: Option<String>,
    pub revenue: Option<String>,
    pub discovered_emails: Vec<String>,
    pub subjective_info: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

/// Who the outreach email is from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sender {
    pub your_name: Option<String>,
    pub your_company: Option<String>,
    pub your_phone: Option<String>,
    pub your_email: Option<String>,
}

/// Empty strings count as missing.
fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => fallback,
    }
}

/// Build outreach instructions for [`TextFormatter`](super::TextFormatter).
pub fn build_prospect_prompt(prospect: &Prospect, sender: &Sender) -> String {
    let emails = prospect
        .discovered_emails
        .iter()
        .filter(|email| !email.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let lines = [
        "You are an expert cold outreach copywriter for premium spirits.".to_string(),
        "Write a concise, friendly, personalized email introducing our Apple Pie Vodka and proposing a short call.".to_string(),
        "Tone: professional, warm, confident; 100-140 words; avoid fluff; one clear CTA.".to_string(),
        "Use the structured context below. If data is missing, be generic but not awkward.".to_string(),
        String::new(),
        "Company Context:".to_string(),
        format!("- Company Name: {}", or(&prospect.company_name, "Unknown")),
        format!("- Overview: {}", or(&prospect.company_overview, "n/a")),
        format!("- Website: {}", or(&prospect.website_url, "n/a")),
        format!("- Location: {}", or(&prospect.location, "n/a")),
        format!("- Revenue: {}", or(&prospect.revenue, "n/a")),
        format!("- Discovered Emails: {}", if emails.is_empty() { "n/a" } else { emails.as_str() }),
        format!("- Subjective Notes: {}", or(&prospect.subjective_info, "n/a")),
        String::new(),
        "Contact Context:".to_string(),
        format!("- Contact Name: {}", or(&prospect.contact_name, "there")),
        format!("- Contact Email: {}", or(&prospect.contact_email, "n/a")),
        String::new(),
        "Your Details:".to_string(),
        format!("- Sender Name: {}", or(&sender.your_name, "Your Name")),
        format!("- Sender Company: {}", or(&sender.your_company, "Your Company")),
        format!("- Sender Phone: {}", or(&sender.your_phone, "")),
        format!("- Sender Email: {}", or(&sender.your_email, "")),
        String::new(),
        "Output:".to_string(),
        "- Subject line (catchy, 4-7 words)".to_string(),
        "- Email body, single paragraph with short line breaks where natural".to_string(),
        "- Sign-off with sender name and phone".to_string(),
    ];

    lines.join("\n")
}
