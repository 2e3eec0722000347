//! System prompt for new conversations

use profile_scraper::DoctorId;

/// Builds the system message that grounds a conversation in one doctor's document
#[derive(Debug, Clone)]
pub struct PromptBuilder {
  booking_base_url: String,
}

impl PromptBuilder {
  pub fn new(booking_base_url: impl Into<String>) -> Self {
    Self { booking_base_url: booking_base_url.into().trim_end_matches('/').to_string() }
  }

  pub fn booking_link(&self, doctor: &DoctorId) -> String {
    format!("{}/{doctor}#appointment", self.booking_base_url)
  }

  pub fn system_prompt(&self, doctor: &DoctorId, document: &str) -> String {
    let booking_link = self.booking_link(doctor);
    format!(
      "Review the doctor's data below and answer questions STRICTLY based on their documented information:

{document}

When responding:
1. Check if the query matches:
   - Doctor's listed specialties
   - Expertise areas
   - Conditions treated
   - Patient testimonials

2. If MATCH found:
   - Reference specific expertise section
   - Mention relevant experience/cases
   - Provide contact information
   - Include booking details

3. If NO MATCH:
   - Only say you cannot confirm based on available data
   - Do not redirect or suggest alternatives

Format:
- For matching conditions: Quote relevant sections + provide contact details
- For unknown/unclear: State cannot confirm from available data
- Always provide booking link: {booking_link}

Restrictions:
- No medical advice
- No assumptions about treatable conditions
- Only use documented information
- Do not use phrases like \"based on data\" or \"available information\"
"
    )
  }
}
