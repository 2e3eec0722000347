//! Extraction schema for doctor profile pages
//!
//! A declarative map from semantic field labels to the CSS class tokens the
//! profile site renders them with. The schema is fixed at build time; the
//! extractor compiles it into selectors once at startup.

/// One labelled field and the class token that holds its text
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
  pub label: &'static str,
  pub class: &'static str,
}

/// A repeatable section: every element carrying `wrapper` is one entry
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec {
  pub wrapper: &'static str,
  pub fields: &'static [FieldSpec],
}

/// FAQ blocks, both inline and behind the "load more" button
#[derive(Debug, Clone, Copy)]
pub struct FaqSpec {
  pub wrapper: &'static str,
  pub question: &'static str,
  pub answer: &'static str,
  /// Class of the `<button>` that loads the remaining FAQs
  pub load_more: &'static str,
  /// Attribute on the button carrying the FAQ owner's username
  pub owner_attribute: &'static str,
}

/// Blog cards; the URL comes from the first `<a href>` inside the card
#[derive(Debug, Clone, Copy)]
pub struct BlogSpec {
  pub wrapper: &'static str,
  pub title: &'static str,
  pub date: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct ExtractionSchema {
  pub doctor_info: &'static [FieldSpec],
  pub testimonials: SectionSpec,
  pub expertise: SectionSpec,
  pub faq: FaqSpec,
  pub blogs: BlogSpec,
  pub clinics: SectionSpec,
}

const fn field(label: &'static str, class: &'static str) -> FieldSpec {
  FieldSpec { label, class }
}

/// Schema of the doctor profile page
pub const DOCTOR_PROFILE: ExtractionSchema = ExtractionSchema {
  doctor_info: &[
    field("Doctor Name", "doctor-name"),
    field("Speciality", "speciality"),
    field("Certification", "certification"),
    field("Phone Number", "callto"),
    field("Email Address", "mailto"),
    field("Experience", "experience"),
    field("Patients", "patients"),
    field("Doctor Overview", "doctor-overview"),
    field("Doctor Speciality", "doctor-speciality"),
    field("Doctor Expertise Summary", "doctor-expertise"),
    field("Doctor Awards", "doctor-awards"),
    field("Doctor Qualification summary", "doctor-qualification"),
  ],
  testimonials: SectionSpec {
    wrapper: "test-wrapp",
    fields: &[
      field("title", "testimonial-title"),
      field("content", "testimonial-content"),
      field("patient name", "testimonial-patientname"),
    ],
  },
  expertise: SectionSpec {
    wrapper: "expcontent",
    fields: &[field("Expertise Title", "expertise-title"), field("Expertise Content", "exp-cont")],
  },
  faq: FaqSpec {
    wrapper: "faq",
    question: "faq-question",
    answer: "faq-answer",
    load_more: "faq-load",
    owner_attribute: "data-username",
  },
  blogs: BlogSpec { wrapper: "articele-wrapper", title: "blog-title", date: "blog-date" },
  clinics: SectionSpec {
    wrapper: "forscrapper",
    fields: &[
      field("Clinic Address", "clinic-address"),
      field("Clinic Name", "clinic-name"),
      field("Clinic Map Link", "clinic-maplink"),
    ],
  },
};
