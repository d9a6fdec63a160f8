//! Request payloads and their validation rules.
//!
//! Every write operation takes one of these payloads; `validate()` accumulates
//! all rule violations instead of stopping at the first, so a client sees the
//! whole picture in one round trip.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::FieldError;
use crate::models::{ApplicationStatus, CampaignStatus};

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum length for personal and business names.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum campaign title length.
pub const MIN_TITLE_LEN: usize = 5;

/// Minimum length for free-text fields (benefits, store info, mission, message).
pub const MIN_TEXT_LEN: usize = 10;

/// Default and maximum page sizes for list queries.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 100;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

// Mobile numbers: 01X followed by 3-4 and 4 digits, dashes optional.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^01[0-9]-?[0-9]{3,4}-?[0-9]{4}$").expect("phone pattern"));

// Business registration numbers: NNN-NN-NNNNN.
static BUSINESS_REG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-\d{2}-\d{5}$").expect("business registration pattern"));

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://\S+$").expect("url pattern"));

/// Length in characters, not bytes. Titles and messages are routinely
/// non-ASCII, so byte counts would over-count.
fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn require(errors: &mut Vec<FieldError>, ok: bool, field: &'static str, message: &str) {
    if !ok {
        errors.push(FieldError::new(field, message));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Fields shared by both signup paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupBase {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub terms_agreed: bool,
}

impl SignupBase {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            EMAIL_RE.is_match(&self.email),
            "email",
            "must be a valid email address",
        );
        require(
            &mut errors,
            char_len(&self.password) >= MIN_PASSWORD_LEN,
            "password",
            "must be at least 8 characters",
        );
        require(
            &mut errors,
            char_len(&self.name) >= MIN_NAME_LEN,
            "name",
            "must be at least 2 characters",
        );
        require(
            &mut errors,
            PHONE_RE.is_match(&self.phone),
            "phone",
            "must be a valid mobile number",
        );
        require(
            &mut errors,
            self.terms_agreed,
            "terms_agreed",
            "terms must be agreed to",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserOnboarding {
    pub business_name: String,
    pub location: String,
    pub category: String,
    pub business_registration_number: String,
}

impl AdvertiserOnboarding {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            char_len(&self.business_name) >= MIN_NAME_LEN,
            "business_name",
            "must be at least 2 characters",
        );
        require(
            &mut errors,
            char_len(&self.location) >= MIN_NAME_LEN,
            "location",
            "must be at least 2 characters",
        );
        require(
            &mut errors,
            !self.category.is_empty(),
            "category",
            "must be chosen",
        );
        require(
            &mut errors,
            BUSINESS_REG_RE.is_match(&self.business_registration_number),
            "business_registration_number",
            "must look like 123-45-67890",
        );
        finish(errors)
    }
}

/// Social channels are optional pairs; a URL, when given, must be http(s).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerOnboarding {
    pub birth_date: NaiveDate,
    #[serde(default)]
    pub blog_name: Option<String>,
    #[serde(default)]
    pub blog_url: Option<String>,
    #[serde(default)]
    pub video_name: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub photo_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub microblog_name: Option<String>,
    #[serde(default)]
    pub microblog_url: Option<String>,
}

impl InfluencerOnboarding {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        for (field, url) in [
            ("blog_url", &self.blog_url),
            ("video_url", &self.video_url),
            ("photo_url", &self.photo_url),
            ("microblog_url", &self.microblog_url),
        ] {
            if let Some(url) = url.as_deref() {
                require(
                    &mut errors,
                    url.is_empty() || URL_RE.is_match(url),
                    field,
                    "must be a valid URL",
                );
            }
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserSignup {
    #[serde(flatten)]
    pub base: SignupBase,
    pub advertiser_profile: AdvertiserOnboarding,
}

impl AdvertiserSignup {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Err(base) = self.base.validate() {
            errors.extend(base);
        }
        if let Err(profile) = self.advertiser_profile.validate() {
            errors.extend(profile);
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerSignup {
    #[serde(flatten)]
    pub base: SignupBase,
    pub influencer_profile: InfluencerOnboarding,
}

impl InfluencerSignup {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Err(base) = self.base.validate() {
            errors.extend(base);
        }
        if let Err(profile) = self.influencer_profile.validate() {
            errors.extend(profile);
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaign {
    pub title: String,
    pub recruitment_start_date: NaiveDate,
    pub recruitment_end_date: NaiveDate,
    pub recruitment_count: i64,
    pub benefits: String,
    pub store_info: String,
    pub mission: String,
}

impl CreateCampaign {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            char_len(&self.title) >= MIN_TITLE_LEN,
            "title",
            "must be at least 5 characters",
        );
        require(
            &mut errors,
            self.recruitment_end_date >= self.recruitment_start_date,
            "recruitment_end_date",
            "must not precede the start date",
        );
        require(
            &mut errors,
            self.recruitment_count >= 1,
            "recruitment_count",
            "must recruit at least 1 person",
        );
        require(
            &mut errors,
            char_len(&self.benefits) >= MIN_TEXT_LEN,
            "benefits",
            "must be at least 10 characters",
        );
        require(
            &mut errors,
            char_len(&self.store_info) >= MIN_TEXT_LEN,
            "store_info",
            "must be at least 10 characters",
        );
        require(
            &mut errors,
            char_len(&self.mission) >= MIN_TEXT_LEN,
            "mission",
            "must be at least 10 characters",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateApplication {
    pub campaign_id: Uuid,
    pub message: String,
    pub visit_date: NaiveDate,
}

impl CreateApplication {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            char_len(&self.message) >= MIN_TEXT_LEN,
            "message",
            "must be at least 10 characters",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectApplicants {
    pub application_ids: Vec<Uuid>,
}

impl SelectApplicants {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        require(
            &mut errors,
            !self.application_ids.is_empty(),
            "application_ids",
            "must select at least 1 applicant",
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignQuery {
    #[serde(default)]
    pub status: Option<CampaignStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationQuery {
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

fn validate_paging(page: i64, limit: i64) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    require(&mut errors, page >= 1, "page", "must be at least 1");
    require(
        &mut errors,
        (1..=MAX_PAGE_LIMIT).contains(&limit),
        "limit",
        "must be between 1 and 100",
    );
    finish(errors)
}

impl Default for CampaignQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl CampaignQuery {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        validate_paging(self.page, self.limit)
    }
}

impl Default for ApplicationQuery {
    fn default() -> Self {
        Self {
            status: None,
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl ApplicationQuery {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        validate_paging(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> SignupBase {
        SignupBase {
            email: "owner@example.com".into(),
            password: "s3cret-pw".into(),
            name: "Jin Park".into(),
            phone: "010-1234-5678".into(),
            terms_agreed: true,
        }
    }

    fn campaign() -> CreateCampaign {
        CreateCampaign {
            title: "Weekend brunch tasting".into(),
            recruitment_start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            recruitment_end_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            recruitment_count: 5,
            benefits: "Free brunch set for two".into(),
            store_info: "Open 10-22 near the station".into(),
            mission: "Post a review with 3+ photos".into(),
        }
    }

    fn field_names(errors: Vec<FieldError>) -> Vec<&'static str> {
        errors.into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn signup_base_accepts_valid_input() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn signup_base_collects_every_violation() {
        let bad = SignupBase {
            email: "not-an-email".into(),
            password: "short".into(),
            name: "J".into(),
            phone: "02-123-4567".into(),
            terms_agreed: false,
        };
        let fields = field_names(bad.validate().unwrap_err());
        assert_eq!(fields, vec!["email", "password", "name", "phone", "terms_agreed"]);
    }

    #[test]
    fn phone_accepts_dashless_form() {
        let mut ok = base();
        ok.phone = "01012345678".into();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn business_registration_number_format() {
        let profile = AdvertiserOnboarding {
            business_name: "Cafe Dawn".into(),
            location: "Mapo-gu, Seoul".into(),
            category: "cafe".into(),
            business_registration_number: "123-45-67890".into(),
        };
        assert!(profile.validate().is_ok());

        let mut bad = profile.clone();
        bad.business_registration_number = "1234567890".into();
        assert_eq!(
            field_names(bad.validate().unwrap_err()),
            vec!["business_registration_number"]
        );
    }

    fn influencer() -> InfluencerOnboarding {
        InfluencerOnboarding {
            birth_date: NaiveDate::from_ymd_opt(1995, 6, 15).unwrap(),
            blog_name: None,
            blog_url: None,
            video_name: None,
            video_url: None,
            photo_name: None,
            photo_url: None,
            microblog_name: None,
            microblog_url: None,
        }
    }

    #[test]
    fn influencer_channels_are_optional_but_urls_must_parse() {
        let mut profile = influencer();
        assert!(profile.validate().is_ok());

        profile.blog_url = Some("https://blog.example.com/me".into());
        assert!(profile.validate().is_ok());

        // Empty string counts as "not provided", matching the original forms.
        profile.video_url = Some(String::new());
        assert!(profile.validate().is_ok());

        profile.photo_url = Some("not a url".into());
        assert_eq!(field_names(profile.validate().unwrap_err()), vec!["photo_url"]);
    }

    #[test]
    fn campaign_benefits_boundary_is_ten_characters() {
        let mut nine = campaign();
        nine.benefits = "123456789".into();
        assert_eq!(field_names(nine.validate().unwrap_err()), vec!["benefits"]);

        let mut ten = campaign();
        ten.benefits = "1234567890".into();
        assert!(ten.validate().is_ok());
    }

    #[test]
    fn campaign_title_and_count_bounds() {
        let mut bad = campaign();
        bad.title = "Four".into();
        bad.recruitment_count = 0;
        assert_eq!(
            field_names(bad.validate().unwrap_err()),
            vec!["title", "recruitment_count"]
        );
    }

    #[test]
    fn campaign_window_must_not_be_inverted() {
        let mut bad = campaign();
        bad.recruitment_end_date = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert_eq!(
            field_names(bad.validate().unwrap_err()),
            vec!["recruitment_end_date"]
        );

        // A single-day window is fine.
        let mut single = campaign();
        single.recruitment_end_date = single.recruitment_start_date;
        assert!(single.validate().is_ok());
    }

    #[test]
    fn text_lengths_count_characters_not_bytes() {
        let mut campaign = campaign();
        // 10 Hangul characters are 30 bytes but must pass.
        campaign.mission = "방문하고 리뷰를 남겨요".chars().filter(|c| *c != ' ').collect();
        assert_eq!(campaign.mission.chars().count(), 10);
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn application_message_boundary() {
        let mut req = CreateApplication {
            campaign_id: Uuid::new_v4(),
            message: "1234567890".into(),
            visit_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        };
        assert!(req.validate().is_ok());

        req.message = "too short".into();
        assert_eq!(field_names(req.validate().unwrap_err()), vec!["message"]);
    }

    #[test]
    fn selection_requires_at_least_one_id() {
        let empty = SelectApplicants {
            application_ids: vec![],
        };
        assert_eq!(
            field_names(empty.validate().unwrap_err()),
            vec!["application_ids"]
        );
    }

    #[test]
    fn query_defaults_and_caps() {
        let query = CampaignQuery::default();
        assert_eq!((query.page, query.limit), (1, 20));
        assert!(query.validate().is_ok());

        let over = CampaignQuery {
            status: None,
            page: 1,
            limit: 101,
        };
        assert_eq!(field_names(over.validate().unwrap_err()), vec!["limit"]);

        let zero_page = ApplicationQuery {
            status: None,
            page: 0,
            limit: 20,
        };
        assert_eq!(field_names(zero_page.validate().unwrap_err()), vec!["page"]);
    }
}
