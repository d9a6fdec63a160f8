use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The two sides of the marketplace. Chosen once at signup, immutable after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Advertiser,
    Influencer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Advertiser => "advertiser",
            Role::Influencer => "influencer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advertiser" => Ok(Role::Advertiser),
            "influencer" => Ok(Role::Influencer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Campaign lifecycle. Transitions go strictly forward:
/// recruiting -> closed -> selected -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Recruiting,
    Closed,
    Selected,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Recruiting => "recruiting",
            CampaignStatus::Closed => "closed",
            CampaignStatus::Selected => "selected",
            CampaignStatus::Completed => "completed",
        }
    }

    pub fn allowed_transitions(self) -> &'static [CampaignStatus] {
        use CampaignStatus::*;
        match self {
            Recruiting => &[Closed],
            Closed => &[Selected],
            Selected => &[Completed],
            Completed => &[],
        }
    }

    /// Identity transitions are allowed so repeated writes stay idempotent.
    pub fn can_transition(self, to: CampaignStatus) -> bool {
        self == to || self.allowed_transitions().contains(&to)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recruiting" => Ok(CampaignStatus::Recruiting),
            "closed" => Ok(CampaignStatus::Closed),
            "selected" => Ok(CampaignStatus::Selected),
            "completed" => Ok(CampaignStatus::Completed),
            other => Err(format!("unknown campaign status: {other}")),
        }
    }
}

/// Application lifecycle: pending -> selected | rejected, both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Selected,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Selected => "selected",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    pub fn allowed_transitions(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Pending => &[Selected, Rejected],
            Selected => &[],
            Rejected => &[],
        }
    }

    pub fn can_transition(self, to: ApplicationStatus) -> bool {
        self == to || self.allowed_transitions().contains(&to)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "selected" => Ok(ApplicationStatus::Selected),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: Role,
    pub terms_agreed: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertiserProfile {
    pub user_id: Uuid,
    pub business_name: String,
    pub location: String,
    pub category: String,
    pub business_registration_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfluencerProfile {
    pub user_id: Uuid,
    pub birth_date: NaiveDate,
    pub blog_name: Option<String>,
    pub blog_url: Option<String>,
    pub video_name: Option<String>,
    pub video_url: Option<String>,
    pub photo_name: Option<String>,
    pub photo_url: Option<String>,
    pub microblog_name: Option<String>,
    pub microblog_url: Option<String>,
}

/// A user profile together with whichever role profile is attached.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileDetail {
    pub user: UserProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advertiser_profile: Option<AdvertiserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer_profile: Option<InfluencerProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub advertiser_id: Uuid,
    pub title: String,
    pub recruitment_start_date: NaiveDate,
    pub recruitment_end_date: NaiveDate,
    pub recruitment_count: i64,
    pub benefits: String,
    pub store_info: String,
    pub mission: String,
    pub status: CampaignStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// Public display info of the advertiser behind a campaign.
#[derive(Debug, Clone, Serialize)]
pub struct AdvertiserCard {
    pub name: String,
    pub business_name: String,
    pub location: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignWithAdvertiser {
    pub campaign: Campaign,
    pub advertiser: AdvertiserCard,
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignDetail {
    pub campaign: Campaign,
    pub advertiser: AdvertiserCard,
    /// Counted on read, never stored.
    pub application_count: i64,
    /// The caller's own application, when the caller has applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_application: Option<Application>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub influencer_id: Uuid,
    pub message: String,
    pub visit_date: NaiveDate,
    pub status: ApplicationStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithCampaign {
    pub application: Application,
    pub campaign: Campaign,
}

/// Applicant contact info shown to the campaign owner.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub influencer_profile: Option<InfluencerProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationWithApplicant {
    pub application: Application,
    pub applicant: ApplicantProfile,
}

/// Uniform pagination envelope for list results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}
