//! Application workflow: influencers apply to recruiting campaigns, the
//! owning advertiser reviews applicants and selects winners.

use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::db::{self, Database};
use crate::error::PlatformError;
use crate::models::{
    Application, ApplicationWithApplicant, ApplicationWithCampaign, CampaignStatus, Page,
};
use crate::schema::{ApplicationQuery, CreateApplication, SelectApplicants};

#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    /// Application rows actually marked selected, not ids submitted.
    pub selected_count: usize,
}

pub struct ApplicationService<'a> {
    db: &'a Database,
}

impl<'a> ApplicationService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Applications start out `pending`. The target campaign must still be
    /// recruiting, and an influencer can apply to a campaign only once.
    #[tracing::instrument(skip(self, req), fields(campaign_id = %req.campaign_id))]
    pub fn create(
        &self,
        influencer_id: Uuid,
        req: &CreateApplication,
    ) -> Result<Application, PlatformError> {
        req.validate().map_err(PlatformError::Validation)?;

        let influencer = self.db.get_influencer_profile(influencer_id).map_err(|e| {
            error!(%influencer_id, error = %e, "failed to look up influencer profile");
            PlatformError::FetchFailed
        })?;
        if influencer.is_none() {
            return Err(PlatformError::Unauthorized);
        }

        let campaign = self
            .db
            .get_campaign(req.campaign_id)
            .map_err(|e| {
                error!(campaign_id = %req.campaign_id, error = %e, "failed to fetch campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::CampaignNotFound)?;
        if campaign.status != CampaignStatus::Recruiting {
            return Err(PlatformError::CampaignNotRecruiting);
        }

        let id = Uuid::new_v4();
        if let Err(e) = self.db.insert_application(id, influencer_id, req) {
            if db::is_unique_violation(&e) {
                return Err(PlatformError::DuplicateApplication);
            }
            error!(%influencer_id, error = %e, "failed to create application");
            return Err(PlatformError::ApplicationFailed);
        }

        self.db
            .get_application(id)
            .map_err(|e| {
                error!(application_id = %id, error = %e, "failed to read back created application");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::Internal)
    }

    #[tracing::instrument(skip(self, query))]
    pub fn list_mine(
        &self,
        influencer_id: Uuid,
        query: &ApplicationQuery,
    ) -> Result<Page<ApplicationWithCampaign>, PlatformError> {
        query.validate().map_err(PlatformError::Validation)?;

        let total = self
            .db
            .count_my_applications(influencer_id, query.status)
            .map_err(|e| {
                error!(%influencer_id, error = %e, "failed to count applications");
                PlatformError::FetchFailed
            })?;
        let offset = (query.page - 1) * query.limit;
        let items = self
            .db
            .list_my_applications(influencer_id, query.status, query.limit, offset)
            .map_err(|e| {
                error!(%influencer_id, error = %e, "failed to list applications");
                PlatformError::FetchFailed
            })?;
        Ok(Page::new(items, total, query.page, query.limit))
    }

    /// The full applicant roster, with contact details, for the campaign
    /// owner only. Not paginated.
    #[tracing::instrument(skip(self))]
    pub fn list_for_campaign(
        &self,
        campaign_id: Uuid,
        advertiser_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>, PlatformError> {
        self.check_ownership(campaign_id, advertiser_id)?;

        self.db.list_campaign_applications(campaign_id).map_err(|e| {
            error!(%campaign_id, error = %e, "failed to list campaign applications");
            PlatformError::FetchFailed
        })
    }

    /// Marks the given applications selected and flips the campaign to
    /// `selected`, atomically. Requires recruitment to be closed first.
    /// Re-running with the same ids is a harmless no-op.
    #[tracing::instrument(skip(self, req), fields(submitted = req.application_ids.len()))]
    pub fn select(
        &self,
        campaign_id: Uuid,
        advertiser_id: Uuid,
        req: &SelectApplicants,
    ) -> Result<SelectionOutcome, PlatformError> {
        req.validate().map_err(PlatformError::Validation)?;

        let campaign = self.check_ownership(campaign_id, advertiser_id)?;
        if !campaign.status.can_transition(CampaignStatus::Selected) {
            return Err(PlatformError::InvalidStatusTransition {
                from: campaign.status.as_str(),
                to: CampaignStatus::Selected.as_str(),
            });
        }

        let selected_count = self
            .db
            .select_applications(campaign_id, &req.application_ids)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to select applicants");
                PlatformError::UpdateFailed
            })?;

        Ok(SelectionOutcome { selected_count })
    }

    /// Owner-only operations answer `Unauthorized` for a missing campaign
    /// too, so they leak nothing about which ids exist.
    fn check_ownership(
        &self,
        campaign_id: Uuid,
        advertiser_id: Uuid,
    ) -> Result<crate::models::Campaign, PlatformError> {
        let campaign = self
            .db
            .get_campaign(campaign_id)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to fetch campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::Unauthorized)?;
        if campaign.advertiser_id != advertiser_id {
            return Err(PlatformError::Unauthorized);
        }
        Ok(campaign)
    }
}
