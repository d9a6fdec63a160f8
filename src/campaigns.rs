//! Campaign lifecycle: creation, browsing, and status transitions.

use tracing::error;
use uuid::Uuid;

use crate::db::Database;
use crate::error::PlatformError;
use crate::models::{
    Campaign, CampaignDetail, CampaignStatus, CampaignWithAdvertiser, Page,
};
use crate::schema::{CampaignQuery, CreateCampaign};

pub struct CampaignService<'a> {
    db: &'a Database,
}

impl<'a> CampaignService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// New campaigns always start out `recruiting`. Only users holding an
    /// advertiser profile may create one.
    #[tracing::instrument(skip(self, req))]
    pub fn create(
        &self,
        advertiser_id: Uuid,
        req: &CreateCampaign,
    ) -> Result<Campaign, PlatformError> {
        req.validate().map_err(PlatformError::Validation)?;

        let advertiser = self.db.get_advertiser_profile(advertiser_id).map_err(|e| {
            error!(%advertiser_id, error = %e, "failed to look up advertiser profile");
            PlatformError::FetchFailed
        })?;
        if advertiser.is_none() {
            return Err(PlatformError::Unauthorized);
        }

        let id = Uuid::new_v4();
        self.db.insert_campaign(id, advertiser_id, req).map_err(|e| {
            error!(%advertiser_id, error = %e, "failed to create campaign");
            PlatformError::CreateFailed
        })?;

        self.db
            .get_campaign(id)
            .map_err(|e| {
                error!(campaign_id = %id, error = %e, "failed to read back created campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::Internal)
    }

    #[tracing::instrument(skip(self, query))]
    pub fn list(
        &self,
        query: &CampaignQuery,
    ) -> Result<Page<CampaignWithAdvertiser>, PlatformError> {
        query.validate().map_err(PlatformError::Validation)?;

        let total = self.db.count_campaigns(query.status).map_err(|e| {
            error!(error = %e, "failed to count campaigns");
            PlatformError::FetchFailed
        })?;
        let offset = (query.page - 1) * query.limit;
        let items = self
            .db
            .list_campaigns(query.status, query.limit, offset)
            .map_err(|e| {
                error!(error = %e, "failed to list campaigns");
                PlatformError::FetchFailed
            })?;
        Ok(Page::new(items, total, query.page, query.limit))
    }

    /// Detail view: campaign, advertiser card, live application count, and the
    /// caller's own application when they have one.
    #[tracing::instrument(skip(self))]
    pub fn get(
        &self,
        campaign_id: Uuid,
        caller_id: Option<Uuid>,
    ) -> Result<CampaignDetail, PlatformError> {
        let with_advertiser = self
            .db
            .get_campaign_with_advertiser(campaign_id)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to fetch campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::CampaignNotFound)?;

        let application_count = self.db.count_applications(campaign_id).map_err(|e| {
            error!(%campaign_id, error = %e, "failed to count applications");
            PlatformError::FetchFailed
        })?;

        let user_application = match caller_id {
            Some(caller_id) => {
                self.db
                    .find_application(campaign_id, caller_id)
                    .map_err(|e| {
                        error!(%campaign_id, %caller_id, error = %e, "failed to fetch caller application");
                        PlatformError::FetchFailed
                    })?
            }
            None => None,
        };

        Ok(CampaignDetail {
            campaign: with_advertiser.campaign,
            advertiser: with_advertiser.advertiser,
            application_count,
            user_application,
        })
    }

    /// Ownership and the transition table are both enforced here; the
    /// ownership filter is additionally part of the update predicate.
    #[tracing::instrument(skip(self))]
    pub fn update_status(
        &self,
        campaign_id: Uuid,
        advertiser_id: Uuid,
        new_status: CampaignStatus,
    ) -> Result<Campaign, PlatformError> {
        let campaign = self
            .db
            .get_campaign(campaign_id)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to fetch campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::CampaignNotFound)?;

        if campaign.advertiser_id != advertiser_id {
            return Err(PlatformError::Unauthorized);
        }
        if !campaign.status.can_transition(new_status) {
            return Err(PlatformError::InvalidStatusTransition {
                from: campaign.status.as_str(),
                to: new_status.as_str(),
            });
        }

        let matched = self
            .db
            .update_campaign_status(campaign_id, advertiser_id, new_status)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to update campaign status");
                PlatformError::UpdateFailed
            })?;
        if matched == 0 {
            return Err(PlatformError::UpdateFailed);
        }

        self.db
            .get_campaign(campaign_id)
            .map_err(|e| {
                error!(%campaign_id, error = %e, "failed to read back updated campaign");
                PlatformError::FetchFailed
            })?
            .ok_or(PlatformError::Internal)
    }
}
