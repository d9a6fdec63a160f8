//! End-to-end flows through the services, against an in-memory store and an
//! in-process identity provider.

use chrono::NaiveDate;
use uuid::Uuid;

use reach::applications::ApplicationService;
use reach::auth::{AuthService, IdentityError, IdentityProvider, IdentitySession, IdentitySignup};
use reach::campaigns::CampaignService;
use reach::db::Database;
use reach::error::{Envelope, PlatformError};
use reach::models::{ApplicationStatus, CampaignStatus, Role};
use reach::schema::{
    AdvertiserOnboarding, AdvertiserSignup, ApplicationQuery, CampaignQuery, CreateApplication,
    CreateCampaign, InfluencerOnboarding, InfluencerSignup, SelectApplicants, SignupBase,
};

/// Stand-in for the external auth service: hands out fresh ids and accepts
/// everything.
struct FakeIdentityProvider;

impl IdentityProvider for FakeIdentityProvider {
    fn sign_up(&self, _req: &IdentitySignup) -> Result<Uuid, IdentityError> {
        Ok(Uuid::new_v4())
    }

    fn sign_in(&self, _email: &str, _password: &str) -> Result<IdentitySession, IdentityError> {
        Err(IdentityError::Rejected("sign-in unused in these tests".into()))
    }

    fn current_user(&self, _access_token: &str) -> Result<Uuid, IdentityError> {
        Err(IdentityError::Rejected("sessions unused in these tests".into()))
    }
}

fn database() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.init().unwrap();
    db
}

fn signup_advertiser(db: &Database, email: &str) -> Uuid {
    let identity = FakeIdentityProvider;
    AuthService::new(db, &identity)
        .signup_advertiser(&AdvertiserSignup {
            base: SignupBase {
                email: email.into(),
                password: "s3cret-pw".into(),
                name: "Jin Park".into(),
                phone: "010-1234-5678".into(),
                terms_agreed: true,
            },
            advertiser_profile: AdvertiserOnboarding {
                business_name: "Cafe Dawn".into(),
                location: "Mapo-gu, Seoul".into(),
                category: "cafe".into(),
                business_registration_number: "123-45-67890".into(),
            },
        })
        .unwrap()
        .user_id
}

fn signup_influencer(db: &Database, email: &str) -> Uuid {
    let identity = FakeIdentityProvider;
    AuthService::new(db, &identity)
        .signup_influencer(&InfluencerSignup {
            base: SignupBase {
                email: email.into(),
                password: "s3cret-pw".into(),
                name: "Min Lee".into(),
                phone: "010-8765-4321".into(),
                terms_agreed: true,
            },
            influencer_profile: InfluencerOnboarding {
                birth_date: NaiveDate::from_ymd_opt(1995, 6, 15).unwrap(),
                blog_name: Some("daily eats".into()),
                blog_url: Some("https://blog.example.com/daily".into()),
                video_name: None,
                video_url: None,
                photo_name: None,
                photo_url: None,
                microblog_name: None,
                microblog_url: None,
            },
        })
        .unwrap()
        .user_id
}

fn campaign_req(title: &str) -> CreateCampaign {
    CreateCampaign {
        title: title.into(),
        recruitment_start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        recruitment_end_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        recruitment_count: 3,
        benefits: "Free brunch set for two".into(),
        store_info: "Open 10-22 near the station".into(),
        mission: "Post a review with 3+ photos".into(),
    }
}

fn apply_req(campaign_id: Uuid) -> CreateApplication {
    CreateApplication {
        campaign_id,
        message: "I visit every weekend and post daily".into(),
        visit_date: NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
    }
}

#[test]
fn full_campaign_lifecycle() {
    let db = database();
    let advertiser = signup_advertiser(&db, "owner@biz.example.com");
    let first_creator = signup_influencer(&db, "one@creator.example.com");
    let second_creator = signup_influencer(&db, "two@creator.example.com");
    let third_creator = signup_influencer(&db, "three@creator.example.com");

    let campaigns = CampaignService::new(&db);
    let applications = ApplicationService::new(&db);

    // Advertiser posts a campaign; it shows up in the public listing.
    let campaign = campaigns
        .create(advertiser, &campaign_req("Weekend brunch tasting"))
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Recruiting);

    let listing = campaigns.list(&CampaignQuery::default()).unwrap();
    assert_eq!(listing.total, 1);
    assert_eq!(listing.items[0].advertiser.business_name, "Cafe Dawn");

    // Influencers apply while recruitment is open.
    let first = applications
        .create(first_creator, &apply_req(campaign.id))
        .unwrap();
    let second = applications
        .create(second_creator, &apply_req(campaign.id))
        .unwrap();
    let third = applications
        .create(third_creator, &apply_req(campaign.id))
        .unwrap();
    assert_eq!(first.status, ApplicationStatus::Pending);

    // Detail view counts applications and surfaces the caller's own.
    let detail = campaigns.get(campaign.id, Some(first_creator)).unwrap();
    assert_eq!(detail.application_count, 3);
    assert_eq!(detail.user_application.as_ref().unwrap().id, first.id);

    let anonymous = campaigns.get(campaign.id, None).unwrap();
    assert!(anonymous.user_application.is_none());

    // Close recruitment; late applications bounce.
    campaigns
        .update_status(campaign.id, advertiser, CampaignStatus::Closed)
        .unwrap();
    let late = signup_influencer(&db, "late@creator.example.com");
    assert_eq!(
        applications.create(late, &apply_req(campaign.id)).unwrap_err(),
        PlatformError::CampaignNotRecruiting
    );

    // Owner reviews the roster and selects two winners.
    let roster = applications
        .list_for_campaign(campaign.id, advertiser)
        .unwrap();
    assert_eq!(roster.len(), 3);
    assert!(roster[0].applicant.influencer_profile.is_some());

    let outcome = applications
        .select(
            campaign.id,
            advertiser,
            &SelectApplicants {
                application_ids: vec![first.id, second.id],
            },
        )
        .unwrap();
    assert_eq!(outcome.selected_count, 2);

    let after = campaigns.get(campaign.id, Some(third_creator)).unwrap();
    assert_eq!(after.campaign.status, CampaignStatus::Selected);
    assert_eq!(
        after.user_application.unwrap().status,
        ApplicationStatus::Pending
    );

    // Winners see it in their own lists.
    let mine = applications
        .list_mine(first_creator, &ApplicationQuery::default())
        .unwrap();
    assert_eq!(mine.total, 1);
    assert_eq!(mine.items[0].application.status, ApplicationStatus::Selected);

    // The advertiser closes the campaign out manually.
    let completed = campaigns
        .update_status(campaign.id, advertiser, CampaignStatus::Completed)
        .unwrap();
    assert_eq!(completed.status, CampaignStatus::Completed);
}

#[test]
fn ownership_is_enforced_across_owner_only_operations() {
    let db = database();
    let owner = signup_advertiser(&db, "owner@biz.example.com");
    let rival = signup_advertiser(&db, "rival@biz.example.com");
    let creator = signup_influencer(&db, "creator@example.com");

    let campaigns = CampaignService::new(&db);
    let applications = ApplicationService::new(&db);

    let campaign = campaigns.create(owner, &campaign_req("Owner only")).unwrap();
    let application = applications.create(creator, &apply_req(campaign.id)).unwrap();
    campaigns
        .update_status(campaign.id, owner, CampaignStatus::Closed)
        .unwrap();

    assert_eq!(
        campaigns
            .update_status(campaign.id, rival, CampaignStatus::Selected)
            .unwrap_err(),
        PlatformError::Unauthorized
    );
    assert_eq!(
        applications
            .list_for_campaign(campaign.id, rival)
            .unwrap_err(),
        PlatformError::Unauthorized
    );
    assert_eq!(
        applications
            .select(
                campaign.id,
                rival,
                &SelectApplicants {
                    application_ids: vec![application.id],
                },
            )
            .unwrap_err(),
        PlatformError::Unauthorized
    );

    // Nothing moved.
    assert_eq!(
        db.get_application(application.id).unwrap().unwrap().status,
        ApplicationStatus::Pending
    );
    assert_eq!(
        db.get_campaign(campaign.id).unwrap().unwrap().status,
        CampaignStatus::Closed
    );
}

#[test]
fn signup_round_trip_attaches_exactly_one_role_profile() {
    let db = database();
    let advertiser = signup_advertiser(&db, "owner@biz.example.com");
    let influencer = signup_influencer(&db, "creator@example.com");
    let identity = FakeIdentityProvider;
    let auth = AuthService::new(&db, &identity);

    let advertiser_detail = auth.get_profile(advertiser).unwrap();
    assert_eq!(advertiser_detail.user.role, Role::Advertiser);
    assert_eq!(advertiser_detail.user.email, "owner@biz.example.com");
    assert!(advertiser_detail.advertiser_profile.is_some());
    assert!(advertiser_detail.influencer_profile.is_none());

    let influencer_detail = auth.get_profile(influencer).unwrap();
    assert_eq!(influencer_detail.user.role, Role::Influencer);
    assert!(influencer_detail.advertiser_profile.is_none());
    assert!(influencer_detail.influencer_profile.is_some());
}

#[test]
fn pagination_law_holds_over_a_larger_listing() {
    let db = database();
    let advertiser = signup_advertiser(&db, "owner@biz.example.com");
    let campaigns = CampaignService::new(&db);
    for n in 0..7 {
        campaigns
            .create(advertiser, &campaign_req(&format!("Campaign number {n}")))
            .unwrap();
    }

    for limit in [1, 2, 3, 7, 50] {
        let page = campaigns
            .list(&CampaignQuery {
                status: None,
                page: 1,
                limit,
            })
            .unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, (7 + limit - 1) / limit);
    }

    // Past the end: success with an empty page.
    let beyond = campaigns
        .list(&CampaignQuery {
            status: None,
            page: 5,
            limit: 3,
        })
        .unwrap();
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.total_pages, 3);
}

#[test]
fn failure_envelopes_carry_status_code_and_message() {
    let db = database();
    let campaigns = CampaignService::new(&db);

    let result = campaigns.get(Uuid::new_v4(), None);
    let envelope = Envelope::from_result(result);
    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json["ok"], false);
    assert_eq!(json["status"], 404);
    assert_eq!(json["error"]["code"], "CAMPAIGN_NOT_FOUND");
    assert!(json["error"]["message"].is_string());

    let listing = campaigns.list(&CampaignQuery::default());
    let envelope = Envelope::from_result(listing);
    let json = serde_json::to_value(&envelope).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["total"], 0);
    assert_eq!(json["data"]["total_pages"], 0);
}
