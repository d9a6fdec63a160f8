use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use reach::applications::ApplicationService;
use reach::auth::{AuthService, HttpIdentityProvider, IdentityProvider};
use reach::campaigns::CampaignService;
use reach::db::Database;
use reach::error::{Envelope, PlatformError};
use reach::models::{ApplicationStatus, CampaignStatus, Role, UserProfileDetail};
use reach::schema::{
    AdvertiserOnboarding, ApplicationQuery, CampaignQuery, CreateApplication, CreateCampaign,
    InfluencerOnboarding, SelectApplicants, SignupBase,
};
use reach::wizard::{CompletedSignup, SignupWizard, WizardError};

#[derive(Parser)]
#[command(name = "reach")]
#[command(about = "Experience-campaign marketplace - post campaigns, apply, select winners")]
struct Cli {
    /// Database file path (defaults to the platform data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print results as JSON envelopes instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Sign up a new user
    Signup {
        #[command(subcommand)]
        command: SignupCommands,
    },

    /// Sign in against the identity provider and print a session
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// Identity provider base URL (or REACH_AUTH_URL)
        #[arg(long)]
        auth_url: Option<String>,
    },

    /// Resolve an access token to its profile
    Whoami {
        #[arg(long)]
        token: String,

        /// Identity provider base URL (or REACH_AUTH_URL)
        #[arg(long)]
        auth_url: Option<String>,
    },

    /// Show a user profile
    Profile {
        /// User ID
        user_id: Uuid,
    },

    /// Manage campaigns
    Campaign {
        #[command(subcommand)]
        command: CampaignCommands,
    },

    /// Apply to a campaign as an influencer
    Apply {
        /// Acting influencer's user ID
        #[arg(long)]
        influencer: Uuid,

        /// Campaign ID
        #[arg(long)]
        campaign: Uuid,

        /// Motivational message (at least 10 characters)
        #[arg(long)]
        message: String,

        /// Planned visit date (YYYY-MM-DD)
        #[arg(long)]
        visit_date: NaiveDate,
    },

    /// List your own applications
    Applications {
        /// Acting influencer's user ID
        #[arg(long)]
        influencer: Uuid,

        /// Filter by status (pending, selected, rejected)
        #[arg(short, long)]
        status: Option<String>,

        #[arg(long, default_value = "1")]
        page: i64,

        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[derive(Subcommand)]
enum SignupCommands {
    /// Sign up as an advertiser
    Advertiser {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,

        /// Mobile number, e.g. 010-1234-5678
        #[arg(long)]
        phone: String,

        /// Accept the terms of service
        #[arg(long)]
        agree_terms: bool,

        #[arg(long)]
        business_name: String,

        #[arg(long)]
        location: String,

        #[arg(long)]
        category: String,

        /// Business registration number, e.g. 123-45-67890
        #[arg(long)]
        business_registration_number: String,

        /// Identity provider base URL (or REACH_AUTH_URL)
        #[arg(long)]
        auth_url: Option<String>,
    },

    /// Sign up as an influencer
    Influencer {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,

        /// Mobile number, e.g. 010-1234-5678
        #[arg(long)]
        phone: String,

        /// Accept the terms of service
        #[arg(long)]
        agree_terms: bool,

        /// Birth date (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,

        #[arg(long)]
        blog_name: Option<String>,

        #[arg(long)]
        blog_url: Option<String>,

        #[arg(long)]
        video_name: Option<String>,

        #[arg(long)]
        video_url: Option<String>,

        #[arg(long)]
        photo_name: Option<String>,

        #[arg(long)]
        photo_url: Option<String>,

        #[arg(long)]
        microblog_name: Option<String>,

        #[arg(long)]
        microblog_url: Option<String>,

        /// Identity provider base URL (or REACH_AUTH_URL)
        #[arg(long)]
        auth_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum CampaignCommands {
    /// Create a campaign (starts recruiting)
    Create {
        /// Acting advertiser's user ID
        #[arg(long)]
        advertiser: Uuid,

        #[arg(long)]
        title: String,

        /// Recruitment window start (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,

        /// Recruitment window end (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,

        /// Number of influencers to recruit
        #[arg(long)]
        count: i64,

        #[arg(long)]
        benefits: String,

        #[arg(long)]
        store_info: String,

        #[arg(long)]
        mission: String,
    },

    /// List campaigns
    List {
        /// Filter by status (recruiting, closed, selected, completed)
        #[arg(short, long)]
        status: Option<String>,

        #[arg(long, default_value = "1")]
        page: i64,

        #[arg(long, default_value = "20")]
        limit: i64,
    },

    /// Show campaign detail
    Show {
        /// Campaign ID
        id: Uuid,

        /// Include this caller's own application, if any
        #[arg(long)]
        as_user: Option<Uuid>,
    },

    /// Close recruitment (recruiting -> closed)
    Close {
        /// Campaign ID
        id: Uuid,

        /// Acting advertiser's user ID
        #[arg(long)]
        advertiser: Uuid,
    },

    /// Close out a finished campaign (selected -> completed)
    Complete {
        /// Campaign ID
        id: Uuid,

        /// Acting advertiser's user ID
        #[arg(long)]
        advertiser: Uuid,
    },

    /// List applicants with contact details (owner only)
    Applicants {
        /// Campaign ID
        id: Uuid,

        /// Acting advertiser's user ID
        #[arg(long)]
        advertiser: Uuid,
    },

    /// Select winning applications (owner only, campaign must be closed)
    Select {
        /// Campaign ID
        id: Uuid,

        /// Acting advertiser's user ID
        #[arg(long)]
        advertiser: Uuid,

        /// Application IDs to select
        #[arg(required = true)]
        application_ids: Vec<Uuid>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("reach=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_database(path: Option<&PathBuf>) -> Result<Database> {
    match path {
        Some(path) => Database::open_at(path),
        None => Database::open(),
    }
}

/// Renders a service result either as a JSON envelope or through the given
/// human formatter. Failures exit non-zero either way.
fn emit<T: Serialize>(
    json: bool,
    result: Result<T, PlatformError>,
    render: impl FnOnce(&T),
) -> Result<()> {
    if json {
        let ok = result.is_ok();
        let envelope = Envelope::from_result(result);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }
    match result {
        Ok(value) => {
            render(&value);
            Ok(())
        }
        Err(err) => Err(anyhow!("{} [{}]", err, err.code())),
    }
}

fn wizard_error(err: WizardError) -> anyhow::Error {
    match err {
        WizardError::Validation(fields) => {
            let detail = fields
                .iter()
                .map(|f| format!("{}: {}", f.field, f.message))
                .collect::<Vec<_>>()
                .join("; ");
            anyhow!("invalid input - {detail}")
        }
        other => anyhow!("{other}"),
    }
}

fn parse_status<T: std::str::FromStr<Err = String>>(status: Option<String>) -> Result<Option<T>> {
    match status {
        Some(raw) => raw.parse().map(Some).map_err(|e: String| anyhow!(e)),
        None => Ok(None),
    }
}

fn render_profile(detail: &UserProfileDetail) {
    let user = &detail.user;
    println!("User {}", user.id);
    println!("Name: {}", user.name);
    println!("Email: {}", user.email);
    println!("Phone: {}", user.phone);
    println!("Role: {}", user.role);
    if let Some(profile) = &detail.advertiser_profile {
        println!(
            "Business: {} ({}, {})",
            profile.business_name, profile.category, profile.location
        );
        println!("Registration: {}", profile.business_registration_number);
    }
    if let Some(profile) = &detail.influencer_profile {
        println!("Born: {}", profile.birth_date);
        for (label, name, url) in [
            ("Blog", &profile.blog_name, &profile.blog_url),
            ("Video", &profile.video_name, &profile.video_url),
            ("Photo", &profile.photo_name, &profile.photo_url),
            ("Microblog", &profile.microblog_name, &profile.microblog_url),
        ] {
            if name.is_some() || url.is_some() {
                println!(
                    "{}: {} {}",
                    label,
                    name.as_deref().unwrap_or("-"),
                    url.as_deref().unwrap_or("")
                );
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let db = open_database(cli.db.as_ref())?;
    let json = cli.json;

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Signup { command } => {
            db.ensure_initialized()?;
            run_signup(&db, json, command)?;
        }

        Commands::Login {
            email,
            password,
            auth_url,
        } => {
            let identity = HttpIdentityProvider::resolve(auth_url);
            let session = identity.sign_in(&email, &password)?;
            println!("user_id: {}", session.user_id);
            println!("access_token: {}", session.access_token);
        }

        Commands::Whoami { token, auth_url } => {
            db.ensure_initialized()?;
            let identity = HttpIdentityProvider::resolve(auth_url);
            let user_id = identity.current_user(&token)?;
            let auth = AuthService::new(&db, &identity);
            emit(json, auth.get_profile(user_id), render_profile)?;
        }

        Commands::Profile { user_id } => {
            db.ensure_initialized()?;
            let identity = HttpIdentityProvider::resolve(None);
            let auth = AuthService::new(&db, &identity);
            emit(json, auth.get_profile(user_id), render_profile)?;
        }

        Commands::Campaign { command } => {
            db.ensure_initialized()?;
            run_campaign(&db, json, command)?;
        }

        Commands::Apply {
            influencer,
            campaign,
            message,
            visit_date,
        } => {
            db.ensure_initialized()?;
            let service = ApplicationService::new(&db);
            let req = CreateApplication {
                campaign_id: campaign,
                message,
                visit_date,
            };
            emit(json, service.create(influencer, &req), |application| {
                println!(
                    "Applied to campaign {} (application {}, status {})",
                    application.campaign_id, application.id, application.status
                );
            })?;
        }

        Commands::Applications {
            influencer,
            status,
            page,
            limit,
        } => {
            db.ensure_initialized()?;
            let service = ApplicationService::new(&db);
            let query = ApplicationQuery {
                status: parse_status::<ApplicationStatus>(status)?,
                page,
                limit,
            };
            emit(json, service.list_mine(influencer, &query), |page| {
                if page.items.is_empty() {
                    println!("No applications found.");
                    return;
                }
                println!(
                    "{:<38} {:<10} {:<28} {:<12}",
                    "ID", "STATUS", "CAMPAIGN", "VISIT"
                );
                println!("{}", "-".repeat(90));
                for item in &page.items {
                    println!(
                        "{:<38} {:<10} {:<28} {:<12}",
                        item.application.id,
                        item.application.status,
                        truncate(&item.campaign.title, 26),
                        item.application.visit_date,
                    );
                }
                println!(
                    "\nPage {} of {} ({} total)",
                    page.page, page.total_pages, page.total
                );
            })?;
        }
    }

    Ok(())
}

fn run_signup(db: &Database, json: bool, command: SignupCommands) -> Result<()> {
    match command {
        SignupCommands::Advertiser {
            email,
            password,
            name,
            phone,
            agree_terms,
            business_name,
            location,
            category,
            business_registration_number,
            auth_url,
        } => {
            let mut wizard = SignupWizard::new();
            wizard.choose_role(Role::Advertiser).map_err(wizard_error)?;
            wizard
                .submit_basic(SignupBase {
                    email,
                    password,
                    name,
                    phone,
                    terms_agreed: agree_terms,
                })
                .map_err(wizard_error)?;
            let completed = wizard
                .submit_advertiser_details(AdvertiserOnboarding {
                    business_name,
                    location,
                    category,
                    business_registration_number,
                })
                .map_err(wizard_error)?;

            let identity = HttpIdentityProvider::resolve(auth_url);
            let auth = AuthService::new(db, &identity);
            let CompletedSignup::Advertiser(req) = completed else {
                return Err(anyhow!("wizard produced the wrong signup branch"));
            };
            emit(json, auth.signup_advertiser(&req), |outcome| {
                println!("Signed up advertiser {}", outcome.user_id);
            })
        }

        SignupCommands::Influencer {
            email,
            password,
            name,
            phone,
            agree_terms,
            birth_date,
            blog_name,
            blog_url,
            video_name,
            video_url,
            photo_name,
            photo_url,
            microblog_name,
            microblog_url,
            auth_url,
        } => {
            let mut wizard = SignupWizard::new();
            wizard.choose_role(Role::Influencer).map_err(wizard_error)?;
            wizard
                .submit_basic(SignupBase {
                    email,
                    password,
                    name,
                    phone,
                    terms_agreed: agree_terms,
                })
                .map_err(wizard_error)?;
            let completed = wizard
                .submit_influencer_details(InfluencerOnboarding {
                    birth_date,
                    blog_name,
                    blog_url,
                    video_name,
                    video_url,
                    photo_name,
                    photo_url,
                    microblog_name,
                    microblog_url,
                })
                .map_err(wizard_error)?;

            let identity = HttpIdentityProvider::resolve(auth_url);
            let auth = AuthService::new(db, &identity);
            let CompletedSignup::Influencer(req) = completed else {
                return Err(anyhow!("wizard produced the wrong signup branch"));
            };
            emit(json, auth.signup_influencer(&req), |outcome| {
                println!("Signed up influencer {}", outcome.user_id);
            })
        }
    }
}

fn run_campaign(db: &Database, json: bool, command: CampaignCommands) -> Result<()> {
    let campaigns = CampaignService::new(db);
    let applications = ApplicationService::new(db);

    match command {
        CampaignCommands::Create {
            advertiser,
            title,
            start,
            end,
            count,
            benefits,
            store_info,
            mission,
        } => {
            let req = CreateCampaign {
                title,
                recruitment_start_date: start,
                recruitment_end_date: end,
                recruitment_count: count,
                benefits,
                store_info,
                mission,
            };
            emit(json, campaigns.create(advertiser, &req), |campaign| {
                println!("Created campaign {} ({})", campaign.id, campaign.status);
            })
        }

        CampaignCommands::List {
            status,
            page,
            limit,
        } => {
            let query = CampaignQuery {
                status: parse_status::<CampaignStatus>(status)?,
                page,
                limit,
            };
            emit(json, campaigns.list(&query), |page| {
                if page.items.is_empty() {
                    println!("No campaigns found.");
                    return;
                }
                println!(
                    "{:<38} {:<12} {:<26} {:<20} {:>6}",
                    "ID", "STATUS", "TITLE", "BUSINESS", "SLOTS"
                );
                println!("{}", "-".repeat(104));
                for item in &page.items {
                    println!(
                        "{:<38} {:<12} {:<26} {:<20} {:>6}",
                        item.campaign.id,
                        item.campaign.status,
                        truncate(&item.campaign.title, 24),
                        truncate(&item.advertiser.business_name, 18),
                        item.campaign.recruitment_count,
                    );
                }
                println!(
                    "\nPage {} of {} ({} total)",
                    page.page, page.total_pages, page.total
                );
            })
        }

        CampaignCommands::Show { id, as_user } => {
            emit(json, campaigns.get(id, as_user), |detail| {
                let c = &detail.campaign;
                println!("Campaign {}", c.id);
                println!("Title: {}", c.title);
                println!("Status: {}", c.status);
                println!(
                    "Recruiting: {} to {} ({} people)",
                    c.recruitment_start_date, c.recruitment_end_date, c.recruitment_count
                );
                println!(
                    "By: {} ({}, {})",
                    detail.advertiser.business_name,
                    detail.advertiser.category,
                    detail.advertiser.location
                );
                println!("Benefits: {}", c.benefits);
                println!("Store: {}", c.store_info);
                println!("Mission: {}", c.mission);
                println!("Applications: {}", detail.application_count);
                if let Some(app) = &detail.user_application {
                    println!(
                        "Your application: {} ({}, visiting {})",
                        app.id, app.status, app.visit_date
                    );
                }
            })
        }

        CampaignCommands::Close { id, advertiser } => emit(
            json,
            campaigns.update_status(id, advertiser, CampaignStatus::Closed),
            |campaign| println!("Campaign {} is now {}", campaign.id, campaign.status),
        ),

        CampaignCommands::Complete { id, advertiser } => emit(
            json,
            campaigns.update_status(id, advertiser, CampaignStatus::Completed),
            |campaign| println!("Campaign {} is now {}", campaign.id, campaign.status),
        ),

        CampaignCommands::Applicants { id, advertiser } => emit(
            json,
            applications.list_for_campaign(id, advertiser),
            |roster| {
                if roster.is_empty() {
                    println!("No applications yet.");
                    return;
                }
                println!(
                    "{:<38} {:<10} {:<14} {:<15} {:<12}",
                    "ID", "STATUS", "NAME", "PHONE", "VISIT"
                );
                println!("{}", "-".repeat(91));
                for item in roster {
                    println!(
                        "{:<38} {:<10} {:<14} {:<15} {:<12}",
                        item.application.id,
                        item.application.status,
                        truncate(&item.applicant.name, 12),
                        item.applicant.phone,
                        item.application.visit_date,
                    );
                }
            },
        ),

        CampaignCommands::Select {
            id,
            advertiser,
            application_ids,
        } => {
            let req = SelectApplicants { application_ids };
            emit(json, applications.select(id, advertiser, &req), |outcome| {
                println!("Selected {} application(s)", outcome.selected_count);
            })
        }
    }
}
