use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{
    AdvertiserCard, AdvertiserProfile, ApplicantProfile, Application, ApplicationStatus,
    ApplicationWithApplicant, ApplicationWithCampaign, Campaign, CampaignStatus,
    CampaignWithAdvertiser, InfluencerProfile, Role, UserProfile,
};
use crate::schema::{
    AdvertiserOnboarding, CreateApplication, CreateCampaign, InfluencerOnboarding, SignupBase,
};

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_at(&path)
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn default_path() -> Result<PathBuf> {
        // Use XDG data directory or fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "reach") {
            Ok(proj_dirs.data_dir().join("reach.db"))
        } else {
            Ok(PathBuf::from("reach.db"))
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS user_profiles (
                id BLOB PRIMARY KEY,
                name TEXT NOT NULL,
                phone TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                role TEXT NOT NULL CHECK (role IN ('advertiser', 'influencer')),
                terms_agreed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS advertiser_profiles (
                user_id BLOB PRIMARY KEY REFERENCES user_profiles(id),
                business_name TEXT NOT NULL,
                location TEXT NOT NULL,
                category TEXT NOT NULL,
                business_registration_number TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS influencer_profiles (
                user_id BLOB PRIMARY KEY REFERENCES user_profiles(id),
                birth_date TEXT NOT NULL,
                blog_name TEXT,
                blog_url TEXT,
                video_name TEXT,
                video_url TEXT,
                photo_name TEXT,
                photo_url TEXT,
                microblog_name TEXT,
                microblog_url TEXT
            );

            CREATE TABLE IF NOT EXISTS campaigns (
                id BLOB PRIMARY KEY,
                advertiser_id BLOB NOT NULL REFERENCES user_profiles(id),
                title TEXT NOT NULL,
                recruitment_start_date TEXT NOT NULL,
                recruitment_end_date TEXT NOT NULL,
                recruitment_count INTEGER NOT NULL,
                benefits TEXT NOT NULL,
                store_info TEXT NOT NULL,
                mission TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'recruiting'
                    CHECK (status IN ('recruiting', 'closed', 'selected', 'completed')),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS applications (
                id BLOB PRIMARY KEY,
                campaign_id BLOB NOT NULL REFERENCES campaigns(id),
                influencer_id BLOB NOT NULL REFERENCES user_profiles(id),
                message TEXT NOT NULL,
                visit_date TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'selected', 'rejected')),
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                UNIQUE (campaign_id, influencer_id)
            );

            CREATE INDEX IF NOT EXISTS idx_campaigns_status ON campaigns(status);
            CREATE INDEX IF NOT EXISTS idx_campaigns_advertiser ON campaigns(advertiser_id);
            CREATE INDEX IF NOT EXISTS idx_applications_campaign ON applications(campaign_id);
            CREATE INDEX IF NOT EXISTS idx_applications_influencer ON applications(influencer_id);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='campaigns'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!("Database not initialized. Run 'reach init' first."));
        }
        Ok(())
    }

    // --- User profile operations ---

    pub fn insert_user(&self, id: Uuid, base: &SignupBase, role: Role) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO user_profiles (id, name, phone, email, role, terms_agreed)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, base.name, base.phone, base.email, role.as_str(), base.terms_agreed],
            )
            .context("Failed to insert user profile")?;
        Ok(())
    }

    pub fn insert_advertiser_profile(
        &self,
        user_id: Uuid,
        profile: &AdvertiserOnboarding,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO advertiser_profiles
                     (user_id, business_name, location, category, business_registration_number)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user_id,
                    profile.business_name,
                    profile.location,
                    profile.category,
                    profile.business_registration_number,
                ],
            )
            .context("Failed to insert advertiser profile")?;
        Ok(())
    }

    pub fn insert_influencer_profile(
        &self,
        user_id: Uuid,
        profile: &InfluencerOnboarding,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO influencer_profiles
                     (user_id, birth_date, blog_name, blog_url, video_name, video_url,
                      photo_name, photo_url, microblog_name, microblog_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    user_id,
                    profile.birth_date,
                    profile.blog_name,
                    profile.blog_url,
                    profile.video_name,
                    profile.video_url,
                    profile.photo_name,
                    profile.photo_url,
                    profile.microblog_name,
                    profile.microblog_url,
                ],
            )
            .context("Failed to insert influencer profile")?;
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let result = self.conn.query_row(
            "SELECT id, name, phone, email, role, terms_agreed, created_at, updated_at
             FROM user_profiles WHERE id = ?1",
            params![id],
            Self::row_to_user,
        );
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_advertiser_profile(&self, user_id: Uuid) -> Result<Option<AdvertiserProfile>> {
        let result = self.conn.query_row(
            "SELECT user_id, business_name, location, category, business_registration_number
             FROM advertiser_profiles WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(AdvertiserProfile {
                    user_id: row.get(0)?,
                    business_name: row.get(1)?,
                    location: row.get(2)?,
                    category: row.get(3)?,
                    business_registration_number: row.get(4)?,
                })
            },
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_influencer_profile(&self, user_id: Uuid) -> Result<Option<InfluencerProfile>> {
        let result = self.conn.query_row(
            "SELECT user_id, birth_date, blog_name, blog_url, video_name, video_url,
                    photo_name, photo_url, microblog_name, microblog_url
             FROM influencer_profiles WHERE user_id = ?1",
            params![user_id],
            |row| Self::influencer_profile_at(row, 0),
        );
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // --- Campaign operations ---

    pub fn insert_campaign(&self, id: Uuid, advertiser_id: Uuid, req: &CreateCampaign) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO campaigns
                     (id, advertiser_id, title, recruitment_start_date, recruitment_end_date,
                      recruitment_count, benefits, store_info, mission)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    advertiser_id,
                    req.title,
                    req.recruitment_start_date,
                    req.recruitment_end_date,
                    req.recruitment_count,
                    req.benefits,
                    req.store_info,
                    req.mission,
                ],
            )
            .context("Failed to insert campaign")?;
        Ok(())
    }

    pub fn get_campaign(&self, id: Uuid) -> Result<Option<Campaign>> {
        let result = self.conn.query_row(
            &format!("SELECT {CAMPAIGN_COLS} FROM campaigns c WHERE c.id = ?1"),
            params![id],
            Self::row_to_campaign,
        );
        match result {
            Ok(campaign) => Ok(Some(campaign)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_campaign_with_advertiser(&self, id: Uuid) -> Result<Option<CampaignWithAdvertiser>> {
        let sql = format!(
            "SELECT {CAMPAIGN_COLS}, u.name, a.business_name, a.location, a.category
             FROM campaigns c
             JOIN user_profiles u ON u.id = c.advertiser_id
             JOIN advertiser_profiles a ON a.user_id = c.advertiser_id
             WHERE c.id = ?1"
        );
        let result = self
            .conn
            .query_row(&sql, params![id], Self::row_to_campaign_with_advertiser);
        match result {
            Ok(campaign) => Ok(Some(campaign)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count_campaigns(&self, status: Option<CampaignStatus>) -> Result<i64> {
        let count = if let Some(status) = status {
            self.conn.query_row(
                "SELECT COUNT(*) FROM campaigns WHERE status = ?1",
                params![status.as_str()],
                |row| row.get(0),
            )?
        } else {
            self.conn
                .query_row("SELECT COUNT(*) FROM campaigns", [], |row| row.get(0))?
        };
        Ok(count)
    }

    pub fn list_campaigns(
        &self,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CampaignWithAdvertiser>> {
        let base = format!(
            "SELECT {CAMPAIGN_COLS}, u.name, a.business_name, a.location, a.category
             FROM campaigns c
             JOIN user_profiles u ON u.id = c.advertiser_id
             JOIN advertiser_profiles a ON a.user_id = c.advertiser_id"
        );
        let rows = if let Some(status) = status {
            let sql = format!(
                "{base} WHERE c.status = ?1
                 ORDER BY c.created_at DESC, c.rowid DESC LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mapped = stmt.query_map(
                params![status.as_str(), limit, offset],
                Self::row_to_campaign_with_advertiser,
            )?;
            mapped.collect::<std::result::Result<Vec<_>, _>>()
        } else {
            let sql =
                format!("{base} ORDER BY c.created_at DESC, c.rowid DESC LIMIT ?1 OFFSET ?2");
            let mut stmt = self.conn.prepare(&sql)?;
            let mapped =
                stmt.query_map(params![limit, offset], Self::row_to_campaign_with_advertiser)?;
            mapped.collect::<std::result::Result<Vec<_>, _>>()
        };
        rows.context("Failed to list campaigns")
    }

    /// The ownership filter is part of the update predicate; a non-owner's
    /// call matches zero rows.
    pub fn update_campaign_status(
        &self,
        id: Uuid,
        advertiser_id: Uuid,
        status: CampaignStatus,
    ) -> Result<usize> {
        let updated = self
            .conn
            .execute(
                "UPDATE campaigns SET status = ?1, updated_at = datetime('now')
                 WHERE id = ?2 AND advertiser_id = ?3",
                params![status.as_str(), id, advertiser_id],
            )
            .context("Failed to update campaign status")?;
        Ok(updated)
    }

    // --- Application operations ---

    pub fn insert_application(
        &self,
        id: Uuid,
        influencer_id: Uuid,
        req: &CreateApplication,
    ) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO applications (id, campaign_id, influencer_id, message, visit_date)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, req.campaign_id, influencer_id, req.message, req.visit_date],
            )
            .context("Failed to insert application")?;
        Ok(())
    }

    pub fn get_application(&self, id: Uuid) -> Result<Option<Application>> {
        let result = self.conn.query_row(
            &format!("SELECT {APPLICATION_COLS} FROM applications ap WHERE ap.id = ?1"),
            params![id],
            Self::row_to_application,
        );
        match result {
            Ok(application) => Ok(Some(application)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn find_application(
        &self,
        campaign_id: Uuid,
        influencer_id: Uuid,
    ) -> Result<Option<Application>> {
        let result = self.conn.query_row(
            &format!(
                "SELECT {APPLICATION_COLS} FROM applications ap
                 WHERE ap.campaign_id = ?1 AND ap.influencer_id = ?2"
            ),
            params![campaign_id, influencer_id],
            Self::row_to_application,
        );
        match result {
            Ok(application) => Ok(Some(application)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn count_applications(&self, campaign_id: Uuid) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM applications WHERE campaign_id = ?1",
            params![campaign_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_my_applications(
        &self,
        influencer_id: Uuid,
        status: Option<ApplicationStatus>,
    ) -> Result<i64> {
        let count = if let Some(status) = status {
            self.conn.query_row(
                "SELECT COUNT(*) FROM applications WHERE influencer_id = ?1 AND status = ?2",
                params![influencer_id, status.as_str()],
                |row| row.get(0),
            )?
        } else {
            self.conn.query_row(
                "SELECT COUNT(*) FROM applications WHERE influencer_id = ?1",
                params![influencer_id],
                |row| row.get(0),
            )?
        };
        Ok(count)
    }

    pub fn list_my_applications(
        &self,
        influencer_id: Uuid,
        status: Option<ApplicationStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApplicationWithCampaign>> {
        let base = format!(
            "SELECT {APPLICATION_COLS}, {CAMPAIGN_COLS}
             FROM applications ap
             JOIN campaigns c ON c.id = ap.campaign_id
             WHERE ap.influencer_id = ?1"
        );
        let rows = if let Some(status) = status {
            let sql = format!(
                "{base} AND ap.status = ?2
                 ORDER BY ap.created_at DESC, ap.rowid DESC LIMIT ?3 OFFSET ?4"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mapped = stmt.query_map(
                params![influencer_id, status.as_str(), limit, offset],
                Self::row_to_application_with_campaign,
            )?;
            mapped.collect::<std::result::Result<Vec<_>, _>>()
        } else {
            let sql = format!(
                "{base} ORDER BY ap.created_at DESC, ap.rowid DESC LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let mapped = stmt.query_map(
                params![influencer_id, limit, offset],
                Self::row_to_application_with_campaign,
            )?;
            mapped.collect::<std::result::Result<Vec<_>, _>>()
        };
        rows.context("Failed to list applications")
    }

    pub fn list_campaign_applications(
        &self,
        campaign_id: Uuid,
    ) -> Result<Vec<ApplicationWithApplicant>> {
        let sql = format!(
            "SELECT {APPLICATION_COLS}, u.name, u.email, u.phone,
                    i.birth_date, i.blog_name, i.blog_url, i.video_name, i.video_url,
                    i.photo_name, i.photo_url, i.microblog_name, i.microblog_url
             FROM applications ap
             JOIN user_profiles u ON u.id = ap.influencer_id
             LEFT JOIN influencer_profiles i ON i.user_id = ap.influencer_id
             WHERE ap.campaign_id = ?1
             ORDER BY ap.created_at DESC, ap.rowid DESC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mapped = stmt.query_map(params![campaign_id], Self::row_to_application_with_applicant)?;
        mapped
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to list campaign applications")
    }

    /// Marks the given applications selected and flips the campaign to
    /// `selected` in one transaction. Returns the number of application rows
    /// the bulk update matched; ids that belong to a different campaign match
    /// nothing and are not counted.
    pub fn select_applications(&self, campaign_id: Uuid, application_ids: &[Uuid]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;

        let placeholders = (2..=application_ids.len() + 1)
            .map(|n| format!("?{n}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE applications SET status = 'selected', updated_at = datetime('now')
             WHERE campaign_id = ?1 AND id IN ({placeholders})"
        );
        let mut bound: Vec<&dyn rusqlite::ToSql> = Vec::with_capacity(application_ids.len() + 1);
        bound.push(&campaign_id);
        for id in application_ids {
            bound.push(id);
        }
        let updated = tx
            .execute(&sql, &bound[..])
            .context("Failed to mark applications selected")?;

        tx.execute(
            "UPDATE campaigns SET status = 'selected', updated_at = datetime('now') WHERE id = ?1",
            params![campaign_id],
        )
        .context("Failed to mark campaign selected")?;

        tx.commit()?;
        Ok(updated)
    }

    // --- Row mappers ---

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<UserProfile> {
        let role: String = row.get(4)?;
        Ok(UserProfile {
            id: row.get(0)?,
            name: row.get(1)?,
            phone: row.get(2)?,
            email: row.get(3)?,
            role: parse_enum(4, &role)?,
            terms_agreed: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn campaign_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<Campaign> {
        let status: String = row.get(base + 9)?;
        Ok(Campaign {
            id: row.get(base)?,
            advertiser_id: row.get(base + 1)?,
            title: row.get(base + 2)?,
            recruitment_start_date: row.get(base + 3)?,
            recruitment_end_date: row.get(base + 4)?,
            recruitment_count: row.get(base + 5)?,
            benefits: row.get(base + 6)?,
            store_info: row.get(base + 7)?,
            mission: row.get(base + 8)?,
            status: parse_enum(base + 9, &status)?,
            created_at: row.get(base + 10)?,
            updated_at: row.get(base + 11)?,
        })
    }

    fn application_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<Application> {
        let status: String = row.get(base + 5)?;
        Ok(Application {
            id: row.get(base)?,
            campaign_id: row.get(base + 1)?,
            influencer_id: row.get(base + 2)?,
            message: row.get(base + 3)?,
            visit_date: row.get(base + 4)?,
            status: parse_enum(base + 5, &status)?,
            created_at: row.get(base + 6)?,
            updated_at: row.get(base + 7)?,
        })
    }

    fn influencer_profile_at(row: &rusqlite::Row, base: usize) -> rusqlite::Result<InfluencerProfile> {
        Ok(InfluencerProfile {
            user_id: row.get(base)?,
            birth_date: row.get(base + 1)?,
            blog_name: row.get(base + 2)?,
            blog_url: row.get(base + 3)?,
            video_name: row.get(base + 4)?,
            video_url: row.get(base + 5)?,
            photo_name: row.get(base + 6)?,
            photo_url: row.get(base + 7)?,
            microblog_name: row.get(base + 8)?,
            microblog_url: row.get(base + 9)?,
        })
    }

    fn row_to_campaign(row: &rusqlite::Row) -> rusqlite::Result<Campaign> {
        Self::campaign_at(row, 0)
    }

    fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
        Self::application_at(row, 0)
    }

    fn row_to_campaign_with_advertiser(
        row: &rusqlite::Row,
    ) -> rusqlite::Result<CampaignWithAdvertiser> {
        Ok(CampaignWithAdvertiser {
            campaign: Self::campaign_at(row, 0)?,
            advertiser: AdvertiserCard {
                name: row.get(12)?,
                business_name: row.get(13)?,
                location: row.get(14)?,
                category: row.get(15)?,
            },
        })
    }

    fn row_to_application_with_campaign(
        row: &rusqlite::Row,
    ) -> rusqlite::Result<ApplicationWithCampaign> {
        Ok(ApplicationWithCampaign {
            application: Self::application_at(row, 0)?,
            campaign: Self::campaign_at(row, 8)?,
        })
    }

    fn row_to_application_with_applicant(
        row: &rusqlite::Row,
    ) -> rusqlite::Result<ApplicationWithApplicant> {
        let application = Self::application_at(row, 0)?;
        let birth_date: Option<chrono::NaiveDate> = row.get(11)?;
        let influencer_profile = match birth_date {
            Some(birth_date) => Some(InfluencerProfile {
                user_id: application.influencer_id,
                birth_date,
                blog_name: row.get(12)?,
                blog_url: row.get(13)?,
                video_name: row.get(14)?,
                video_url: row.get(15)?,
                photo_name: row.get(16)?,
                photo_url: row.get(17)?,
                microblog_name: row.get(18)?,
                microblog_url: row.get(19)?,
            }),
            None => None,
        };
        Ok(ApplicationWithApplicant {
            application,
            applicant: ApplicantProfile {
                name: row.get(8)?,
                email: row.get(9)?,
                phone: row.get(10)?,
                influencer_profile,
            },
        })
    }
}

const CAMPAIGN_COLS: &str = "c.id, c.advertiser_id, c.title, c.recruitment_start_date, \
     c.recruitment_end_date, c.recruitment_count, c.benefits, c.store_info, c.mission, \
     c.status, c.created_at, c.updated_at";

const APPLICATION_COLS: &str = "ap.id, ap.campaign_id, ap.influencer_id, ap.message, \
     ap.visit_date, ap.status, ap.created_at, ap.updated_at";

fn parse_enum<T: std::str::FromStr<Err = String>>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    raw.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

/// True when an insert bounced off a UNIQUE constraint, as opposed to any
/// other store-level failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, Some(msg)))
            if e.code == rusqlite::ErrorCode::ConstraintViolation && msg.contains("UNIQUE")
    )
}
