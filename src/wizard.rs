//! The multi-step signup wizard as a plain state machine.
//!
//! Steps run role -> basic -> details, forward only except for explicit
//! `back` transitions. Each forward step validates its payload; a failed
//! validation leaves the machine where it was. Nothing is persisted until the
//! completed request is submitted in one call.

use thiserror::Error;

use crate::error::FieldError;
use crate::models::Role;
use crate::schema::{
    AdvertiserOnboarding, AdvertiserSignup, InfluencerOnboarding, InfluencerSignup, SignupBase,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Role,
    Basic,
    Details,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("this input belongs to the {expected:?} step, wizard is at {actual:?}")]
    WrongStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("details do not match the chosen role")]
    RoleMismatch,
    #[error("step input failed validation")]
    Validation(Vec<FieldError>),
}

/// The finished wizard output, ready for a single signup call.
#[derive(Debug, Clone)]
pub enum CompletedSignup {
    Advertiser(AdvertiserSignup),
    Influencer(InfluencerSignup),
}

#[derive(Debug, Default)]
pub struct SignupWizard {
    role: Option<Role>,
    basic: Option<SignupBase>,
}

impl SignupWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        match (&self.role, &self.basic) {
            (None, _) => WizardStep::Role,
            (Some(_), None) => WizardStep::Basic,
            (Some(_), Some(_)) => WizardStep::Details,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        let actual = self.step();
        if actual != expected {
            return Err(WizardError::WrongStep { expected, actual });
        }
        Ok(())
    }

    /// role -> basic. The choice decides which details step renders next.
    pub fn choose_role(&mut self, role: Role) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Role)?;
        self.role = Some(role);
        Ok(())
    }

    /// basic -> details, keeping the entered values for a later `back`.
    pub fn submit_basic(&mut self, basic: SignupBase) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Basic)?;
        basic.validate().map_err(WizardError::Validation)?;
        self.basic = Some(basic);
        Ok(())
    }

    /// Final step of the advertiser branch; yields the complete request.
    /// The wizard stays on the details step so a failed submission can be
    /// retried without re-entering anything.
    pub fn submit_advertiser_details(
        &self,
        details: AdvertiserOnboarding,
    ) -> Result<CompletedSignup, WizardError> {
        self.expect_step(WizardStep::Details)?;
        if self.role != Some(Role::Advertiser) {
            return Err(WizardError::RoleMismatch);
        }
        details.validate().map_err(WizardError::Validation)?;
        let base = self.basic.clone().ok_or(WizardError::WrongStep {
            expected: WizardStep::Details,
            actual: self.step(),
        })?;
        Ok(CompletedSignup::Advertiser(AdvertiserSignup {
            base,
            advertiser_profile: details,
        }))
    }

    pub fn submit_influencer_details(
        &self,
        details: InfluencerOnboarding,
    ) -> Result<CompletedSignup, WizardError> {
        self.expect_step(WizardStep::Details)?;
        if self.role != Some(Role::Influencer) {
            return Err(WizardError::RoleMismatch);
        }
        details.validate().map_err(WizardError::Validation)?;
        let base = self.basic.clone().ok_or(WizardError::WrongStep {
            expected: WizardStep::Details,
            actual: self.step(),
        })?;
        Ok(CompletedSignup::Influencer(InfluencerSignup {
            base,
            influencer_profile: details,
        }))
    }

    /// details -> basic -> role. A no-op on the first step.
    pub fn back(&mut self) {
        match self.step() {
            WizardStep::Details => self.basic = None,
            WizardStep::Basic => self.role = None,
            WizardStep::Role => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn basic() -> SignupBase {
        SignupBase {
            email: "owner@biz.example.com".into(),
            password: "s3cret-pw".into(),
            name: "Jin Park".into(),
            phone: "010-1234-5678".into(),
            terms_agreed: true,
        }
    }

    fn advertiser_details() -> AdvertiserOnboarding {
        AdvertiserOnboarding {
            business_name: "Cafe Dawn".into(),
            location: "Mapo-gu, Seoul".into(),
            category: "cafe".into(),
            business_registration_number: "123-45-67890".into(),
        }
    }

    fn influencer_details() -> InfluencerOnboarding {
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
    fn happy_path_through_the_advertiser_branch() {
        let mut wizard = SignupWizard::new();
        assert_eq!(wizard.step(), WizardStep::Role);

        wizard.choose_role(Role::Advertiser).unwrap();
        assert_eq!(wizard.step(), WizardStep::Basic);

        wizard.submit_basic(basic()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);

        let completed = wizard.submit_advertiser_details(advertiser_details()).unwrap();
        match completed {
            CompletedSignup::Advertiser(req) => {
                assert_eq!(req.base.email, "owner@biz.example.com");
                assert_eq!(req.advertiser_profile.business_name, "Cafe Dawn");
            }
            CompletedSignup::Influencer(_) => panic!("wrong branch"),
        }
        // Still on details: a failed network submission can be retried.
        assert_eq!(wizard.step(), WizardStep::Details);
    }

    #[test]
    fn steps_cannot_be_skipped() {
        let mut wizard = SignupWizard::new();
        let err = wizard.submit_basic(basic()).unwrap_err();
        assert_eq!(
            err,
            WizardError::WrongStep {
                expected: WizardStep::Basic,
                actual: WizardStep::Role,
            }
        );

        let err = wizard
            .submit_advertiser_details(advertiser_details())
            .unwrap_err();
        assert!(matches!(err, WizardError::WrongStep { .. }));
    }

    #[test]
    fn details_branch_must_match_the_chosen_role() {
        let mut wizard = SignupWizard::new();
        wizard.choose_role(Role::Influencer).unwrap();
        wizard.submit_basic(basic()).unwrap();

        let err = wizard
            .submit_advertiser_details(advertiser_details())
            .unwrap_err();
        assert_eq!(err, WizardError::RoleMismatch);

        assert!(wizard.submit_influencer_details(influencer_details()).is_ok());
    }

    #[test]
    fn failed_validation_keeps_the_current_step() {
        let mut wizard = SignupWizard::new();
        wizard.choose_role(Role::Advertiser).unwrap();

        let mut bad = basic();
        bad.password = "short".into();
        let err = wizard.submit_basic(bad).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(wizard.step(), WizardStep::Basic);

        wizard.submit_basic(basic()).unwrap();
        let mut bad_details = advertiser_details();
        bad_details.business_registration_number = "nope".into();
        let err = wizard.submit_advertiser_details(bad_details).unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(wizard.step(), WizardStep::Details);
    }

    #[test]
    fn back_walks_details_to_basic_to_role() {
        let mut wizard = SignupWizard::new();
        wizard.choose_role(Role::Advertiser).unwrap();
        wizard.submit_basic(basic()).unwrap();
        assert_eq!(wizard.step(), WizardStep::Details);

        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Basic);
        // The role choice survives going back one step.
        assert_eq!(wizard.role(), Some(Role::Advertiser));

        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Role);
        assert_eq!(wizard.role(), None);

        // Bottomed out; nothing to go back to.
        wizard.back();
        assert_eq!(wizard.step(), WizardStep::Role);
    }
}
