// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// User profile stored in the remote `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    pub email: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub birthplace: Option<String>,
    /// Birth date (`YYYY-MM-DD`)
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,
    /// Height in centimeters
    #[serde(default)]
    pub height_cm: Option<i32>,
    /// Weight in kilograms
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Whether the onboarding profile form was completed
    #[serde(default)]
    pub has_completed_data: bool,
    /// Signed in through a federated (Google) identity
    #[serde(default)]
    pub is_google_user: bool,
    #[serde(default)]
    pub google_id: Option<String>,
    /// Avatar URL
    #[serde(default)]
    pub picture: Option<String>,
}

/// The authenticated user of the current session.
///
/// Only `id` and `email` are guaranteed; the rest come from the identity
/// provider or an earlier profile form and may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub google_id: Option<String>,
    pub profile: Option<ProfileUpdate>,
}

impl SessionUser {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Build the row inserted when the user is first seen by the remote store.
    pub fn to_user(&self) -> User {
        let profile = self.profile.as_ref();
        User {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self
                .name
                .clone()
                .or_else(|| profile.map(|p| p.full_name.clone())),
            full_name: profile.map(|p| p.full_name.clone()),
            birthplace: profile.map(|p| p.birthplace.clone()),
            birthdate: profile.map(|p| p.birthdate.clone()),
            blood_type: profile.map(|p| p.blood_type.clone()),
            height_cm: profile.map(|p| p.height_cm),
            weight_kg: profile.map(|p| p.weight_kg),
            phone: profile.map(|p| p.phone.clone()),
            has_completed_data: profile.is_some(),
            is_google_user: self.google_id.is_some(),
            google_id: self.google_id.clone(),
            picture: self.picture.clone(),
        }
    }

    /// Full row written by an explicit profile save.
    pub fn with_profile(&self, profile: &ProfileUpdate) -> User {
        let mut user = SessionUser {
            profile: Some(profile.clone()),
            ..self.clone()
        }
        .to_user();
        user.name = Some(profile.full_name.clone());
        user
    }
}

/// Profile fields written by the onboarding/profile form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub birthplace: String,
    pub birthdate: String,
    pub blood_type: String,
    pub height_cm: i32,
    pub weight_kg: f64,
    pub phone: String,
    /// Always `true` once a profile has been saved
    pub has_completed_data: bool,
}

impl ProfileUpdate {
    /// Remote field names touched by a profile update.
    pub const FIELDS: [&'static str; 8] = [
        "full_name",
        "birthplace",
        "birthdate",
        "blood_type",
        "height_cm",
        "weight_kg",
        "phone",
        "has_completed_data",
    ];

    /// Apply the update to an existing row.
    pub fn apply(&self, user: &mut User) {
        user.full_name = Some(self.full_name.clone());
        user.birthplace = Some(self.birthplace.clone());
        user.birthdate = Some(self.birthdate.clone());
        user.blood_type = Some(self.blood_type.clone());
        user.height_cm = Some(self.height_cm);
        user.weight_kg = Some(self.weight_kg);
        user.phone = Some(self.phone.clone());
        user.has_completed_data = self.has_completed_data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileUpdate {
        ProfileUpdate {
            full_name: "Sari Wulandari".to_string(),
            birthplace: "Bandung".to_string(),
            birthdate: "1994-02-11".to_string(),
            blood_type: "O".to_string(),
            height_cm: 162,
            weight_kg: 55.5,
            phone: "+628123456789".to_string(),
            has_completed_data: true,
        }
    }

    #[test]
    fn test_to_user_tolerates_missing_fields() {
        let user = SessionUser::new("u-1", "a@example.com").to_user();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.height_cm, None);
        assert!(!user.has_completed_data);
        assert!(!user.is_google_user);
    }

    #[test]
    fn test_google_identity_is_carried() {
        let session = SessionUser {
            google_id: Some("g-42".to_string()),
            picture: Some("https://example.com/a.png".to_string()),
            ..SessionUser::new("u-1", "a@example.com")
        };
        let user = session.to_user();
        assert!(user.is_google_user);
        assert_eq!(user.google_id.as_deref(), Some("g-42"));
    }

    #[test]
    fn test_with_profile_sets_name_and_completion() {
        let user = SessionUser::new("u-1", "a@example.com").with_profile(&profile());
        assert_eq!(user.name.as_deref(), Some("Sari Wulandari"));
        assert_eq!(user.height_cm, Some(162));
        assert!(user.has_completed_data);
    }

    #[test]
    fn test_apply_overwrites_profile_fields_only() {
        let mut user = SessionUser::new("u-1", "a@example.com").to_user();
        user.picture = Some("pic".to_string());
        profile().apply(&mut user);
        assert_eq!(user.weight_kg, Some(55.5));
        assert_eq!(user.picture.as_deref(), Some("pic"));
        assert_eq!(user.email, "a@example.com");
    }
}
