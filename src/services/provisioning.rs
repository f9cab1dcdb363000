//! SAML account provisioning service.
//!
//! Maps the attribute bag of a validated assertion onto a local account:
//! resolves the username through the configured attribute mapping, creates or
//! fetches the account, and reconciles mapped fields on the account and its
//! optional profile. Assertion parsing and signature validation happen
//! upstream; persistence mechanics live in the storage layer.

use std::sync::Arc;

use crate::{
    auth::{AttributeBag, AttributeMapping, PassthroughCleaner, SessionInfo, UsernameCleaner},
    db::{DbPool, DbResult},
    models::{FieldTarget, Profile, USERNAME_FIELD, User},
};

/// Provisioning service for SAML-authenticated identities.
///
/// Expected failures (missing inputs, unknown username, no username
/// attribute) resolve to `Ok(None)`; only storage-layer errors propagate.
#[derive(Clone)]
pub struct SamlProvisioningService {
    db: Arc<DbPool>,
    cleaner: Arc<dyn UsernameCleaner>,
}

impl SamlProvisioningService {
    /// Create a service with the default passthrough username cleaner.
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            db,
            cleaner: Arc::new(PassthroughCleaner),
        }
    }

    /// Create a service with a custom username cleaner.
    pub fn with_cleaner(db: Arc<DbPool>, cleaner: Arc<dyn UsernameCleaner>) -> Self {
        Self { db, cleaner }
    }

    /// Resolve the local account for a validated assertion.
    ///
    /// Extracts the username from the attribute bag via the mapping, then
    /// creates or fetches the account and reconciles its mapped fields.
    /// When `create_unknown_user` is false, unknown usernames resolve to
    /// `Ok(None)` instead of creating an account.
    pub async fn authenticate(
        &self,
        session_info: Option<&SessionInfo>,
        attribute_mapping: Option<&AttributeMapping>,
        create_unknown_user: bool,
    ) -> DbResult<Option<User>> {
        let (Some(session_info), Some(mapping)) = (session_info, attribute_mapping) else {
            tracing::error!("Session info or attribute mapping missing");
            return Ok(None);
        };

        let Some(attributes) = session_info.ava.as_ref() else {
            tracing::error!("Session info carries no attribute bag");
            return Ok(None);
        };

        if attributes.is_empty() {
            tracing::warn!(
                issuer = session_info.issuer.as_deref().unwrap_or("unknown"),
                "Assertion attribute bag is empty"
            );
        }

        let Some(raw_username) = self.extract_username(attributes, mapping) else {
            return Ok(None);
        };

        let username = self.cleaner.clean(raw_username);

        let user = if create_unknown_user {
            let (user, created) = self.db.users().get_or_create(&username).await?;
            if created {
                tracing::info!(username = %username, user_id = %user.id, "New user created");
                self.configure_user(user, attributes, mapping).await?
            } else {
                tracing::debug!(username = %username, user_id = %user.id, "User updated");
                self.update_user(user, attributes, mapping, false).await?
            }
        } else {
            tracing::debug!(username = %username, "Retrieving existing user");
            match self.db.users().get_by_username(&username).await? {
                Some(user) => self.update_user(user, attributes, mapping, false).await?,
                None => {
                    tracing::error!(username = %username, "User does not exist");
                    return Ok(None);
                }
            }
        };

        Ok(Some(user))
    }

    /// Pick the username attribute out of the bag.
    ///
    /// The mapping must designate exactly one attribute as the username
    /// source; an ambiguous mapping fails closed rather than silently picking
    /// an entry.
    fn extract_username<'a>(
        &self,
        attributes: &'a AttributeBag,
        mapping: &AttributeMapping,
    ) -> Option<&'a str> {
        let mut sources = mapping
            .iter()
            .filter(|(_, fields)| fields.iter().any(|f| f == USERNAME_FIELD))
            .map(|(attr, _)| attr.as_str());

        let Some(source) = sources.next() else {
            tracing::error!("Attribute mapping has no username source");
            return None;
        };

        if let Some(other) = sources.next() {
            tracing::error!(
                first = source,
                second = other,
                "Attribute mapping has multiple username sources; refusing to pick one"
            );
            return None;
        }

        let value = attributes.first(source);
        if value.is_none() {
            tracing::error!(
                attribute = source,
                "Username attribute not present in assertion"
            );
        }
        value
    }

    /// Configure a newly created account and persist it.
    ///
    /// SAML-provisioned accounts get no usable local credential; password
    /// login stays disabled unless set up through another channel.
    pub async fn configure_user(
        &self,
        mut user: User,
        attributes: &AttributeBag,
        attribute_mapping: &AttributeMapping,
    ) -> DbResult<User> {
        user.password_hash = None;
        self.update_user(user, attributes, attribute_mapping, true)
            .await
    }

    /// Reconcile mapped attribute values onto the account and its profile.
    ///
    /// Fields resolve through the field registry: account fields first, then
    /// profile fields when a profile exists. Attributes missing from the bag
    /// and field names unknown to both entities are skipped. The account and
    /// the profile are saved independently, and only when something changed
    /// or `force_save` is set.
    pub async fn update_user(
        &self,
        mut user: User,
        attributes: &AttributeBag,
        attribute_mapping: &AttributeMapping,
        force_save: bool,
    ) -> DbResult<User> {
        if attribute_mapping.is_empty() {
            return Ok(user);
        }

        let mut profile = self.load_profile(&user).await;

        let mut user_modified = false;
        let mut profile_modified = false;

        for (attribute, fields) in attribute_mapping {
            // Attribute missing from the bag: skip the entry
            let Some(value) = attributes.first(attribute) else {
                continue;
            };

            for field in fields {
                match FieldTarget::resolve(field) {
                    Some(FieldTarget::Account(target)) => {
                        user_modified |= target.apply(&mut user, value);
                    }
                    Some(FieldTarget::Profile(target)) => {
                        if let Some(profile) = profile.as_mut() {
                            profile_modified |= target.apply(profile, value);
                        }
                    }
                    None => {
                        tracing::trace!(field = %field, "Mapped field not assignable; skipping");
                    }
                }
            }
        }

        if user_modified || force_save {
            self.db.users().save(&user).await?;
        }

        if let Some(profile) = &profile
            && (profile_modified || force_save)
        {
            self.db.profiles().save(profile).await?;
        }

        Ok(user)
    }

    /// Load the user's profile, treating errors as absence.
    async fn load_profile(&self, user: &User) -> Option<Profile> {
        match self.db.profiles().get_by_user_id(user.id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    error = %e,
                    "Profile unavailable; updating account fields only"
                );
                None
            }
        }
    }
}
