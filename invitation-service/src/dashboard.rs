//! Owner operations on invitations: creation with a public slug, publishing,
//! section visibility and deletion.

use log::{info, warn};
use vowcard_shared::models::{Invitation, Section};
use vowcard_shared::store::InvitationStore;

use crate::error::{DashboardError, Result};

const MIN_SLUG_LEN: usize = 3;
const MAX_SLUG_LEN: usize = 60;
const MAX_SLUG_SUFFIX: u32 = 99;

/// Lowercase ASCII slug built from the couple's names, e.g. "ana-ben".
pub fn slugify(bride: &str, groom: &str) -> String {
    let raw = format!("{} {}", bride, groom).to_lowercase();
    let mut slug = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

pub fn is_valid_slug(slug: &str) -> bool {
    (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
}

/// First free slug among `base`, `base-2`, `base-3`, ...
pub async fn suggest_slug<S>(store: &S, bride: &str, groom: &str) -> Result<String>
where
    S: InvitationStore + ?Sized,
{
    let base = slugify(bride, groom);
    if !is_valid_slug(&base) {
        return Err(DashboardError::InvalidSlug(base));
    }
    if !store.slug_exists(&base).await? {
        return Ok(base);
    }
    for n in 2..=MAX_SLUG_SUFFIX {
        let candidate = format!("{}-{}", base, n);
        if !store.slug_exists(&candidate).await? {
            return Ok(candidate);
        }
    }
    warn!("No free slug found for base {}", base);
    Err(DashboardError::SlugTaken(base))
}

pub async fn create_invitation<S>(
    store: &S,
    owner_id: &str,
    title: &str,
    slug: &str,
) -> Result<Invitation>
where
    S: InvitationStore + ?Sized,
{
    if !is_valid_slug(slug) {
        return Err(DashboardError::InvalidSlug(slug.to_string()));
    }
    if store.slug_exists(slug).await? {
        return Err(DashboardError::SlugTaken(slug.to_string()));
    }

    let invitation = store
        .create_invitation(Invitation::new(owner_id, title, slug))
        .await?;
    info!(
        "Created invitation {} with slug {} for owner {}",
        invitation.id, invitation.slug, owner_id
    );
    Ok(invitation)
}

async fn owned_invitation<S>(store: &S, invitation_id: &str, owner_id: &str) -> Result<Invitation>
where
    S: InvitationStore + ?Sized,
{
    let invitation = store.get_invitation(invitation_id).await?;
    if invitation.owner_id != owner_id {
        return Err(DashboardError::Forbidden(
            "You don't have permission to modify this invitation".into(),
        ));
    }
    Ok(invitation)
}

pub async fn set_published<S>(
    store: &S,
    invitation_id: &str,
    owner_id: &str,
    published: bool,
) -> Result<Invitation>
where
    S: InvitationStore + ?Sized,
{
    let mut invitation = owned_invitation(store, invitation_id, owner_id).await?;
    invitation.is_published = published;
    let updated = store.update_invitation(invitation).await?;
    info!(
        "Invitation {} is now {}",
        updated.id,
        if published { "published" } else { "unpublished" }
    );
    Ok(updated)
}

pub async fn set_section_visible<S>(
    store: &S,
    invitation_id: &str,
    owner_id: &str,
    section: Section,
    visible: bool,
) -> Result<Invitation>
where
    S: InvitationStore + ?Sized,
{
    let mut invitation = owned_invitation(store, invitation_id, owner_id).await?;
    invitation.theme.set_section_visible(section, visible);
    Ok(store.update_invitation(invitation).await?)
}

pub async fn delete_invitation<S>(store: &S, invitation_id: &str, owner_id: &str) -> Result<()>
where
    S: InvitationStore + ?Sized,
{
    owned_invitation(store, invitation_id, owner_id).await?;
    store.delete_invitation(invitation_id).await?;
    info!("Deleted invitation {}", invitation_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Ana", "Ben"), "ana-ben");
        assert_eq!(slugify("  Siti Nur ", "Budi!"), "siti-nur-budi");
        assert_eq!(slugify("Zoë", "Al"), "zo-al");
        assert_eq!(slugify("!!", "??"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("ana-ben"));
        assert!(is_valid_slug("ana-ben-2"));
        assert!(!is_valid_slug("ab"));
        assert!(!is_valid_slug("Ana-Ben"));
        assert!(!is_valid_slug("-ana"));
        assert!(!is_valid_slug("ana--ben"));
        assert!(!is_valid_slug(&"a".repeat(MAX_SLUG_LEN + 1)));
    }
}
