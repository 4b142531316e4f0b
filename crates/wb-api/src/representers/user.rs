//! User and profile representers

use serde::Serialize;
use wb_db::PaginatedResult;
use wb_models::{User, UserProfile};
use wb_services::UserAccount;

use super::hal::{rels, HalCollection, HalLink, HalLinks, HalResource};

pub const USERS_PATH: &str = "/api/users";

/// A user with their profile nested
#[derive(Debug, Clone, Serialize)]
pub struct UserRepresentation {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<HalResource<UserProfile>>,
}

pub struct UserRepresenter;

impl UserRepresenter {
    pub fn represent(account: UserAccount) -> HalResource<UserRepresentation> {
        let base = format!("{}/{}", USERS_PATH, account.user.id);
        let links = HalLinks::new()
            .with(rels::SELF, HalLink::with_title(&base, &account.user.user_name))
            .with("profile", HalLink::new(format!("{}/profile", base)))
            .with("changeRole", HalLink::new(format!("{}/role", base)).method("PATCH"));

        let rep = UserRepresentation {
            user: account.user,
            profile: account.profile.map(ProfileRepresenter::represent),
        };
        HalResource::new("User", rep).with_links(links)
    }

    pub fn represent_collection(page: PaginatedResult<User>) -> HalCollection<HalResource<UserRepresentation>> {
        let PaginatedResult {
            items,
            total,
            limit,
            offset,
        } = page;
        let elements = items
            .into_iter()
            .map(|user| Self::represent(UserAccount { user, profile: None }))
            .collect();

        HalCollection::new("UserCollection", elements, total, limit, offset)
            .with_pagination_links(USERS_PATH)
    }
}

pub struct ProfileRepresenter;

impl ProfileRepresenter {
    pub fn represent(profile: UserProfile) -> HalResource<UserProfile> {
        let user = format!("{}/{}", USERS_PATH, profile.user_id);
        HalResource::new("UserProfile", profile)
            .with_self_link(format!("{}/profile", user))
            .with_link("user", HalLink::new(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_profile() {
        let account = UserAccount {
            user: User::new("u-1", "ada@example.com", "ada"),
            profile: Some(UserProfile::new("u-1", "Ada Lovelace")),
        };
        let json = serde_json::to_value(UserRepresenter::represent(account)).unwrap();

        assert_eq!(json["_type"], "User");
        assert_eq!(json["id"], "u-1");
        assert_eq!(json["userName"], "ada");
        assert_eq!(json["role"], "Employee");
        assert_eq!(json["_links"]["self"]["href"], "/api/users/u-1");
        assert_eq!(json["profile"]["_type"], "UserProfile");
        assert_eq!(json["profile"]["fullName"], "Ada Lovelace");
        assert_eq!(json["profile"]["performance"], 100.0);
        assert_eq!(json["profile"]["_links"]["self"]["href"], "/api/users/u-1/profile");
    }

    #[test]
    fn test_user_without_profile() {
        let account = UserAccount {
            user: User::new("u-2", "bob@example.com", "bob"),
            profile: None,
        };
        let json = serde_json::to_value(UserRepresenter::represent(account)).unwrap();
        assert!(json.get("profile").is_none());
    }
}
