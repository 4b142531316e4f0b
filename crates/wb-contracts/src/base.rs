//! Base contract system
//!
//! A contract answers two questions about a candidate entity: may this actor
//! make the change ([`Contract::authorize`]) and is the result well-formed
//! ([`Contract::validate`]). The first failure surfaces as a 403, the second
//! as a 422.

use std::collections::HashSet;
use std::str::FromStr;

use thiserror::Error;
use wb_core::error::{ValidationErrors, WbError};
use wb_models::{ParseLiteralError, Role};

/// Result of contract validation
pub type ValidationResult = Result<(), ValidationErrors>;

/// Result of an authorization check
pub type AuthorizationResult = Result<(), Forbidden>;

/// The actor lacks the permission or ownership a change requires
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct Forbidden(pub String);

impl Forbidden {
    pub fn new(message: impl Into<String>) -> Self {
        Forbidden(message.into())
    }
}

impl From<Forbidden> for WbError {
    fn from(err: Forbidden) -> Self {
        WbError::Forbidden { message: err.0 }
    }
}

/// The acting user, as far as contracts need to know
pub trait UserContext: Send + Sync {
    fn id(&self) -> &str;
    fn role(&self) -> Role;

    fn allowed(&self, permission: &str) -> bool {
        self.role().has_permission(permission)
    }

    fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    fn is(&self, user_id: &str) -> bool {
        self.id() == user_id
    }
}

/// Base contract trait
pub trait Contract<T>: Send + Sync {
    /// Validate the entity
    fn validate(&self, entity: &T) -> ValidationResult;

    /// Check the actor may perform the change
    fn authorize(&self, _entity: &T) -> AuthorizationResult {
        Ok(())
    }

    /// Check if an attribute is writable
    fn is_writable(&self, _attribute: &str) -> bool {
        true
    }

    /// Authorization, then validation
    fn check(&self, entity: &T) -> Result<(), WbError> {
        self.authorize(entity)?;
        self.validate(entity).map_err(WbError::Validation)
    }
}

/// Parse an enumeration literal, recording a field error on failure
pub fn parse_attribute<T>(attribute: &str, raw: &str, errors: &mut ValidationErrors) -> Option<T>
where
    T: FromStr<Err = ParseLiteralError>,
{
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            errors.add(attribute, err.field_message());
            None
        }
    }
}

/// Record a "can't be blank" error for blank text
pub fn validate_presence(attribute: &str, value: &str, errors: &mut ValidationErrors) {
    if value.trim().is_empty() {
        errors.add(attribute, "can't be blank");
    }
}

/// Run the entity's derived `validator` rules and merge them in
pub fn validate_derived<T: validator::Validate>(entity: &T, errors: &mut ValidationErrors) {
    if let Err(derived) = entity.validate() {
        errors.merge(derived.into());
    }
}

/// Change tracking for update contracts
#[derive(Debug, Default, Clone)]
pub struct ChangeTracker {
    changed_attributes: HashSet<String>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_changed(&mut self, attribute: impl Into<String>) {
        self.changed_attributes.insert(attribute.into());
    }

    pub fn is_changed(&self, attribute: &str) -> bool {
        self.changed_attributes.contains(attribute)
    }

    pub fn changed_attributes(&self) -> &HashSet<String> {
        &self.changed_attributes
    }

    /// Changed attributes failing `is_writable`, sorted
    pub fn unwritable<F>(&self, is_writable: F) -> Vec<String>
    where
        F: Fn(&str) -> bool,
    {
        let mut denied: Vec<String> = self
            .changed_attributes
            .iter()
            .filter(|attribute| !is_writable(attribute.as_str()))
            .cloned()
            .collect();
        denied.sort();
        denied
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub struct TestUser {
        pub id: String,
        pub role: Role,
    }

    impl TestUser {
        pub fn new(id: &str, role: Role) -> Self {
            Self {
                id: id.to_string(),
                role,
            }
        }
    }

    impl UserContext for TestUser {
        fn id(&self) -> &str {
            &self.id
        }

        fn role(&self) -> Role {
            self.role
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wb_models::{Priority, WorkItemStatus};

    #[test]
    fn test_change_tracker() {
        let mut tracker = ChangeTracker::new();
        assert!(!tracker.is_changed("name"));

        tracker.mark_changed("name");
        assert!(tracker.is_changed("name"));
        assert!(!tracker.is_changed("description"));

        tracker.mark_changed("performance");
        assert_eq!(tracker.unwritable(|a| a == "name"), vec!["performance".to_string()]);
    }

    #[test]
    fn test_parse_attribute_records_error() {
        let mut errors = ValidationErrors::new();
        assert_eq!(
            parse_attribute::<Priority>("priority", "Major", &mut errors),
            Some(Priority::Major)
        );
        assert!(errors.is_empty());

        assert_eq!(parse_attribute::<WorkItemStatus>("status", "Finished", &mut errors), None);
        assert!(errors.has_error("status"));
    }

    #[test]
    fn test_forbidden_maps_to_403() {
        let err: WbError = Forbidden::new("nope").into();
        assert_eq!(err.status_code(), 403);
    }
}
