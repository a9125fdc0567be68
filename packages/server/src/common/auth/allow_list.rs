use crate::config::parse_csv;

/// Initial-admin emails supplied through `INIT_ADMINS`.
///
/// Members in this list are admins even without an officer grant.
/// Membership is checked through `GateDeps::is_allow_listed` and
/// `GateDeps::is_admin`.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: Vec<String>,
}

impl AdminAllowList {
    pub fn new(emails: impl IntoIterator<Item = String>) -> Self {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.trim().to_ascii_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Parse the comma-separated configuration value
    pub fn from_csv(value: &str) -> Self {
        Self::new(parse_csv(value))
    }

    pub fn contains(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) => {
                let email = email.trim().to_ascii_lowercase();
                self.emails.iter().any(|e| *e == email)
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_case_insensitively() {
        let list = AdminAllowList::from_csv("Admin@Example.com, other@x.org");
        assert!(list.contains(Some("admin@example.com")));
        assert!(list.contains(Some("OTHER@x.org")));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_missing_email_never_matches() {
        let list = AdminAllowList::from_csv("a@x.com");
        assert!(!list.contains(None));
        assert!(!list.contains(Some("b@x.com")));
    }

    #[test]
    fn test_empty_config_has_no_admins() {
        let list = AdminAllowList::from_csv(" , ");
        assert!(list.is_empty());
        assert!(!list.contains(Some("")));
    }
}
