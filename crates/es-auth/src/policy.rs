//! Route access policy
//!
//! A stateless, ordered rule table mapping `(method, path pattern)` to the
//! set of roles permitted. The transport layer calls [`AccessPolicy::authorize`]
//! before a handler runs; the first matching rule wins and nothing falls
//! through to a broader rule once matched.

use es_models::role::Role;

/// Who may pass a rule.
#[derive(Debug, Clone)]
pub enum Access {
    /// Anyone, including unauthenticated callers
    Public,
    /// Any authenticated caller, regardless of role
    AnyAuthenticated,
    /// Exactly these roles (literal set, no hierarchy expansion)
    Roles(Vec<Role>),
}

/// One policy rule. `method = None` matches every verb. A pattern ending in
/// `/**` matches the prefix itself and anything below it; other patterns
/// match exactly.
#[derive(Debug, Clone)]
pub struct Rule {
    pub method: Option<&'static str>,
    pub pattern: &'static str,
    pub access: Access,
}

impl Rule {
    fn matches(&self, method: &str, path: &str) -> bool {
        if let Some(m) = self.method {
            if !m.eq_ignore_ascii_case(method) {
                return false;
            }
        }
        match self.pattern.strip_suffix("/**") {
            Some(prefix) => path == prefix || path.starts_with(&format!("{}/", prefix)),
            None => path == self.pattern,
        }
    }
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No principal on the request
    Unauthenticated,
    /// Principal present but the matched rule excludes its role
    Forbidden,
}

/// Authorization decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// The route authorization table. Immutable after construction; safe to share
/// across requests without locking.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<Rule>,
}

impl AccessPolicy {
    /// Build a policy from an ordered rule list (most specific first).
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The production route table.
    pub fn standard() -> Self {
        Self::new(vec![
            // Public endpoints: authentication and the diagnostic console
            Rule {
                method: None,
                pattern: "/api/auth/**",
                access: Access::Public,
            },
            Rule {
                method: None,
                pattern: "/console/**",
                access: Access::Public,
            },
            Rule {
                method: None,
                pattern: "/health/**",
                access: Access::Public,
            },
            // Administration
            Rule {
                method: None,
                pattern: "/api/admin/**",
                access: Access::Roles(vec![Role::Admin]),
            },
            // Human resources
            Rule {
                method: None,
                pattern: "/api/hr/**",
                access: Access::Roles(vec![Role::Rh, Role::Diretor, Role::Admin]),
            },
            // Project creation: analysts and above
            Rule {
                method: Some("POST"),
                pattern: "/api/projects/**",
                access: Access::Roles(vec![
                    Role::AnalistaTecnico,
                    Role::LiderProjetos,
                    Role::Diretor,
                ]),
            },
        ])
    }

    /// Decide whether `caller` may invoke `method path`.
    ///
    /// Pure and total: no state, re-evaluated per call. Paths not matched by
    /// any rule default to any-authenticated.
    pub fn authorize(&self, caller: Option<Role>, method: &str, path: &str) -> AccessDecision {
        let access = self
            .rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.access)
            .unwrap_or(&Access::AnyAuthenticated);

        match access {
            Access::Public => AccessDecision::Allow,
            Access::AnyAuthenticated => match caller {
                Some(_) => AccessDecision::Allow,
                None => AccessDecision::Deny(DenyReason::Unauthenticated),
            },
            Access::Roles(allowed) => match caller {
                None => AccessDecision::Deny(DenyReason::Unauthenticated),
                Some(role) if allowed.contains(&role) => AccessDecision::Allow,
                Some(_) => AccessDecision::Deny(DenyReason::Forbidden),
            },
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AccessPolicy {
        AccessPolicy::standard()
    }

    #[test]
    fn test_auth_endpoints_public() {
        let decision = policy().authorize(None, "POST", "/api/auth/login");
        assert_eq!(decision, AccessDecision::Allow);
    }

    #[test]
    fn test_console_public() {
        assert!(policy()
            .authorize(None, "GET", "/console/db")
            .is_allowed());
    }

    #[test]
    fn test_admin_prefix_admin_only() {
        for role in Role::ALL {
            let decision = policy().authorize(Some(role), "GET", "/api/admin/users");
            if role == Role::Admin {
                assert_eq!(decision, AccessDecision::Allow);
            } else {
                assert_eq!(decision, AccessDecision::Deny(DenyReason::Forbidden));
            }
        }
    }

    #[test]
    fn test_hr_prefix() {
        for role in [Role::Rh, Role::Diretor, Role::Admin] {
            assert!(policy()
                .authorize(Some(role), "GET", "/api/hr/reviews")
                .is_allowed());
        }
        assert_eq!(
            policy().authorize(Some(Role::LiderProjetos), "GET", "/api/hr/reviews"),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_project_creation_gated() {
        assert_eq!(
            policy().authorize(Some(Role::AuxiliarTecnico), "POST", "/api/projects"),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
        assert!(policy()
            .authorize(Some(Role::LiderProjetos), "POST", "/api/projects")
            .is_allowed());
        assert!(policy()
            .authorize(Some(Role::AnalistaTecnico), "POST", "/api/projects")
            .is_allowed());
    }

    #[test]
    fn test_project_reads_any_authenticated() {
        // The POST rule is verb-specific; reads fall to the default rule.
        assert!(policy()
            .authorize(Some(Role::AuxiliarTecnico), "GET", "/api/projects")
            .is_allowed());
    }

    #[test]
    fn test_unauthenticated_denied_with_reason() {
        assert_eq!(
            policy().authorize(None, "GET", "/api/projects"),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            policy().authorize(None, "GET", "/api/admin/users"),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn test_first_match_wins() {
        // A public rule ahead of a restrictive one must shadow it.
        let policy = AccessPolicy::new(vec![
            Rule {
                method: None,
                pattern: "/api/admin/ping",
                access: Access::Public,
            },
            Rule {
                method: None,
                pattern: "/api/admin/**",
                access: Access::Roles(vec![Role::Admin]),
            },
        ]);

        assert!(policy.authorize(None, "GET", "/api/admin/ping").is_allowed());
        assert_eq!(
            policy.authorize(None, "GET", "/api/admin/users"),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn test_prefix_pattern_matches_root() {
        // "/api/projects/**" style patterns cover the bare prefix too.
        assert_eq!(
            policy().authorize(Some(Role::AssistenteTecnico), "POST", "/api/projects"),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
        assert_eq!(
            policy().authorize(Some(Role::AssistenteTecnico), "POST", "/api/projects/7/tasks"),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }
}
