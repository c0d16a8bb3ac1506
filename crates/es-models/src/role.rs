//! Role hierarchy
//!
//! Roles are ranked by an ordinal level. Authorization rules and business
//! eligibility checks (who may manage a project) both query the same ladder.

use serde::{Deserialize, Serialize};

/// User role, totally ordered by `level`.
///
/// The operational ladder runs from AUXILIAR_TECNICO up to DIRETOR; ADMIN and
/// the super-user DEV sit above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    AuxiliarTecnico,
    AssistenteTecnico,
    AnalistaTecnico,
    LiderProjetos,
    Rh,
    Diretor,
    Admin,
    Dev,
}

impl Role {
    /// All roles, in ascending order of authority.
    pub const ALL: [Role; 8] = [
        Role::AuxiliarTecnico,
        Role::AssistenteTecnico,
        Role::AnalistaTecnico,
        Role::LiderProjetos,
        Role::Rh,
        Role::Diretor,
        Role::Admin,
        Role::Dev,
    ];

    /// Ordinal level. Levels are distinct and totally ordered.
    pub fn level(&self) -> i32 {
        match self {
            Role::AuxiliarTecnico => 1,
            Role::AssistenteTecnico => 2,
            Role::AnalistaTecnico => 3,
            Role::LiderProjetos => 4,
            Role::Rh => 5,
            Role::Diretor => 6,
            Role::Admin => 99,
            Role::Dev => 100,
        }
    }

    /// Strict authority comparison: `a.has_authority_over(b)` iff
    /// `a.level() > b.level()`. Irreflexive and antisymmetric.
    pub fn has_authority_over(&self, other: Role) -> bool {
        self.level() > other.level()
    }

    /// Non-strict comparison used for "X or above" eligibility rules.
    pub fn at_least(&self, other: Role) -> bool {
        self.level() >= other.level()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::AuxiliarTecnico => "AUXILIAR_TECNICO",
            Role::AssistenteTecnico => "ASSISTENTE_TECNICO",
            Role::AnalistaTecnico => "ANALISTA_TECNICO",
            Role::LiderProjetos => "LIDER_PROJETOS",
            Role::Rh => "RH",
            Role::Diretor => "DIRETOR",
            Role::Admin => "ADMIN",
            Role::Dev => "DEV",
        }
    }

    /// Case-insensitive parse from the stored/transported name.
    pub fn parse(s: &str) -> Option<Role> {
        Role::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| format!("unknown role: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_matches_levels() {
        for a in Role::ALL {
            for b in Role::ALL {
                assert_eq!(a.has_authority_over(b), a.level() > b.level());
            }
        }
    }

    #[test]
    fn test_authority_irreflexive_and_antisymmetric() {
        for a in Role::ALL {
            assert!(!a.has_authority_over(a));
            for b in Role::ALL {
                if a.has_authority_over(b) {
                    assert!(!b.has_authority_over(a));
                }
            }
        }
    }

    #[test]
    fn test_levels_are_distinct_and_ordered() {
        let levels: Vec<i32> = Role::ALL.iter().map(|r| r.level()).collect();
        let mut sorted = levels.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(levels, sorted);
    }

    #[test]
    fn test_ladder() {
        assert!(Role::Dev.has_authority_over(Role::Admin));
        assert!(Role::Admin.has_authority_over(Role::Diretor));
        assert!(Role::Diretor.has_authority_over(Role::Rh));
        assert!(Role::Rh.has_authority_over(Role::LiderProjetos));
        assert!(Role::LiderProjetos.has_authority_over(Role::AnalistaTecnico));
        assert!(Role::AnalistaTecnico.has_authority_over(Role::AssistenteTecnico));
        assert!(Role::AssistenteTecnico.has_authority_over(Role::AuxiliarTecnico));
    }

    #[test]
    fn test_at_least() {
        assert!(Role::LiderProjetos.at_least(Role::LiderProjetos));
        assert!(Role::Diretor.at_least(Role::LiderProjetos));
        assert!(!Role::AnalistaTecnico.at_least(Role::LiderProjetos));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Role::parse("lider_projetos"), Some(Role::LiderProjetos));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("Dev"), Some(Role::Dev));
        assert_eq!(Role::parse("stagiaire"), None);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Role::AnalistaTecnico).unwrap();
        assert_eq!(json, "\"ANALISTA_TECNICO\"");
        let parsed: Role = serde_json::from_str("\"DIRETOR\"").unwrap();
        assert_eq!(parsed, Role::Diretor);
    }
}
