//! Project configuration discovery and matching.
//!
//! A `.csproj` file declares its build matrix implicitly: every conditional
//! `<PropertyGroup>` names one configuration/platform pair, and the full
//! matrix is the cross product of all names seen. This module enumerates that
//! matrix ([`project_configurations`]) and decides which property group
//! applies to which target ([`matches_configuration`]).

use crate::condition::parse_condition;

// ═══════════════════════════════════════════════════════════════════════════════
//  ProjectConfiguration
// ═══════════════════════════════════════════════════════════════════════════════

/// A resolved configuration/platform pair, e.g. `Debug` / `Any CPU`.
///
/// Both fields are non-empty; equality is exact, case-sensitive string
/// comparison. The `Display` form is the host's unique name,
/// `"Configuration|Platform"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectConfiguration {
    /// Configuration name, e.g. `Debug`.
    pub configuration: String,
    /// Platform name in canonical form, e.g. `Any CPU` or `x64`.
    pub platform: String,
}

impl ProjectConfiguration {
    pub fn new(configuration: impl Into<String>, platform: impl Into<String>) -> Self {
        Self { configuration: configuration.into(), platform: platform.into() }
    }
}

impl std::fmt::Display for ProjectConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.configuration, self.platform)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  PropertyGroup
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only view of a host-owned property group: the only thing discovery
/// and matching need is the raw `Condition` attribute text.
pub trait PropertyGroup {
    /// The group's `Condition` attribute, if any.
    fn condition_expression(&self) -> Option<&str>;
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Discovery
// ═══════════════════════════════════════════════════════════════════════════════

/// Enumerate the full configuration×platform matrix declared by a project's
/// property groups.
///
/// Configuration names are seeded with `Debug` and `Release`; every group
/// whose condition parses contributes its configuration and platform name.
/// Groups with empty or unparseable conditions are skipped — conditions
/// outside the supported `'…' == '…'` shape are routine, not errors. When no
/// group names a platform the single default `Any CPU` is assumed.
///
/// Names from different groups combine: two groups declaring `Debug|x86` and
/// `Release|x64` yield all four pairs, not just the two literally seen. Each
/// distinct pair appears exactly once, in first-seen order.
pub fn project_configurations<'a, I, G>(property_groups: I) -> Vec<ProjectConfiguration>
where
    I: IntoIterator<Item = &'a G>,
    G: PropertyGroup + 'a,
{
    let mut configuration_names = vec!["Debug".to_string(), "Release".to_string()];
    let mut platform_names: Vec<String> = Vec::new();

    for group in property_groups {
        let Some(expression) = group.condition_expression() else {
            continue;
        };
        if expression.is_empty() {
            continue;
        }
        let Ok(parsed) = parse_condition(expression) else {
            continue;
        };

        if !configuration_names.contains(&parsed.configuration) {
            configuration_names.push(parsed.configuration);
        }
        if !platform_names.contains(&parsed.platform) {
            platform_names.push(parsed.platform);
        }
    }

    if platform_names.is_empty() {
        platform_names.push("Any CPU".to_string());
    }

    configuration_names
        .iter()
        .flat_map(|configuration| {
            platform_names
                .iter()
                .map(move |platform| ProjectConfiguration::new(configuration, platform))
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Matching
// ═══════════════════════════════════════════════════════════════════════════════

/// Does this property group apply to the given target configuration?
///
/// An unconditional group represents the base settings and matches only the
/// `None` target; a conditional group matches when its parsed
/// configuration/platform pair equals the target exactly. Groups whose
/// condition does not parse match nothing.
pub fn matches_configuration<G: PropertyGroup>(
    group: &G,
    target: Option<&ProjectConfiguration>,
) -> bool {
    let expression = group.condition_expression().unwrap_or("");

    if expression.is_empty() {
        return target.is_none();
    }

    match parse_condition(expression) {
        Ok(parsed) => target.is_some_and(|t| *t == parsed),
        Err(_) => false,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeGroup {
        condition: Option<&'static str>,
    }

    impl PropertyGroup for FakeGroup {
        fn condition_expression(&self) -> Option<&str> {
            self.condition
        }
    }

    fn group(condition: &'static str) -> FakeGroup {
        FakeGroup { condition: Some(condition) }
    }

    fn unconditional() -> FakeGroup {
        FakeGroup { condition: None }
    }

    fn pairs(configurations: &[ProjectConfiguration]) -> Vec<String> {
        configurations.iter().map(|c| c.to_string()).collect()
    }

    // ── Discovery ────────────────────────────────────────────────────────

    #[test]
    fn discover_empty_project_yields_defaults() {
        let groups: Vec<FakeGroup> = Vec::new();
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec!["Debug|Any CPU", "Release|Any CPU"]
        );
    }

    #[test]
    fn discover_unconditional_groups_only() {
        let groups = vec![unconditional(), unconditional()];
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec!["Debug|Any CPU", "Release|Any CPU"]
        );
    }

    #[test]
    fn discover_cross_product_combines_names_across_groups() {
        let groups = vec![
            group("'$(Configuration)|$(Platform)' == 'Debug|x86'"),
            group("'$(Configuration)|$(Platform)' == 'Release|x64'"),
        ];
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec!["Debug|x86", "Debug|x64", "Release|x86", "Release|x64"]
        );
    }

    #[test]
    fn discover_custom_configuration_extends_defaults() {
        let groups = vec![group("'$(Configuration)|$(Platform)' == 'Staging|AnyCPU'")];
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec!["Debug|Any CPU", "Release|Any CPU", "Staging|Any CPU"]
        );
    }

    #[test]
    fn discover_deduplicates_repeated_pairs() {
        let groups = vec![
            group("'$(Configuration)|$(Platform)' == 'Debug|AnyCPU'"),
            group("'$(Configuration)|$(Platform)' == 'Debug|AnyCPU'"),
            group("'$(Configuration)|$(Platform)' == 'Release|AnyCPU'"),
        ];
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec!["Debug|Any CPU", "Release|Any CPU"]
        );
    }

    #[test]
    fn discover_skips_unparseable_conditions() {
        // Three configurations and two platforms across parseable groups;
        // the Exists() group contributes nothing and aborts nothing.
        let groups = vec![
            group("'$(Configuration)|$(Platform)' == 'Debug|x86'"),
            group("Exists('packages.config')"),
            group("'$(Configuration)|$(Platform)' == 'Release|x64'"),
            group("'$(Configuration)|$(Platform)' == 'Staging|x86'"),
        ];
        assert_eq!(
            pairs(&project_configurations(&groups)),
            vec![
                "Debug|x86",
                "Debug|x64",
                "Release|x86",
                "Release|x64",
                "Staging|x86",
                "Staging|x64",
            ]
        );
    }

    // ── Matching ─────────────────────────────────────────────────────────

    #[test]
    fn unconditional_group_matches_only_base() {
        let target = ProjectConfiguration::new("Debug", "Any CPU");
        assert!(matches_configuration(&unconditional(), None));
        assert!(!matches_configuration(&unconditional(), Some(&target)));
    }

    #[test]
    fn empty_condition_behaves_like_unconditional() {
        let target = ProjectConfiguration::new("Debug", "Any CPU");
        assert!(matches_configuration(&group(""), None));
        assert!(!matches_configuration(&group(""), Some(&target)));
    }

    #[test]
    fn conditional_group_matches_exact_pair() {
        let g = group("'$(Configuration)|$(Platform)' == 'Debug|AnyCPU'");
        assert!(matches_configuration(
            &g,
            Some(&ProjectConfiguration::new("Debug", "Any CPU"))
        ));
        assert!(!matches_configuration(
            &g,
            Some(&ProjectConfiguration::new("Release", "Any CPU"))
        ));
        assert!(!matches_configuration(
            &g,
            Some(&ProjectConfiguration::new("Debug", "x64"))
        ));
        assert!(!matches_configuration(&g, None));
    }

    #[test]
    fn unparseable_condition_matches_nothing() {
        let g = group("Exists('app.config')");
        assert!(!matches_configuration(&g, None));
        assert!(!matches_configuration(
            &g,
            Some(&ProjectConfiguration::new("Debug", "Any CPU"))
        ));
    }
}
