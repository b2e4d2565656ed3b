//! Observable mirror of the host's solution configurations.
//!
//! The IDE owns the solution's configuration objects and their per-project
//! contexts; this module keeps a local, observable copy of that hierarchy.
//! Host objects are shared as [`Rc`] handles and treated as read-only; the
//! mirror snapshots their state and is re-synchronized on demand via
//! [`Solution::update`] whenever the host signals a change.
//!
//! Structural equality is identity of the host handle plus equality of the
//! snapshot, ordered children included, so an update only replaces the
//! entities whose observed state actually changed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::sync::{MirrorCollection, StructuralEq, combine_hash, hash_of};

// ═══════════════════════════════════════════════════════════════════════════════
//  Host-side handles
// ═══════════════════════════════════════════════════════════════════════════════

/// Host-owned view of one solution configuration: its name, platform, and
/// the per-project build contexts it carries. Interior mutability stands in
/// for the host mutating the object behind our back.
#[derive(Debug)]
pub struct SolutionConfigurationHandle {
    pub name: String,
    pub platform_name: String,
    pub contexts: RefCell<Vec<Rc<SolutionContextHandle>>>,
}

impl SolutionConfigurationHandle {
    pub fn new(name: impl Into<String>, platform_name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            platform_name: platform_name.into(),
            contexts: RefCell::new(Vec::new()),
        })
    }
}

/// Host-owned view of one project's context within a solution
/// configuration.
#[derive(Debug)]
pub struct SolutionContextHandle {
    pub project_name: String,
    pub configuration_name: String,
    pub platform_name: String,
    pub should_build: Cell<bool>,
}

impl SolutionContextHandle {
    pub fn new(
        project_name: impl Into<String>,
        configuration_name: impl Into<String>,
        platform_name: impl Into<String>,
        should_build: bool,
    ) -> Rc<Self> {
        Rc::new(Self {
            project_name: project_name.into(),
            configuration_name: configuration_name.into(),
            platform_name: platform_name.into(),
            should_build: Cell::new(should_build),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  SolutionContext — leaf mirror entity
// ═══════════════════════════════════════════════════════════════════════════════

/// Snapshot of one [`SolutionContextHandle`] at the last synchronization.
#[derive(Debug)]
pub struct SolutionContext {
    handle: Rc<SolutionContextHandle>,
    project_name: String,
    configuration_name: String,
    platform_name: String,
    should_build: bool,
}

impl SolutionContext {
    pub fn new(handle: Rc<SolutionContextHandle>) -> Self {
        Self {
            project_name: handle.project_name.clone(),
            configuration_name: handle.configuration_name.clone(),
            platform_name: handle.platform_name.clone(),
            should_build: handle.should_build.get(),
            handle,
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn configuration_name(&self) -> &str {
        &self.configuration_name
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    pub fn should_build(&self) -> bool {
        self.should_build
    }
}

impl StructuralEq for SolutionContext {
    fn structural_hash(&self) -> u64 {
        let snapshot = (
            Rc::as_ptr(&self.handle) as usize,
            &self.project_name,
            &self.configuration_name,
            &self.platform_name,
            self.should_build,
        );
        hash_of(&snapshot)
    }

    fn structural_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle)
            && self.project_name == other.project_name
            && self.configuration_name == other.configuration_name
            && self.platform_name == other.platform_name
            && self.should_build == other.should_build
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  SolutionConfiguration — composite mirror entity
// ═══════════════════════════════════════════════════════════════════════════════

/// Mirror of one solution configuration and its ordered context list.
#[derive(Debug)]
pub struct SolutionConfiguration {
    handle: Rc<SolutionConfigurationHandle>,
    name: String,
    platform_name: String,
    /// Observable mirror of the handle's current contexts.
    pub contexts: MirrorCollection<SolutionContext>,
}

impl SolutionConfiguration {
    /// Snapshot the handle, including its current context list.
    pub fn new(handle: Rc<SolutionConfigurationHandle>) -> Self {
        let mut configuration = Self {
            name: handle.name.clone(),
            platform_name: handle.platform_name.clone(),
            contexts: MirrorCollection::new(),
            handle,
        };
        configuration.update();
        configuration
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn platform_name(&self) -> &str {
        &self.platform_name
    }

    /// The host's unique name for this configuration, `"Name|Platform"`.
    pub fn unique_name(&self) -> String {
        format!("{}|{}", self.name, self.platform_name)
    }

    /// Re-read the handle's contexts and synchronize the nested mirror.
    pub fn update(&mut self) {
        let fresh: Vec<SolutionContext> = self
            .handle
            .contexts
            .borrow()
            .iter()
            .map(|context| SolutionContext::new(Rc::clone(context)))
            .collect();
        self.contexts.synchronize_with(fresh);
    }
}

impl StructuralEq for SolutionConfiguration {
    fn structural_hash(&self) -> u64 {
        let seed = hash_of(&(Rc::as_ptr(&self.handle) as usize));
        self.contexts
            .iter()
            .fold(seed, |acc, context| combine_hash(acc, context.structural_hash()))
    }

    fn structural_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.handle, &other.handle)
            && self.contexts.len() == other.contexts.len()
            && self
                .contexts
                .iter()
                .zip(other.contexts.iter())
                .all(|(a, b)| a.structural_eq(b))
    }

    fn reconcile(&mut self, fresh: Self) {
        self.contexts.synchronize_with(fresh.contexts.into_items());
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Solution — top-level mirror
// ═══════════════════════════════════════════════════════════════════════════════

/// The observable list of all solution configurations.
#[derive(Debug, Default)]
pub struct Solution {
    pub configurations: MirrorCollection<SolutionConfiguration>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the mirror from the host's current configuration list.
    ///
    /// Configurations whose handle and observed state are unchanged keep
    /// their existing mirror instance; everything else is inserted, moved,
    /// or removed with a change event at the exact position.
    pub fn update(&mut self, handles: &[Rc<SolutionConfigurationHandle>]) {
        let fresh: Vec<SolutionConfiguration> = handles
            .iter()
            .map(|handle| SolutionConfiguration::new(Rc::clone(handle)))
            .collect();
        self.configurations.synchronize_with(fresh);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::CollectionChange;

    fn handle_with_contexts(
        name: &str,
        platform: &str,
        projects: &[&str],
    ) -> Rc<SolutionConfigurationHandle> {
        let handle = SolutionConfigurationHandle::new(name, platform);
        for project in projects {
            handle
                .contexts
                .borrow_mut()
                .push(SolutionContextHandle::new(*project, name, platform, true));
        }
        handle
    }

    #[test]
    fn snapshot_captures_handle_state() {
        let handle = handle_with_contexts("Debug", "Any CPU", &["App", "Lib"]);
        let configuration = SolutionConfiguration::new(handle);

        assert_eq!(configuration.unique_name(), "Debug|Any CPU");
        assert_eq!(configuration.contexts.len(), 2);
        assert_eq!(configuration.contexts.get(0).unwrap().project_name(), "App");
        assert!(configuration.contexts.get(1).unwrap().should_build());
    }

    #[test]
    fn unchanged_update_emits_no_changes() {
        let handles = vec![
            handle_with_contexts("Debug", "Any CPU", &["App"]),
            handle_with_contexts("Release", "Any CPU", &["App"]),
        ];
        let mut solution = Solution::new();
        solution.update(&handles);
        solution.configurations.drain_changes();

        solution.update(&handles);

        assert!(solution.configurations.drain_changes().is_empty());
        assert_eq!(solution.configurations.len(), 2);
    }

    #[test]
    fn context_flag_flip_replaces_only_that_configuration() {
        let debug = handle_with_contexts("Debug", "Any CPU", &["App"]);
        let release = handle_with_contexts("Release", "Any CPU", &["App"]);
        let handles = vec![Rc::clone(&debug), Rc::clone(&release)];

        let mut solution = Solution::new();
        solution.update(&handles);
        solution.configurations.drain_changes();

        // Host unchecks "build App" in the Release configuration.
        release.contexts.borrow()[0].should_build.set(false);
        solution.update(&handles);

        assert_eq!(
            solution.configurations.drain_changes(),
            vec![
                CollectionChange::Removed { index: 1 },
                CollectionChange::Inserted { index: 1 },
            ]
        );
        assert!(!solution.configurations.get(1).unwrap().contexts.get(0).unwrap().should_build());
    }

    #[test]
    fn added_configuration_is_inserted_in_place() {
        let debug = handle_with_contexts("Debug", "Any CPU", &["App"]);
        let release = handle_with_contexts("Release", "Any CPU", &["App"]);

        let mut solution = Solution::new();
        solution.update(&[Rc::clone(&debug), Rc::clone(&release)]);
        solution.configurations.drain_changes();

        let staging = handle_with_contexts("Staging", "Any CPU", &["App"]);
        solution.update(&[debug, staging, release]);

        assert_eq!(
            solution.configurations.drain_changes(),
            vec![CollectionChange::Inserted { index: 1 }]
        );
        let names: Vec<String> = solution
            .configurations
            .iter()
            .map(SolutionConfiguration::unique_name)
            .collect();
        assert_eq!(names, ["Debug|Any CPU", "Staging|Any CPU", "Release|Any CPU"]);
    }

    #[test]
    fn removed_configuration_is_dropped() {
        let debug = handle_with_contexts("Debug", "Any CPU", &["App"]);
        let release = handle_with_contexts("Release", "Any CPU", &["App"]);

        let mut solution = Solution::new();
        solution.update(&[Rc::clone(&debug), release]);
        solution.configurations.drain_changes();

        solution.update(&[debug]);

        assert_eq!(
            solution.configurations.drain_changes(),
            vec![CollectionChange::Removed { index: 1 }]
        );
        assert_eq!(solution.configurations.len(), 1);
    }

    #[test]
    fn reused_configuration_has_no_context_churn() {
        let handle = handle_with_contexts("Debug", "Any CPU", &["App", "Lib"]);
        let mut solution = Solution::new();
        solution.update(std::slice::from_ref(&handle));
        solution.configurations.drain_changes();

        solution.update(std::slice::from_ref(&handle));

        // The kept configuration reconciled its nested mirror against an
        // identical context sequence.
        assert!(solution.configurations.drain_changes().is_empty());
        // Nested context list unchanged as well.
        // (Fresh inserts would have left events behind.)
        let configuration = solution.configurations.get(0).unwrap();
        assert_eq!(configuration.contexts.len(), 2);
    }

    #[test]
    fn new_context_in_handle_appears_after_update() {
        let handle = handle_with_contexts("Debug", "Any CPU", &["App"]);
        let mut solution = Solution::new();
        solution.update(std::slice::from_ref(&handle));
        solution.configurations.drain_changes();

        handle
            .contexts
            .borrow_mut()
            .push(SolutionContextHandle::new("Lib", "Debug", "Any CPU", true));
        solution.update(std::slice::from_ref(&handle));

        // Context list changed, so the whole configuration was replaced.
        assert_eq!(solution.configurations.drain_changes().len(), 2);
        let configuration = solution.configurations.get(0).unwrap();
        assert_eq!(configuration.contexts.len(), 2);
        assert_eq!(configuration.contexts.get(1).unwrap().project_name(), "Lib");
    }
}
