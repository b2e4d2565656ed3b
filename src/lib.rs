pub mod condition;
pub mod configurations;
pub mod project;
pub mod solution;
pub mod sync;

pub use condition::{ConditionError, parse_condition};
pub use configurations::{
    ProjectConfiguration, PropertyGroup, matches_configuration, project_configurations,
};
pub use project::{ProjectFile, ProjectPropertyGroup};
pub use solution::{Solution, SolutionConfiguration, SolutionContext};
pub use sync::{CollectionChange, MirrorCollection, StructuralEq};
