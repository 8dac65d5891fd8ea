mod apply;
mod changed;
mod plan_applier;
mod prepare;
mod project_builder;
mod release_executor;
mod release_validator;
mod version_planner;

pub use apply::{ApplyInput, ApplyOperation};
pub use changed::{ChangedOperation, ChangedOutput};
pub use plan_applier::{AppliedRelease, PlanApplier};
pub use prepare::{PrepareInput, PrepareOperation, PrepareOutcome};
pub use project_builder::{ProjectBuilder, ProjectContext};
pub use release_executor::ReleaseOutcome;
pub use release_validator::{
    ReleaseSpecification, ReleaseSpecificationError, ReleaseValidator, ValidationError,
    ValidationErrorKind, ValidationErrors, render_errors,
};
pub use version_planner::{PlannedRelease, ResolvedPlan, VersionPlanner};
