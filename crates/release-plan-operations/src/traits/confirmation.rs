use crate::Result;
use crate::operations::ResolvedPlan;

pub trait ReleaseConfirmation: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the interaction cannot be completed.
    fn confirm(&self, plan: &ResolvedPlan) -> Result<bool>;
}
