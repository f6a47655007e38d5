//! Per-call stage instruction overrides.
//!
//! The override for a stage is resolved from the run's domain and handed to
//! the capability call as an argument. Nothing is written back to the agent,
//! so the override exists only for that call and concurrent runs with
//! different domains cannot observe each other's instructions.

use crate::research::domain::DomainConfig;
use crate::types::{Result, Stage};
use std::future::Future;
use tracing::debug;

/// Run `call` with the domain's override for `stage`
///
/// `call` receives `None` when there is no domain or the domain has no
/// entry for the stage, in which case the agent uses its own default.
/// Failures from `call` are returned unchanged.
pub async fn with_override<'a, T, F, Fut>(
    stage: Stage,
    domain: Option<&'a DomainConfig>,
    call: F,
) -> Result<T>
where
    F: FnOnce(Option<&'a str>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let instructions = domain.and_then(|d| d.instructions_for(stage));

    if let (Some(domain), Some(_)) = (domain, instructions) {
        debug!(stage = %stage, domain = %domain.name, "using domain instructions");
    }

    call(instructions).await
}
